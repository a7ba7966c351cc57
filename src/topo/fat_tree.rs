//! Fat-tree 拓扑构建

use super::{Topology, TopologyKind};
use crate::error::ConfigError;
use crate::net::{Graph, MAX_HOSTS, NodeId};

#[derive(Debug, Clone)]
pub struct FatTreeOpts {
    pub k: usize,
}

impl Default for FatTreeOpts {
    fn default() -> Self {
        Self { k: 4 }
    }
}

impl FatTreeOpts {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.k < 2 || self.k % 2 != 0 || self.k > u16::MAX as usize {
            return Err(ConfigError::FatTreeArity(self.k));
        }
        let half = self.k / 2;
        let hosts = self.k * half * half;
        if hosts > MAX_HOSTS {
            return Err(ConfigError::TooManyHosts(hosts));
        }
        Ok(())
    }
}

/// 各层节点的下标布局
#[derive(Debug, Clone)]
pub struct FatTreeLayout {
    pub k: usize,
    pub hosts: Vec<NodeId>,
    pub edge_switches: Vec<NodeId>,
    pub agg_switches: Vec<NodeId>,
    pub core_switches: Vec<NodeId>,
}

impl FatTreeLayout {
    fn half(&self) -> usize {
        self.k / 2
    }

    pub fn host(&self, pod: usize, edge: usize, host: usize) -> NodeId {
        let half = self.half();
        let idx = (pod * half + edge) * half + host;
        self.hosts[idx]
    }

    pub fn edge(&self, pod: usize, edge: usize) -> NodeId {
        let half = self.half();
        let idx = pod * half + edge;
        self.edge_switches[idx]
    }

    pub fn agg(&self, pod: usize, agg: usize) -> NodeId {
        let half = self.half();
        let idx = pod * half + agg;
        self.agg_switches[idx]
    }

    pub fn core(&self, group: usize, index: usize) -> NodeId {
        let half = self.half();
        let idx = group * half + index;
        self.core_switches[idx]
    }
}

pub fn build_fat_tree(opts: &FatTreeOpts) -> Result<(Topology, FatTreeLayout), ConfigError> {
    opts.validate()?;
    let k = opts.k;

    let half = k / 2;
    let mut graph = Graph::new();

    let mut core_switches = Vec::with_capacity(half * half);
    for group in 0..half {
        for index in 0..half {
            let name = format!("c{}_{}", group, index);
            core_switches.push(graph.add_switch(name));
        }
    }

    let mut hosts = Vec::with_capacity(k * half * half);
    let mut edge_switches = Vec::with_capacity(k * half);
    let mut agg_switches = Vec::with_capacity(k * half);
    let mut pod_edges: Vec<Vec<NodeId>> = Vec::with_capacity(k);
    let mut pod_aggs: Vec<Vec<NodeId>> = Vec::with_capacity(k);

    for pod in 0..k {
        let mut edges = Vec::with_capacity(half);
        let mut aggs = Vec::with_capacity(half);

        for edge in 0..half {
            let name = format!("p{}_e{}", pod, edge);
            edges.push(graph.add_switch(name));
        }
        for agg in 0..half {
            let name = format!("p{}_a{}", pod, agg);
            aggs.push(graph.add_switch(name));
        }

        for (edge_idx, edge_id) in edges.iter().enumerate() {
            for host in 0..half {
                let name = format!("h{}_{}_{}", pod, edge_idx, host);
                let host_id = graph.add_host(name);
                graph.add_edge(host_id, *edge_id);
                hosts.push(host_id);
            }
        }

        edge_switches.extend(edges.iter().copied());
        agg_switches.extend(aggs.iter().copied());
        pod_edges.push(edges);
        pod_aggs.push(aggs);
    }

    for pod in 0..k {
        for &edge_id in &pod_edges[pod] {
            for &agg_id in &pod_aggs[pod] {
                graph.add_edge(edge_id, agg_id);
            }
        }
    }

    // 第 agg 台汇聚交换机连接第 agg 组核心交换机
    for aggs in &pod_aggs {
        for (agg, &agg_id) in aggs.iter().enumerate() {
            for index in 0..half {
                graph.add_edge(agg_id, core_switches[agg * half + index]);
            }
        }
    }

    let layout = FatTreeLayout {
        k,
        hosts,
        edge_switches,
        agg_switches,
        core_switches,
    };
    Ok((Topology::finalize(TopologyKind::FatTree, graph), layout))
}
