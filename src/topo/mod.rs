//! 拓扑构建
//!
//! 各构建器产出同一种定稿后的 [`Topology`]：拓扑图、带端口的链路列表、交换机与主机列表。

pub mod dummy;
pub mod fat_tree;
pub mod jellyfish;

use mac_address::MacAddress;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::net::{Graph, Link, NodeId, PortMap, TopologyDescription};

/// 拓扑种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopologyKind {
    Jellyfish,
    FatTree,
    Dummy,
}

impl TopologyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopologyKind::Jellyfish => "jellyfish",
            TopologyKind::FatTree => "fat_tree",
            TopologyKind::Dummy => "dummy",
        }
    }
}

impl fmt::Display for TopologyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 定稿后的拓扑（只读）
#[derive(Debug, Clone)]
pub struct Topology {
    pub kind: TopologyKind,
    pub graph: Graph,
    /// 带端口的链路，按归一化端点对有序
    pub links: Vec<Link>,
    pub switches: Vec<NodeId>,
    pub hosts: Vec<NodeId>,
    mac_index: HashMap<MacAddress, NodeId>,
}

impl Topology {
    /// 定稿：分配端口并建立索引。之后不再修改拓扑图。
    pub fn finalize(kind: TopologyKind, graph: Graph) -> Self {
        let links = graph.assign_ports();
        let switches = graph.switch_ids();
        let hosts = graph.host_ids();
        let mac_index = graph
            .nodes()
            .iter()
            .filter_map(|n| n.mac().map(|mac| (mac, n.id)))
            .collect();
        Self {
            kind,
            graph,
            links,
            switches,
            hosts,
            mac_index,
        }
    }

    /// 从链路列表推导端口映射
    pub fn port_map(&self) -> PortMap {
        PortMap::from_links(&self.links)
    }

    pub fn host_by_mac(&self, mac: &MacAddress) -> Option<NodeId> {
        self.mac_index.get(mac).copied()
    }

    /// 主机所接入的交换机
    pub fn host_switch(&self, host: NodeId) -> Option<NodeId> {
        if !self.graph.is_host(host) {
            return None;
        }
        self.graph.neighbors(host).next()
    }

    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.graph.nodes().iter().find(|n| n.name == name).map(|n| n.id)
    }

    /// 按 dpid 查找交换机
    pub fn switch_by_dpid(&self, dpid: u64) -> Option<NodeId> {
        self.switches
            .iter()
            .copied()
            .find(|&s| self.graph.node(s).and_then(|n| n.dpid()) == Some(dpid))
    }

    pub fn describe(&self) -> TopologyDescription {
        TopologyDescription::new(self.kind.as_str(), &self.graph, &self.links)
    }
}
