//! 拓扑图
//!
//! 节点表 + 显式边集合。合成阶段通过 `add_edge` / `remove_edge` 修改边集，
//! 定稿后再通过 [`Graph::assign_ports`] 一次性推导端口，从不增量维护。
//! 所有集合都是有序的，遍历顺序只取决于节点 id，保证同一种子下结果逐字节一致。

use std::collections::{BTreeSet, VecDeque};

use super::id::{NodeId, Port};
use super::link::{Link, LinkKind, edge_key};
use super::node::Node;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Graph {
    nodes: Vec<Node>,
    /// 归一化 `(min, max)` 端点对
    edges: BTreeSet<(NodeId, NodeId)>,
    adj: Vec<BTreeSet<NodeId>>,
    num_hosts: u32,
    num_switches: u32,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加交换机节点
    pub fn add_switch(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let dpid = u64::from(self.num_switches);
        self.num_switches += 1;
        self.nodes.push(Node::switch(id, name, dpid));
        self.adj.push(BTreeSet::new());
        id
    }

    /// 添加主机节点
    pub fn add_host(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.num_hosts += 1;
        self.nodes.push(Node::host(id, name, self.num_hosts));
        self.adj.push(BTreeSet::new());
        id
    }

    /// 添加无向边；自环或重复边返回 `false`
    pub fn add_edge(&mut self, x: NodeId, y: NodeId) -> bool {
        if x == y || !self.contains(x) || !self.contains(y) {
            return false;
        }
        if !self.edges.insert(edge_key(x, y)) {
            return false;
        }
        self.adj[x.0].insert(y);
        self.adj[y.0].insert(x);
        true
    }

    /// 删除无向边；边不存在时返回 `false`
    pub fn remove_edge(&mut self, x: NodeId, y: NodeId) -> bool {
        if !self.edges.remove(&edge_key(x, y)) {
            return false;
        }
        self.adj[x.0].remove(&y);
        self.adj[y.0].remove(&x);
        true
    }

    pub fn has_edge(&self, x: NodeId, y: NodeId) -> bool {
        self.edges.contains(&edge_key(x, y))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// 全部边（归一化端点对，按 id 有序）
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.edges.iter().copied()
    }

    /// 两端都是交换机的边
    pub fn switch_edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.edges()
            .filter(|&(x, y)| self.is_switch(x) && self.is_switch(y))
    }

    /// 按 id 升序的邻居
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adj
            .get(id.0)
            .into_iter()
            .flat_map(|s| s.iter().copied())
    }

    pub fn degree(&self, id: NodeId) -> usize {
        self.adj.get(id.0).map_or(0, BTreeSet::len)
    }

    pub fn is_switch(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(Node::is_switch)
    }

    pub fn is_host(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(Node::is_host)
    }

    pub fn switch_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().filter(|n| n.is_switch()).map(|n| n.id).collect()
    }

    pub fn host_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().filter(|n| n.is_host()).map(|n| n.id).collect()
    }

    /// 从 `from` 出发的 BFS 跳数；不可达为 `None`
    pub fn hop_distances(&self, from: NodeId) -> Vec<Option<usize>> {
        let mut dist = vec![None; self.nodes.len()];
        if !self.contains(from) {
            return dist;
        }
        let mut q = VecDeque::new();
        dist[from.0] = Some(0);
        q.push_back(from);
        while let Some(v) = q.pop_front() {
            let dv = dist[v.0].unwrap_or(0);
            for nb in self.neighbors(v) {
                if dist[nb.0].is_none() {
                    dist[nb.0] = Some(dv + 1);
                    q.push_back(nb);
                }
            }
        }
        dist
    }

    /// 为每条边分配两端的本地端口。
    ///
    /// 每个节点按邻居 id 升序依次使用端口 1, 2, ...；只应在图定稿后调用一次。
    pub fn assign_ports(&self) -> Vec<Link> {
        let port_of = |node: NodeId, nbr: NodeId| -> Port {
            let rank = self.adj[node.0].range(..nbr).count();
            Port((rank + 1) as u16)
        };
        self.edges
            .iter()
            .map(|&(a, b)| {
                let kind = if self.is_host(a) || self.is_host(b) {
                    LinkKind::HostAttachment
                } else {
                    LinkKind::SwitchInterconnect
                };
                Link {
                    a,
                    b,
                    port_a: port_of(a, b),
                    port_b: port_of(b, a),
                    kind,
                }
            })
            .collect()
    }
}
