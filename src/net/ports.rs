//! 端口映射
//!
//! 由定稿拓扑的链路列表一次性构建：(node, neighbor) -> node 侧本地端口。

use std::collections::HashMap;

use super::id::{NodeId, Port};
use super::link::Link;
use crate::error::RouteError;

#[derive(Debug, Default, Clone)]
pub struct PortMap {
    ports: HashMap<(NodeId, NodeId), Port>,
    /// node -> [(neighbor, port)]，按端口升序
    by_node: HashMap<NodeId, Vec<(NodeId, Port)>>,
}

impl PortMap {
    /// 双向记录每条链路两端的端口
    pub fn from_links(links: &[Link]) -> Self {
        let mut ports = HashMap::with_capacity(links.len() * 2);
        let mut by_node: HashMap<NodeId, Vec<(NodeId, Port)>> = HashMap::new();
        for l in links {
            ports.insert((l.a, l.b), l.port_a);
            ports.insert((l.b, l.a), l.port_b);
            by_node.entry(l.a).or_default().push((l.b, l.port_a));
            by_node.entry(l.b).or_default().push((l.a, l.port_b));
        }
        for list in by_node.values_mut() {
            list.sort_by_key(|&(_, p)| p);
        }
        Self { ports, by_node }
    }

    /// `node` 通往 `neighbor` 使用的本地端口
    pub fn lookup(&self, node: NodeId, neighbor: NodeId) -> Result<Port, RouteError> {
        self.ports
            .get(&(node, neighbor))
            .copied()
            .ok_or(RouteError::NotAdjacent { node, neighbor })
    }

    /// `node` 的全部邻居及其端口
    pub fn neighbors(&self, node: NodeId) -> &[(NodeId, Port)] {
        self.by_node.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 记录的有向 (node, neighbor) 条目数，即链路数的两倍
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}
