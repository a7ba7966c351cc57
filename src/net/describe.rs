//! 拓扑描述导出
//!
//! 供外部仿真/仿真器（emulation harness）按同一份节点与链路列表搭建物理拓扑。
//! 同样的输入总是得到同样的 JSON。

use mac_address::MacAddress;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

use super::graph::Graph;
use super::link::{Link, LinkKind};
use super::node::NodeKind;

/// 节点类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescNodeKind {
    Host,
    Switch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub id: usize,
    pub name: String,
    pub kind: DescNodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dpid: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<MacAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<Ipv4Addr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkInfo {
    pub a: usize,
    pub b: usize,
    pub port_a: u16,
    pub port_b: u16,
    pub kind: LinkKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyDescription {
    pub kind: String,
    pub nodes: Vec<NodeInfo>,
    pub links: Vec<LinkInfo>,
}

impl TopologyDescription {
    pub fn new(kind: impl Into<String>, graph: &Graph, links: &[Link]) -> Self {
        let nodes = graph
            .nodes()
            .iter()
            .map(|n| match n.kind {
                NodeKind::Switch { dpid } => NodeInfo {
                    id: n.id.0,
                    name: n.name.clone(),
                    kind: DescNodeKind::Switch,
                    dpid: Some(dpid),
                    mac: None,
                    ip: None,
                },
                NodeKind::Host { mac, ip } => NodeInfo {
                    id: n.id.0,
                    name: n.name.clone(),
                    kind: DescNodeKind::Host,
                    dpid: None,
                    mac: Some(mac),
                    ip,
                },
            })
            .collect();
        let links = links
            .iter()
            .map(|l| LinkInfo {
                a: l.a.0,
                b: l.b.0,
                port_a: l.port_a.0,
                port_b: l.port_b.0,
                kind: l.kind,
            })
            .collect();
        Self {
            kind: kind.into(),
            nodes,
            links,
        }
    }
}
