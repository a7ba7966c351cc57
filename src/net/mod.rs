//! 网络拓扑模块
//!
//! 此模块包含拓扑的基本组成：节点、链路、拓扑图、端口映射以及对外导出的拓扑描述。

// 子模块声明
mod id;
mod node;
mod link;
mod graph;
mod ports;
mod describe;

// 重新导出公共接口
pub use id::{NodeId, Port};
pub use node::{MAX_HOSTS, Node, NodeKind, host_ip, host_mac, is_group_mac};
pub use link::{Link, LinkKind};
pub(crate) use link::edge_key;
pub use graph::Graph;
pub use ports::PortMap;
pub use describe::{DescNodeKind, LinkInfo, NodeInfo, TopologyDescription};
