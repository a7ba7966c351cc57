//! 路由（含 ECMP / k 最短路）支持
//!
//! 启动时对所有有序主机对预计算候选路径集合（[`RoutingTable`]），
//! 之后按流确定性地选出其中一条，并在当前交换机上解析出出端口（[`FlowPathSelector`]）。

mod policy;
mod ksp;
mod ecmp;
mod table;
mod selector;
mod router;
pub mod diversity;

use crate::net::NodeId;

/// 从源到目的（含两端）的节点序列
pub type Path = Vec<NodeId>;

pub use policy::{DEFAULT_MAX_PATHS, PathPolicy, RoutingSpec};
pub use ksp::k_shortest_paths;
pub use ecmp::ecmp_paths;
pub use table::{RouteEntry, RoutesDescription, RoutingTable};
pub use selector::{FiveTuple, FlowKey, FlowPathSelector, Forwarding, FrameHeader, flow_hash};
pub use router::Router;
