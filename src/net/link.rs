//! 链路类型
//!
//! 无向链路，端点按 id 归一化（`a < b`），并记录两端各自使用的本地端口。

use serde::{Deserialize, Serialize};

use super::id::{NodeId, Port};

/// 链路类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// 主机接入链路（构建时即确定）
    HostAttachment,
    /// 交换机互联链路（由拓扑合成产生）
    SwitchInterconnect,
}

/// 带端口信息的无向链路
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub a: NodeId,
    pub b: NodeId,
    /// `a` 侧端口
    pub port_a: Port,
    /// `b` 侧端口
    pub port_b: Port,
    pub kind: LinkKind,
}

impl Link {
    /// 返回 `node` 的对端；`node` 不是端点时返回 `None`
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if node == self.a {
            Some(self.b)
        } else if node == self.b {
            Some(self.a)
        } else {
            None
        }
    }

    /// 返回 `node` 一侧的端口
    pub fn port_at(&self, node: NodeId) -> Option<Port> {
        if node == self.a {
            Some(self.port_a)
        } else if node == self.b {
            Some(self.port_b)
        } else {
            None
        }
    }
}

/// 把端点对归一化为 `(min, max)`
pub(crate) fn edge_key(x: NodeId, y: NodeId) -> (NodeId, NodeId) {
    if x <= y { (x, y) } else { (y, x) }
}
