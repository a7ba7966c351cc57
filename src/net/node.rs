//! 节点类型
//!
//! 拓扑中的节点只有两类：交换机与主机。主机的 MAC/IP 由其在全部主机中的
//! 序号（从 1 开始）确定性地推导，与 Mininet 的默认编址方式一致。

use mac_address::MacAddress;
use std::net::Ipv4Addr;

use super::id::NodeId;

/// 节点类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// 交换机；`dpid` 为交换机序号
    Switch { dpid: u64 },
    /// 主机（度数恒为 1）；序号超出 IPv4 编址范围的主机没有 IP
    Host { mac: MacAddress, ip: Option<Ipv4Addr> },
}

/// 拓扑节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
}

impl Node {
    /// 创建交换机节点
    pub fn switch(id: NodeId, name: impl Into<String>, dpid: u64) -> Self {
        Self {
            id,
            name: name.into(),
            kind: NodeKind::Switch { dpid },
        }
    }

    /// 创建主机节点；`ordinal` 为主机序号（从 1 开始）
    pub fn host(id: NodeId, name: impl Into<String>, ordinal: u32) -> Self {
        Self {
            id,
            name: name.into(),
            kind: NodeKind::Host {
                mac: host_mac(ordinal),
                ip: host_ip(ordinal),
            },
        }
    }

    pub fn is_switch(&self) -> bool {
        matches!(self.kind, NodeKind::Switch { .. })
    }

    pub fn is_host(&self) -> bool {
        matches!(self.kind, NodeKind::Host { .. })
    }

    pub fn mac(&self) -> Option<MacAddress> {
        match self.kind {
            NodeKind::Host { mac, .. } => Some(mac),
            NodeKind::Switch { .. } => None,
        }
    }

    pub fn ip(&self) -> Option<Ipv4Addr> {
        match self.kind {
            NodeKind::Host { ip, .. } => ip,
            NodeKind::Switch { .. } => None,
        }
    }

    pub fn dpid(&self) -> Option<u64> {
        match self.kind {
            NodeKind::Switch { dpid } => Some(dpid),
            NodeKind::Host { .. } => None,
        }
    }
}

/// 第 `ordinal` 台主机的 MAC：`00:00:` 后接大端序号
pub fn host_mac(ordinal: u32) -> MacAddress {
    let b = ordinal.to_be_bytes();
    MacAddress::new([0, 0, b[0], b[1], b[2], b[3]])
}

/// 可编址的主机数上限（`10.0.0.0/8` 去掉网络地址）
pub const MAX_HOSTS: usize = 0x00FF_FFFF;

/// 第 `ordinal` 台主机的 IP：`10.0.0.0 + ordinal`；超出 [`MAX_HOSTS`] 时为 `None`
pub fn host_ip(ordinal: u32) -> Option<Ipv4Addr> {
    if ordinal as usize > MAX_HOSTS {
        return None;
    }
    Some(Ipv4Addr::from(0x0A00_0000_u32 | ordinal))
}

/// 广播或组播 MAC（首字节最低位为 1）
pub fn is_group_mac(mac: &MacAddress) -> bool {
    mac.bytes()[0] & 0x01 == 0x01
}
