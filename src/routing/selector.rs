//! 按流选路与出端口解析
//!
//! 选择只依赖流标识与只读路由表：同一条流的所有包、以及持有同一张表的不同
//! 控制器实例，总是选中同一条路径。没有内部可变状态，多线程并发调用无需加锁。

use mac_address::MacAddress;
use std::net::Ipv4Addr;
use tracing::{debug, error, trace, warn};

use super::{Path, RoutingTable};
use crate::error::RouteError;
use crate::net::{NodeId, Port, PortMap, is_group_mac};
use crate::topo::Topology;

/// 传输层五元组，只参与哈希，不参与查表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FiveTuple {
    pub proto: u8,
    pub src_ip: Ipv4Addr,
    pub dst_ip: Ipv4Addr,
    pub src_port: u16,
    pub dst_port: u16,
}

/// 流标识：(src_host, dst_host) + 可选的五元组
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlowKey {
    pub src: NodeId,
    pub dst: NodeId,
    pub tuple: Option<FiveTuple>,
}

impl FlowKey {
    pub fn new(src: NodeId, dst: NodeId) -> Self {
        Self { src, dst, tuple: None }
    }

    pub fn with_tuple(mut self, tuple: FiveTuple) -> Self {
        self.tuple = Some(tuple);
        self
    }
}

/// packet-in 时控制器手上的二层/三层头部信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub src_mac: MacAddress,
    pub dst_mac: MacAddress,
    pub tuple: Option<FiveTuple>,
}

/// 转发决策
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forwarding {
    /// 从该端口转发
    Port(Port),
    /// 泛洪（广播目的地址或任何路由失败时的兜底）
    Flood,
}

#[derive(Debug, Clone, Copy)]
pub struct FlowPathSelector<'a> {
    topo: &'a Topology,
    table: &'a RoutingTable,
    ports: &'a PortMap,
    /// 用于 hashing 的盐（保证稳定且可控）
    hash_salt: u64,
}

impl<'a> FlowPathSelector<'a> {
    pub fn new(topo: &'a Topology, table: &'a RoutingTable, ports: &'a PortMap) -> Self {
        Self {
            topo,
            table,
            ports,
            hash_salt: 0,
        }
    }

    pub fn with_hash_salt(mut self, hash_salt: u64) -> Self {
        self.hash_salt = hash_salt;
        self
    }

    /// 确定性地选出该流使用的候选路径
    pub fn select_path(&self, key: &FlowKey) -> Result<&'a Path, RouteError> {
        let table: &'a RoutingTable = self.table;
        let paths = table.paths(key.src, key.dst);
        if paths.is_empty() {
            return Err(RouteError::NoRoute {
                src: key.src,
                dst: key.dst,
            });
        }
        let idx = (flow_hash(key, self.hash_salt) % paths.len() as u64) as usize;
        trace!(flow = ?key, idx, candidates = paths.len(), "选中候选路径");
        Ok(&paths[idx])
    }

    /// 解析 `current` 交换机上该流的出端口。
    ///
    /// `current` 不在选中的路径上（或已是路径终点）时返回
    /// [`RouteError::SwitchNotOnPath`]，不会换一条路径重试。
    pub fn resolve(&self, key: &FlowKey, current: NodeId) -> Result<Port, RouteError> {
        let path = self.select_path(key)?;
        let next = path
            .iter()
            .position(|&n| n == current)
            .and_then(|i| path.get(i + 1))
            .copied();
        let Some(next) = next else {
            return Err(RouteError::SwitchNotOnPath {
                switch: current,
                src: key.src,
                dst: key.dst,
                path: path.clone(),
            });
        };
        self.ports.lookup(current, next)
    }

    /// 面向 packet-in 的入口：所有失败都记录日志并退化为泛洪
    #[tracing::instrument(skip(self), fields(switch = ?current))]
    pub fn resolve_frame(&self, frame: &FrameHeader, current: NodeId) -> Forwarding {
        if is_group_mac(&frame.dst_mac) {
            debug!(dst = %frame.dst_mac, "广播/组播目的地址，泛洪");
            return Forwarding::Flood;
        }

        let lookup = |mac: &MacAddress| {
            self.topo
                .host_by_mac(mac)
                .ok_or(RouteError::UnknownHost(*mac))
        };
        let key = match (lookup(&frame.src_mac), lookup(&frame.dst_mac)) {
            (Ok(src), Ok(dst)) => FlowKey {
                src,
                dst,
                tuple: frame.tuple,
            },
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "未知主机，泛洪");
                return Forwarding::Flood;
            }
        };

        match self.resolve(&key, current) {
            Ok(port) => {
                debug!(flow = ?key, port = port.0, "转发");
                Forwarding::Port(port)
            }
            Err(e @ (RouteError::SwitchNotOnPath { .. } | RouteError::NotAdjacent { .. })) => {
                error!(flow = ?key, error = %e, "拓扑视图与路由表不一致，泛洪");
                Forwarding::Flood
            }
            Err(e) => {
                warn!(flow = ?key, error = %e, "无可用路由，泛洪");
                Forwarding::Flood
            }
        }
    }
}

/// 流标识的稳定哈希（splitmix64 逐字段折叠）
pub fn flow_hash(key: &FlowKey, salt: u64) -> u64 {
    let mut h = mix64(
        (key.src.0 as u64).wrapping_mul(0x9E3779B97F4A7C15) ^ (key.dst.0 as u64) ^ salt,
    );
    if let Some(t) = key.tuple {
        let ips = (u64::from(u32::from(t.src_ip)) << 32) | u64::from(u32::from(t.dst_ip));
        let l4 = (u64::from(t.proto) << 32) | (u64::from(t.src_port) << 16) | u64::from(t.dst_port);
        h = mix64(h ^ ips);
        h = mix64(h ^ l4);
    }
    h
}

/// 一个简单、确定性的 64-bit mixing（替代 RandomState，避免每次运行 hash 不稳定）。
fn mix64(mut x: u64) -> u64 {
    // splitmix64
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
