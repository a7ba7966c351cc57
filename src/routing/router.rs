//! 控制器侧入口
//!
//! 持有定稿拓扑、端口映射与路由表，一次构建、之后只读共享。

use tracing::info;

use super::{FlowPathSelector, RoutingSpec, RoutingTable};
use crate::config::Config;
use crate::error::Error;
use crate::net::{NodeId, Port, PortMap, TopologyDescription};
use crate::topo::Topology;

#[derive(Debug, Clone)]
pub struct Router {
    topology: Topology,
    ports: PortMap,
    table: RoutingTable,
    hash_salt: u64,
}

impl Router {
    /// 从已定稿的拓扑构建：推导端口映射，再计算全部主机对的路由
    pub fn new(topology: Topology, spec: &RoutingSpec, hash_salt: u64) -> Result<Self, Error> {
        spec.validate()?;
        let ports = topology.port_map();
        let table = RoutingTable::build(&topology.graph, &ports, spec.policy, spec.max_paths)?;
        Ok(Self {
            topology,
            ports,
            table,
            hash_salt,
        })
    }

    /// 完整的启动流程：校验配置 -> 构建拓扑 -> 构建路由表
    pub fn from_config(cfg: &Config) -> Result<Self, Error> {
        cfg.validate()?;
        let topology = cfg.topology.build()?;
        info!(
            topology = %topology.kind,
            routing = %cfg.routing.label(),
            "开始构建路由"
        );
        Self::new(topology, &cfg.routing, cfg.hash_salt)
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn ports(&self) -> &PortMap {
        &self.ports
    }

    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    pub fn selector(&self) -> FlowPathSelector<'_> {
        FlowPathSelector::new(&self.topology, &self.table, &self.ports).with_hash_salt(self.hash_salt)
    }

    /// 交换机上线时查询其已知邻居；未知 dpid 返回 `None`（控制器应忽略该交换机）
    pub fn switch_neighbors(&self, dpid: u64) -> Option<(NodeId, &[(NodeId, Port)])> {
        let switch = self.topology.switch_by_dpid(dpid)?;
        Some((switch, self.ports.neighbors(switch)))
    }

    pub fn describe(&self) -> TopologyDescription {
        self.topology.describe()
    }
}
