//! 路由表
//!
//! 对每个有序主机对（而非任意节点对）预计算候选路径集合。中间交换机的身份
//! 通过沿路径行走得到，不单独查表。构建一次，之后只读。

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

use super::{Path, PathPolicy};
use crate::error::RouteError;
use crate::net::{Graph, NodeId, PortMap};

#[derive(Debug, Clone)]
pub struct RoutingTable {
    policy: PathPolicy,
    max_paths: usize,
    /// (src_host, dst_host) -> 候选路径（至多 `max_paths` 条）
    routes: HashMap<(NodeId, NodeId), Vec<Path>>,
}

impl RoutingTable {
    /// 为全部有序主机对构建路由表
    pub fn build(graph: &Graph, ports: &PortMap, policy: PathPolicy, max_paths: usize) -> Result<Self, RouteError> {
        let hosts = graph.host_ids();
        let pairs: Vec<(NodeId, NodeId)> = hosts
            .iter()
            .flat_map(|&src| {
                hosts
                    .iter()
                    .filter(move |&&dst| dst != src)
                    .map(move |&dst| (src, dst))
            })
            .collect();
        Self::build_for_pairs(graph, ports, policy, max_paths, &pairs)
    }

    /// 只为给定的主机对构建路由表。
    ///
    /// 不连通的主机对记为空集合；路径上任何一跳在端口映射中缺失都视为
    /// 拓扑与路由表不一致，整体失败。
    #[tracing::instrument(skip(graph, ports, pairs), fields(pairs = pairs.len()))]
    pub fn build_for_pairs(
        graph: &Graph,
        ports: &PortMap,
        policy: PathPolicy,
        max_paths: usize,
        pairs: &[(NodeId, NodeId)],
    ) -> Result<Self, RouteError> {
        let computed = pairs
            .par_iter()
            .map(|&(src, dst)| {
                let paths = match policy.paths(graph, src, dst, max_paths) {
                    Ok(paths) => paths,
                    Err(RouteError::NoPath { .. }) => {
                        debug!(src = ?src, dst = ?dst, "主机对不连通");
                        Vec::new()
                    }
                    Err(e) => return Err(e),
                };
                for path in &paths {
                    for hop in path.windows(2) {
                        ports.lookup(hop[0], hop[1])?;
                    }
                }
                Ok(((src, dst), paths))
            })
            .collect::<Result<Vec<_>, RouteError>>()?;

        let routes: HashMap<(NodeId, NodeId), Vec<Path>> = computed.into_iter().collect();
        let total_paths: usize = routes.values().map(Vec::len).sum();
        info!(
            policy = %policy,
            max_paths,
            pairs = routes.len(),
            total_paths,
            "路由表构建完成"
        );
        Ok(Self {
            policy,
            max_paths,
            routes,
        })
    }

    pub fn policy(&self) -> PathPolicy {
        self.policy
    }

    pub fn max_paths(&self) -> usize {
        self.max_paths
    }

    /// (src, dst) 的候选路径；未计算过的主机对返回 `None`
    pub fn get(&self, src: NodeId, dst: NodeId) -> Option<&[Path]> {
        self.routes.get(&(src, dst)).map(Vec::as_slice)
    }

    /// (src, dst) 的候选路径；未计算或不连通时为空
    pub fn paths(&self, src: NodeId, dst: NodeId) -> &[Path] {
        self.get(src, dst).unwrap_or(&[])
    }

    /// 已计算的主机对，按 (src, dst) 升序
    pub fn pairs(&self) -> Vec<(NodeId, NodeId)> {
        let mut pairs: Vec<_> = self.routes.keys().copied().collect();
        pairs.sort();
        pairs
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn describe(&self) -> RoutesDescription {
        let routes = self
            .pairs()
            .into_iter()
            .map(|(src, dst)| RouteEntry {
                src: src.0,
                dst: dst.0,
                paths: self
                    .paths(src, dst)
                    .iter()
                    .map(|p| p.iter().map(|n| n.0).collect())
                    .collect(),
            })
            .collect();
        RoutesDescription {
            policy: self.policy,
            max_paths: self.max_paths,
            routes,
        }
    }
}

/// 路由表导出（JSON）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutesDescription {
    pub policy: PathPolicy,
    pub max_paths: usize,
    pub routes: Vec<RouteEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub src: usize,
    pub dst: usize,
    pub paths: Vec<Vec<usize>>,
}
