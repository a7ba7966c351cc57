//! 路径多样性统计
//!
//! 随机置换流量下，每条交换机互联链路出现在多少条不同候选路径上。
//! 用于对比 k 最短路与 ECMP 在 Jellyfish 上对链路的利用是否均衡。

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;

use super::RoutingTable;
use crate::net::{NodeId, edge_key};
use crate::topo::Topology;

/// 随机置换流量：每台主机恰好发往一台主机，也恰好被一台主机发往（可能是自己）
pub fn random_permutation<R: Rng + ?Sized>(hosts: &[NodeId], rng: &mut R) -> Vec<(NodeId, NodeId)> {
    let mut dsts = hosts.to_vec();
    dsts.shuffle(rng);
    hosts.iter().copied().zip(dsts).collect()
}

/// 每条交换机互联链路上的路径数；不在任何路径上的链路计 0
pub fn link_path_counts(
    topo: &Topology,
    table: &RoutingTable,
    pairs: &[(NodeId, NodeId)],
) -> BTreeMap<(NodeId, NodeId), usize> {
    let mut counts: BTreeMap<(NodeId, NodeId), usize> =
        topo.graph.switch_edges().map(|e| (e, 0)).collect();
    for &(src, dst) in pairs {
        if src == dst {
            continue;
        }
        for path in table.paths(src, dst) {
            for hop in path.windows(2) {
                if let Some(c) = counts.get_mut(&edge_key(hop[0], hop[1])) {
                    *c += 1;
                }
            }
        }
    }
    counts
}

/// 升序排列的计数（横轴为链路排名）
pub fn ranked_counts(counts: &BTreeMap<(NodeId, NodeId), usize>) -> Vec<usize> {
    let mut ranked: Vec<usize> = counts.values().copied().collect();
    ranked.sort_unstable();
    ranked
}
