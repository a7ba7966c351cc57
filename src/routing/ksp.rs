//! k 条最短简单路径（Yen 算法，单位边权）
//!
//! 每轮以上一条已选路径的每个节点为偏离点，屏蔽根路径上的节点以及
//! 已选路径在该偏离点使用过的边，再用 BFS 求偏离段。候选按
//! (跳数, 节点序列) 排序，保证长度不减且并列时结果确定。

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use super::Path;
use crate::error::RouteError;
use crate::net::{Graph, NodeId, edge_key};

pub fn k_shortest_paths(graph: &Graph, src: NodeId, dst: NodeId, k: usize) -> Result<Vec<Path>, RouteError> {
    if k == 0 {
        let reachable = graph.hop_distances(src).get(dst.0).copied().flatten().is_some();
        return if reachable { Ok(Vec::new()) } else { Err(RouteError::NoPath { src, dst }) };
    }
    let first = bfs_path(graph, src, dst, &HashSet::new(), &HashSet::new())
        .ok_or(RouteError::NoPath { src, dst })?;

    let mut accepted: Vec<Path> = vec![first];
    let mut candidates: BTreeSet<(usize, Path)> = BTreeSet::new();

    while accepted.len() < k {
        let prev = accepted[accepted.len() - 1].clone();
        for i in 0..prev.len().saturating_sub(1) {
            let spur = prev[i];
            let root = &prev[..=i];

            let mut blocked_edges = HashSet::new();
            for p in &accepted {
                if p.len() > i + 1 && p[..=i] == *root {
                    blocked_edges.insert(edge_key(p[i], p[i + 1]));
                }
            }
            let blocked_nodes: HashSet<NodeId> = root[..i].iter().copied().collect();

            if let Some(spur_path) = bfs_path(graph, spur, dst, &blocked_nodes, &blocked_edges) {
                let mut total = root[..i].to_vec();
                total.extend(spur_path);
                if !accepted.contains(&total) {
                    candidates.insert((total.len(), total));
                }
            }
        }

        let Some((_, next)) = candidates.pop_first() else {
            break;
        };
        accepted.push(next);
    }

    Ok(accepted)
}

/// 避开 `blocked_nodes` 与 `blocked_edges` 的 BFS 最短路；邻居按 id 升序扩展
fn bfs_path(
    graph: &Graph,
    from: NodeId,
    to: NodeId,
    blocked_nodes: &HashSet<NodeId>,
    blocked_edges: &HashSet<(NodeId, NodeId)>,
) -> Option<Path> {
    if from == to {
        return Some(vec![from]);
    }
    let mut parent: HashMap<NodeId, NodeId> = HashMap::new();
    let mut q = VecDeque::new();
    q.push_back(from);
    parent.insert(from, from);

    while let Some(v) = q.pop_front() {
        for nb in graph.neighbors(v) {
            if parent.contains_key(&nb)
                || blocked_nodes.contains(&nb)
                || blocked_edges.contains(&edge_key(v, nb))
            {
                continue;
            }
            parent.insert(nb, v);
            if nb == to {
                let mut path = vec![to];
                let mut cur = to;
                while cur != from {
                    cur = parent[&cur];
                    path.push(cur);
                }
                path.reverse();
                return Some(path);
            }
            q.push_back(nb);
        }
    }
    None
}
