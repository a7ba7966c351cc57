//! 等价最短路径枚举
//!
//! 在目的节点出发的 BFS 距离上，从源节点沿"距离减一"的邻居深度优先展开；
//! 邻居按 id 升序访问，因此超过 K 条时的截断是稳定、可复现的（字典序前 K 条）。

use super::Path;
use crate::error::RouteError;
use crate::net::{Graph, NodeId};

pub fn ecmp_paths(graph: &Graph, src: NodeId, dst: NodeId, k: usize) -> Result<Vec<Path>, RouteError> {
    let dist = graph.hop_distances(dst);
    let Some(d) = dist.get(src.0).copied().flatten() else {
        return Err(RouteError::NoPath { src, dst });
    };

    let mut out = Vec::new();
    if k == 0 {
        return Ok(out);
    }
    let mut path = Vec::with_capacity(d + 1);
    path.push(src);
    walk(graph, &dist, dst, &mut path, k, &mut out);
    Ok(out)
}

fn walk(
    graph: &Graph,
    dist: &[Option<usize>],
    dst: NodeId,
    path: &mut Path,
    k: usize,
    out: &mut Vec<Path>,
) {
    let Some(&at) = path.last() else {
        return;
    };
    if at == dst {
        out.push(path.clone());
        return;
    }
    let Some(d_at) = dist[at.0] else {
        return;
    };
    for nb in graph.neighbors(at) {
        if dist[nb.0].is_some_and(|d| d + 1 == d_at) {
            path.push(nb);
            walk(graph, dist, dst, path, k, out);
            path.pop();
            if out.len() >= k {
                return;
            }
        }
    }
}
