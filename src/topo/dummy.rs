//! 最小拓扑 `hx <-> sy <-> hz`
//!
//! 用于冒烟测试控制器。节点编号取自种子 RNG，以便检验控制面与仿真侧使用同一种子。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Topology, TopologyKind};
use crate::net::Graph;

pub fn build_dummy(seed: u64) -> Topology {
    let mut rng = StdRng::seed_from_u64(seed);
    let x: usize = rng.gen_range(0..10);

    let mut graph = Graph::new();
    let left = graph.add_host(format!("h{}", x));
    let right = graph.add_host(format!("h{}", x + 1));
    let switch = graph.add_switch(format!("s{}", x + 2));

    graph.add_edge(left, switch);
    graph.add_edge(switch, right);

    Topology::finalize(TopologyKind::Dummy, graph)
}
