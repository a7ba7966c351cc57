use crate::routing::RoutingTable;
use crate::routing::diversity::{link_path_counts, random_permutation, ranked_counts};
use crate::routing::PathPolicy;
use crate::topo::jellyfish::{JellyfishOpts, build_jellyfish};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;

#[test]
fn permutation_is_a_bijection() {
    let topo = build_jellyfish(&JellyfishOpts {
        n: 12,
        k: 4,
        r: 3,
        seed: 0,
    })
    .unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    let pairs = random_permutation(&topo.hosts, &mut rng);
    assert_eq!(pairs.len(), topo.hosts.len());

    let srcs: HashSet<_> = pairs.iter().map(|p| p.0).collect();
    let dsts: HashSet<_> = pairs.iter().map(|p| p.1).collect();
    let hosts: HashSet<_> = topo.hosts.iter().copied().collect();
    assert_eq!(srcs, hosts);
    assert_eq!(dsts, hosts);

    let mut again = StdRng::seed_from_u64(1);
    assert_eq!(random_permutation(&topo.hosts, &mut again), pairs);
}

#[test]
fn counts_cover_every_switch_link() {
    let topo = build_jellyfish(&JellyfishOpts {
        n: 12,
        k: 4,
        r: 3,
        seed: 0,
    })
    .unwrap();
    let ports = topo.port_map();
    let mut rng = StdRng::seed_from_u64(2);
    let pairs: Vec<_> = random_permutation(&topo.hosts, &mut rng)
        .into_iter()
        .filter(|(s, d)| s != d)
        .collect();
    let table = RoutingTable::build_for_pairs(&topo.graph, &ports, PathPolicy::KShortest, 8, &pairs).unwrap();

    let counts = link_path_counts(&topo, &table, &pairs);
    assert_eq!(counts.len(), topo.graph.switch_edges().count());

    // 每条路径经过的交换机互联链路数 = 路径长度 - 3（去掉两段主机接入链路）
    let expected: usize = pairs
        .iter()
        .flat_map(|&(s, d)| table.paths(s, d))
        .map(|p| p.len() - 3)
        .sum();
    assert_eq!(counts.values().sum::<usize>(), expected);

    let ranked = ranked_counts(&counts);
    assert_eq!(ranked.len(), counts.len());
    assert!(ranked.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn self_pairs_contribute_nothing() {
    let topo = build_jellyfish(&JellyfishOpts::default()).unwrap();
    let ports = topo.port_map();
    let table = RoutingTable::build(&topo.graph, &ports, PathPolicy::Ecmp, 8).unwrap();
    let pairs: Vec<_> = topo.hosts.iter().map(|&h| (h, h)).collect();
    let counts = link_path_counts(&topo, &table, &pairs);
    assert_eq!(counts.len(), 4);
    assert!(counts.values().all(|&c| c == 0));
}
