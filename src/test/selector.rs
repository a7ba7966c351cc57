use crate::error::RouteError;
use crate::net::{NodeId, host_mac};
use crate::routing::{
    FiveTuple, FlowKey, FlowPathSelector, Forwarding, FrameHeader, PathPolicy, Router, RoutingSpec, RoutingTable,
    flow_hash,
};
use crate::topo::jellyfish::{JellyfishOpts, build_jellyfish};
use mac_address::MacAddress;
use std::collections::HashSet;
use std::net::Ipv4Addr;

fn router(policy: PathPolicy, max_paths: usize) -> Router {
    let topo = build_jellyfish(&JellyfishOpts {
        n: 10,
        k: 5,
        r: 4,
        seed: 11,
    })
    .unwrap();
    Router::new(topo, &RoutingSpec::new(policy, max_paths), 0).unwrap()
}

fn tuple(sport: u16) -> FiveTuple {
    FiveTuple {
        proto: 6,
        src_ip: Ipv4Addr::new(10, 0, 0, 1),
        dst_ip: Ipv4Addr::new(10, 0, 0, 2),
        src_port: sport,
        dst_port: 80,
    }
}

#[test]
fn selection_is_deterministic_across_instances() {
    let a = router(PathPolicy::KShortest, 8);
    let b = router(PathPolicy::KShortest, 8);
    let hosts = &a.topology().hosts;
    for &src in hosts {
        for &dst in hosts {
            if src == dst {
                continue;
            }
            let key = FlowKey::new(src, dst);
            let pa = a.selector().select_path(&key).unwrap();
            let pb = b.selector().select_path(&key).unwrap();
            assert_eq!(pa, pb);
            assert_eq!(a.selector().select_path(&key).unwrap(), pa);
        }
    }
}

#[test]
fn five_tuple_spreads_flows_over_candidates() {
    let r = router(PathPolicy::KShortest, 8);
    let (src, dst) = (r.topology().hosts[0], r.topology().hosts[9]);
    let candidates = r.table().paths(src, dst).len();
    assert!(candidates > 1);

    let mut used = HashSet::new();
    for sport in 0..256 {
        let key = FlowKey::new(src, dst).with_tuple(tuple(sport));
        used.insert(r.selector().select_path(&key).unwrap().clone());
    }
    assert!(used.len() > 1);
    assert!(used.len() <= candidates);
}

#[test]
fn hash_depends_on_salt_and_tuple() {
    let key = FlowKey::new(NodeId(1), NodeId(2));
    assert_eq!(flow_hash(&key, 0), flow_hash(&key, 0));
    assert_ne!(flow_hash(&key, 0), flow_hash(&key, 1));
    assert_ne!(flow_hash(&key, 0), flow_hash(&key.with_tuple(tuple(1)), 0));
    assert_ne!(
        flow_hash(&key.with_tuple(tuple(1)), 0),
        flow_hash(&key.with_tuple(tuple(2)), 0)
    );
    assert_ne!(flow_hash(&key, 0), flow_hash(&FlowKey::new(NodeId(2), NodeId(1)), 0));
}

#[test]
fn resolve_walks_the_selected_path() {
    let r = router(PathPolicy::Ecmp, 8);
    let sel = r.selector();
    for &src in &r.topology().hosts {
        for &dst in &r.topology().hosts {
            if src == dst {
                continue;
            }
            let key = FlowKey::new(src, dst);
            let path = sel.select_path(&key).unwrap();
            for hop in path.windows(2) {
                let port = sel.resolve(&key, hop[0]).unwrap();
                assert_eq!(Ok(port), r.ports().lookup(hop[0], hop[1]));
            }
        }
    }
}

#[test]
fn switch_off_path_is_an_error() {
    let r = router(PathPolicy::Ecmp, 1);
    let sel = r.selector();
    let (src, dst) = (r.topology().hosts[0], r.topology().hosts[5]);
    let key = FlowKey::new(src, dst);
    let path = sel.select_path(&key).unwrap().clone();

    let off = r
        .topology()
        .switches
        .iter()
        .copied()
        .find(|s| !path.contains(s))
        .unwrap();
    match sel.resolve(&key, off) {
        Err(RouteError::SwitchNotOnPath { switch, path: p, .. }) => {
            assert_eq!(switch, off);
            assert_eq!(p, path);
        }
        other => panic!("unexpected {other:?}"),
    }
    // 路径终点没有下一跳
    assert!(matches!(
        sel.resolve(&key, dst),
        Err(RouteError::SwitchNotOnPath { .. })
    ));
}

#[test]
fn missing_route_is_reported() {
    let r = router(PathPolicy::Ecmp, 8);
    let key = FlowKey::new(r.topology().switches[0], r.topology().switches[1]);
    assert!(matches!(
        r.selector().select_path(&key),
        Err(RouteError::NoRoute { .. })
    ));
}

#[test]
fn frames_resolve_by_mac_and_flood_on_failure() {
    let r = router(PathPolicy::Ecmp, 8);
    let topo = r.topology();
    let sel = r.selector();
    let (src, dst) = (topo.hosts[0], topo.hosts[7]);
    let mac = |id| topo.graph.node(id).and_then(|n| n.mac()).unwrap();
    let first_switch = topo.host_switch(src).unwrap();

    let frame = FrameHeader {
        src_mac: mac(src),
        dst_mac: mac(dst),
        tuple: None,
    };
    let expected = sel.resolve(&FlowKey::new(src, dst), first_switch).unwrap();
    assert_eq!(sel.resolve_frame(&frame, first_switch), Forwarding::Port(expected));

    let broadcast = FrameHeader {
        dst_mac: MacAddress::new([0xff; 6]),
        ..frame
    };
    assert_eq!(sel.resolve_frame(&broadcast, first_switch), Forwarding::Flood);

    let unknown = FrameHeader {
        dst_mac: host_mac(9_999),
        ..frame
    };
    assert_eq!(sel.resolve_frame(&unknown, first_switch), Forwarding::Flood);

    let path = sel.select_path(&FlowKey::new(src, dst)).unwrap();
    let off = topo.switches.iter().copied().find(|s| !path.contains(s)).unwrap();
    assert_eq!(sel.resolve_frame(&frame, off), Forwarding::Flood);
}

#[test]
fn selector_over_borrowed_parts() {
    let r = router(PathPolicy::KShortest, 2);
    let table = RoutingTable::build(
        &r.topology().graph,
        r.ports(),
        PathPolicy::KShortest,
        2,
    )
    .unwrap();
    let sel = FlowPathSelector::new(r.topology(), &table, r.ports()).with_hash_salt(0);
    let key = FlowKey::new(r.topology().hosts[1], r.topology().hosts[2]);
    assert_eq!(sel.select_path(&key), r.selector().select_path(&key));
}

#[test]
fn switch_neighbors_by_dpid() {
    let r = router(PathPolicy::Ecmp, 8);
    let (id, nbs) = r.switch_neighbors(0).unwrap();
    assert_eq!(id, r.topology().switches[0]);
    assert_eq!(nbs.len(), 5);
    assert!(r.switch_neighbors(10_000).is_none());
    assert_eq!(r.describe(), r.topology().describe());
}
