use crate::error::RouteError;
use crate::net::{Graph, LinkKind, MAX_HOSTS, NodeId, Port, PortMap, host_ip, host_mac, is_group_mac};
use mac_address::MacAddress;
use std::net::Ipv4Addr;

fn triangle_with_host() -> (Graph, [NodeId; 4]) {
    let mut g = Graph::new();
    let s0 = g.add_switch("s0");
    let s1 = g.add_switch("s1");
    let s2 = g.add_switch("s2");
    let h = g.add_host("h0");
    g.add_edge(s0, s1);
    g.add_edge(s1, s2);
    g.add_edge(s2, s0);
    g.add_edge(h, s1);
    (g, [s0, s1, s2, h])
}

#[test]
fn add_edge_rejects_self_loops_and_duplicates() {
    let (mut g, [s0, s1, _, _]) = triangle_with_host();
    assert!(!g.add_edge(s0, s0));
    assert!(!g.add_edge(s1, s0));
    assert!(!g.add_edge(s0, NodeId(99)));
    assert_eq!(g.edge_count(), 4);

    assert!(g.remove_edge(s1, s0));
    assert!(!g.has_edge(s0, s1));
    assert!(!g.remove_edge(s0, s1));
}

#[test]
fn ports_follow_neighbor_id_order() {
    let (g, [s0, s1, s2, h]) = triangle_with_host();
    let links = g.assign_ports();
    assert_eq!(links.len(), 4);

    let ports = PortMap::from_links(&links);
    // s1 的邻居按 id 升序：s0, s2, h
    assert_eq!(ports.lookup(s1, s0), Ok(Port(1)));
    assert_eq!(ports.lookup(s1, s2), Ok(Port(2)));
    assert_eq!(ports.lookup(s1, h), Ok(Port(3)));
    assert_eq!(ports.lookup(h, s1), Ok(Port(1)));
    assert_eq!(ports.neighbors(s1), &[(s0, Port(1)), (s2, Port(2)), (h, Port(3))]);

    let host_link = links.iter().find(|l| l.other(h) == Some(s1)).unwrap();
    assert_eq!(host_link.kind, LinkKind::HostAttachment);
    assert!(
        links
            .iter()
            .filter(|l| l.other(h).is_none())
            .all(|l| l.kind == LinkKind::SwitchInterconnect)
    );
}

#[test]
fn port_map_round_trips_every_link() {
    let (g, _) = triangle_with_host();
    let links = g.assign_ports();
    let ports = PortMap::from_links(&links);
    assert_eq!(ports.len(), links.len() * 2);

    for l in &links {
        assert_eq!(ports.lookup(l.a, l.b), Ok(l.port_a));
        assert_eq!(ports.lookup(l.b, l.a), Ok(l.port_b));
        assert_eq!(l.port_at(l.a), Some(l.port_a));
        assert_eq!(l.port_at(l.b), Some(l.port_b));

        let back = ports
            .neighbors(l.b)
            .iter()
            .find(|&&(_, p)| p == l.port_b)
            .map(|&(n, _)| n);
        assert_eq!(back, Some(l.a));
    }
}

#[test]
fn lookup_of_non_adjacent_pair_fails() {
    let (g, [s0, _, _, h]) = triangle_with_host();
    let ports = PortMap::from_links(&g.assign_ports());
    assert_eq!(
        ports.lookup(s0, h),
        Err(RouteError::NotAdjacent {
            node: s0,
            neighbor: h
        })
    );
    assert!(ports.neighbors(NodeId(42)).is_empty());
}

#[test]
fn hop_distances_mark_unreachable_nodes() {
    let mut g = Graph::new();
    let a = g.add_switch("a");
    let b = g.add_switch("b");
    let c = g.add_switch("c");
    g.add_edge(a, b);
    let dist = g.hop_distances(a);
    assert_eq!(dist, vec![Some(0), Some(1), None]);
    assert_eq!(g.hop_distances(NodeId(7)), vec![None; 3]);
    assert_eq!(g.degree(c), 0);
}

#[test]
fn host_addresses_follow_ordinal() {
    assert_eq!(host_mac(1).to_string(), "00:00:00:00:00:01");
    assert_eq!(host_mac(0x1234).bytes(), [0, 0, 0, 0, 0x12, 0x34]);
    assert_eq!(host_ip(1), Some(Ipv4Addr::new(10, 0, 0, 1)));
    assert_eq!(host_ip(300), Some(Ipv4Addr::new(10, 0, 1, 44)));
    assert_eq!(host_ip(MAX_HOSTS as u32), Some(Ipv4Addr::new(10, 255, 255, 255)));
    // 超出 10.0.0.0/8 时不回绕
    assert_eq!(host_ip(MAX_HOSTS as u32 + 1), None);

    let mut g = Graph::new();
    let s = g.add_switch("s0");
    let h1 = g.add_host("h1");
    let h2 = g.add_host("h2");
    assert_eq!(g.node(s).and_then(|n| n.dpid()), Some(0));
    assert_eq!(g.node(h1).and_then(|n| n.mac()), Some(host_mac(1)));
    assert_eq!(g.node(h2).and_then(|n| n.ip()), host_ip(2));
    assert_eq!(g.node(s).and_then(|n| n.mac()), None);
}

#[test]
fn group_mac_detection() {
    assert!(is_group_mac(&MacAddress::new([0xff; 6])));
    assert!(is_group_mac(&MacAddress::new([0x01, 0x00, 0x5e, 0, 0, 1])));
    assert!(is_group_mac(&MacAddress::new([0x33, 0x33, 0, 0, 0, 1])));
    assert!(!is_group_mac(&host_mac(5)));
}
