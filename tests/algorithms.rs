use chronograph::{algorithms, Graph, Snapshot};

fn attrs() -> chronograph::Attributes {
    chronograph::Attributes::new()
}

fn triangle_with_out_of_order_edges() -> Graph {
    let mut g = Graph::new();
    g.add_node("1".into(), attrs(), 1).unwrap();
    g.add_node("2".into(), attrs(), 1).unwrap();
    g.add_node("3".into(), attrs(), 1).unwrap();
    g.add_edge("e12".into(), "1".into(), "2".into(), attrs(), 5).unwrap();
    g.add_edge("e23".into(), "2".into(), "3".into(), attrs(), 4).unwrap();
    g
}

#[test]
fn reachability_ignores_time_but_time_respecting_reachability_does_not() {
    let g = triangle_with_out_of_order_edges();
    assert!(algorithms::is_reachable(&g, "1", "3"));
    assert!(!algorithms::is_time_respecting_reachable(&g, "1", "3"));
}

#[test]
fn shortest_path_matches_the_reference_scenario() {
    let mut g = Graph::new();
    for id in ["A", "B", "C", "D", "E"] {
        g.add_node(id.into(), attrs(), 1).unwrap();
    }
    g.add_edge("ab".into(), "A".into(), "B".into(), attrs(), 2).unwrap();
    g.add_edge("bc".into(), "B".into(), "C".into(), attrs(), 3).unwrap();
    g.add_edge("ad".into(), "A".into(), "D".into(), attrs(), 2).unwrap();
    g.add_edge("de".into(), "D".into(), "E".into(), attrs(), 3).unwrap();
    g.add_edge("ce".into(), "C".into(), "E".into(), attrs(), 4).unwrap();

    assert_eq!(algorithms::shortest_path(&g, "A", "E"), vec!["A", "D", "E"]);
}

#[test]
fn snapshot_before_edge_exists_has_no_edges() {
    let mut g = Graph::new();
    g.add_node("X".into(), attrs(), 1).unwrap();
    g.add_node("Y".into(), attrs(), 2).unwrap();
    g.add_edge("E".into(), "X".into(), "Y".into(), attrs(), 3).unwrap();

    let before = Snapshot::new(&g, 2);
    assert!(before.get_edges().is_empty());

    let after = Snapshot::new(&g, 3);
    assert!(after.get_edges().contains_key("E"));
}

#[test]
fn toposort_is_absent_exactly_when_a_cycle_exists() {
    let mut acyclic = Graph::new();
    for id in ["A", "B", "C"] {
        acyclic.add_node(id.into(), attrs(), 1).unwrap();
    }
    acyclic.add_edge("ab".into(), "A".into(), "B".into(), attrs(), 2).unwrap();
    acyclic.add_edge("bc".into(), "B".into(), "C".into(), attrs(), 2).unwrap();
    assert!(algorithms::topological_sort(&acyclic).is_some());
    assert!(!algorithms::has_cycle(&acyclic));

    let mut cyclic = Graph::new();
    for id in ["A", "B"] {
        cyclic.add_node(id.into(), attrs(), 1).unwrap();
    }
    cyclic.add_edge("ab".into(), "A".into(), "B".into(), attrs(), 2).unwrap();
    cyclic.add_edge("ba".into(), "B".into(), "A".into(), attrs(), 2).unwrap();
    assert!(algorithms::topological_sort(&cyclic).is_none());
    assert!(algorithms::has_cycle(&cyclic));
}

#[test]
fn weakly_connected_components_treats_edges_as_undirected() {
    let mut g = Graph::new();
    for id in ["A", "B", "C", "Z"] {
        g.add_node(id.into(), attrs(), 1).unwrap();
    }
    g.add_edge("ab".into(), "A".into(), "B".into(), attrs(), 2).unwrap();
    g.add_edge("cb".into(), "C".into(), "B".into(), attrs(), 2).unwrap();

    let components = algorithms::weakly_connected_components(&g);
    assert_eq!(components.len(), 2);
    assert_eq!(components[0], vec!["A".to_string(), "B".to_string(), "C".to_string()]);
    assert_eq!(components[1], vec!["Z".to_string()]);
}
