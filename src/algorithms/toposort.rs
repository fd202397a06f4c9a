use std::collections::{BTreeSet, HashMap};

use crate::model::NodeId;
use crate::view::GraphView;

/// A topological ordering of the graph's nodes, or `None` if the graph
/// (interpreted as directed) contains a cycle.
///
/// Kahn's algorithm: repeatedly remove a zero-in-degree node. Ties among
/// simultaneously-available zero-in-degree nodes are broken
/// lexicographically, making the output deterministic.
///
/// `topological_sort(g).is_none()` iff `has_cycle(g)`. The two share no
/// code path, so this equivalence is also covered by tests and proptest
/// invariants rather than assumed.
pub fn topological_sort<V: GraphView + ?Sized>(view: &V) -> Option<Vec<NodeId>> {
    let nodes = view.node_ids();
    let mut in_degree: HashMap<NodeId, usize> = nodes.iter().cloned().map(|n| (n, 0)).collect();
    for (_, _, target) in view.edge_ids() {
        *in_degree.entry(target).or_insert(0) += 1;
    }

    let mut ready: BTreeSet<NodeId> = in_degree
        .iter()
        .filter(|(_, deg)| **deg == 0)
        .map(|(n, _)| n.clone())
        .collect();

    let mut order = Vec::with_capacity(nodes.len());
    while let Some(node) = ready.iter().next().cloned() {
        ready.remove(&node);
        order.push(node.clone());
        for (_, target) in view.out_edges(&node) {
            if let Some(deg) = in_degree.get_mut(&target) {
                *deg -= 1;
                if *deg == 0 {
                    ready.insert(target);
                }
            }
        }
    }

    if order.len() == nodes.len() {
        Some(order)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::has_cycle;
    use crate::graph::Graph;
    use crate::model::Attributes;

    #[test]
    fn orders_a_chain_and_agrees_with_has_cycle() {
        let mut g = Graph::new();
        for id in ["A", "B", "C"] {
            g.add_node(id.into(), Attributes::new(), 1).unwrap();
        }
        g.add_edge("ab".into(), "A".into(), "B".into(), Attributes::new(), 2)
            .unwrap();
        g.add_edge("bc".into(), "B".into(), "C".into(), Attributes::new(), 2)
            .unwrap();

        let order = topological_sort(&g).expect("acyclic graph has an ordering");
        assert!(order.iter().position(|n| n == "A") < order.iter().position(|n| n == "B"));
        assert!(order.iter().position(|n| n == "B") < order.iter().position(|n| n == "C"));
        assert!(!has_cycle(&g));
    }

    #[test]
    fn cyclic_graph_has_no_ordering() {
        let mut g = Graph::new();
        for id in ["A", "B"] {
            g.add_node(id.into(), Attributes::new(), 1).unwrap();
        }
        g.add_edge("ab".into(), "A".into(), "B".into(), Attributes::new(), 2)
            .unwrap();
        g.add_edge("ba".into(), "B".into(), "A".into(), Attributes::new(), 2)
            .unwrap();

        assert!(topological_sort(&g).is_none());
        assert!(has_cycle(&g));
    }

    #[test]
    fn ties_break_lexicographically() {
        let mut g = Graph::new();
        for id in ["C", "A", "B"] {
            g.add_node(id.into(), Attributes::new(), 1).unwrap();
        }
        // no edges: all three are zero in-degree simultaneously
        assert_eq!(topological_sort(&g), Some(vec!["A".to_string(), "B".to_string(), "C".to_string()]));
    }
}
