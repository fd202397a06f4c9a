use std::collections::HashMap;

use crate::view::GraphView;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Colour {
    White,
    Grey,
    Black,
}

/// Whether the graph, interpreted as directed, contains a cycle.
///
/// Directed DFS with the classic white/grey/black colouring: an edge into
/// a grey (on-stack) node closes a cycle. Self-loops count as a cycle.
pub fn has_cycle<V: GraphView + ?Sized>(view: &V) -> bool {
    let mut colour: HashMap<String, Colour> = view
        .node_ids()
        .into_iter()
        .map(|n| (n, Colour::White))
        .collect();

    let nodes: Vec<String> = colour.keys().cloned().collect();
    for start in nodes {
        if colour.get(&start) == Some(&Colour::White) && visit(view, &start, &mut colour) {
            return true;
        }
    }
    false
}

fn visit<V: GraphView + ?Sized>(
    view: &V,
    node: &str,
    colour: &mut HashMap<String, Colour>,
) -> bool {
    colour.insert(node.to_string(), Colour::Grey);
    for (_, target) in view.out_edges(node) {
        match colour.get(&target).copied().unwrap_or(Colour::White) {
            Colour::Grey => return true,
            Colour::White => {
                if visit(view, &target, colour) {
                    return true;
                }
            }
            Colour::Black => {}
        }
    }
    colour.insert(node.to_string(), Colour::Black);
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::model::Attributes;

    #[test]
    fn dag_has_no_cycle() {
        let mut g = Graph::new();
        for id in ["A", "B", "C"] {
            g.add_node(id.into(), Attributes::new(), 1).unwrap();
        }
        g.add_edge("ab".into(), "A".into(), "B".into(), Attributes::new(), 2)
            .unwrap();
        g.add_edge("bc".into(), "B".into(), "C".into(), Attributes::new(), 2)
            .unwrap();
        assert!(!has_cycle(&g));
    }

    #[test]
    fn back_edge_is_a_cycle() {
        let mut g = Graph::new();
        for id in ["A", "B", "C"] {
            g.add_node(id.into(), Attributes::new(), 1).unwrap();
        }
        g.add_edge("ab".into(), "A".into(), "B".into(), Attributes::new(), 2)
            .unwrap();
        g.add_edge("bc".into(), "B".into(), "C".into(), Attributes::new(), 2)
            .unwrap();
        g.add_edge("ca".into(), "C".into(), "A".into(), Attributes::new(), 2)
            .unwrap();
        assert!(has_cycle(&g));
    }

    #[test]
    fn self_loop_counts_as_a_cycle() {
        let mut g = Graph::new();
        g.add_node("A".into(), Attributes::new(), 1).unwrap();
        g.add_edge("aa".into(), "A".into(), "A".into(), Attributes::new(), 2)
            .unwrap();
        assert!(has_cycle(&g));
    }
}
