use std::collections::HashMap;

use crate::model::NodeId;
use crate::view::GraphView;

struct UnionFind {
    parent: HashMap<NodeId, NodeId>,
}

impl UnionFind {
    fn new(nodes: impl IntoIterator<Item = NodeId>) -> Self {
        let parent = nodes.into_iter().map(|n| (n.clone(), n)).collect();
        Self { parent }
    }

    fn find(&mut self, node: &str) -> NodeId {
        let parent = self.parent.get(node).cloned().unwrap_or_else(|| node.to_string());
        if parent == node {
            return parent;
        }
        let root = self.find(&parent);
        self.parent.insert(node.to_string(), root.clone());
        root
    }

    fn union(&mut self, a: &str, b: &str) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            // Deterministic: smaller root string wins, independent of
            // union order, so component membership never depends on the
            // order edges are visited in.
            if ra < rb {
                self.parent.insert(rb, ra);
            } else {
                self.parent.insert(ra, rb);
            }
        }
    }
}

/// Connected components of the graph treated as undirected.
///
/// Each inner list is sorted lexicographically; the outer list is ordered
/// by each component's smallest node id. Isolated nodes form their own
/// singleton component.
pub fn weakly_connected_components<V: GraphView + ?Sized>(view: &V) -> Vec<Vec<NodeId>> {
    let nodes = view.node_ids();
    let mut uf = UnionFind::new(nodes.iter().cloned());

    for (_, source, target) in view.edge_ids() {
        uf.union(&source, &target);
    }

    let mut groups: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
    for node in &nodes {
        let root = uf.find(node);
        groups.entry(root).or_default().push(node.clone());
    }

    let mut components: Vec<Vec<NodeId>> = groups
        .into_values()
        .map(|mut members| {
            members.sort();
            members
        })
        .collect();
    components.sort_by(|a, b| a.first().cmp(&b.first()));
    components
}
