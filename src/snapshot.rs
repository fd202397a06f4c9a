//! An immutable, read-only view of a [`Graph`] at a fixed logical time.
//!
//! `Snapshot` copies the history views it needs at construction time (the
//! "eager copy" option from the design notes, simpler than
//! watermark-and-filter, and adequate since snapshots are not expected to
//! be taken at a rate that makes an `O(N)` copy a bottleneck). Either
//! strategy satisfies the observable contract; callers must not depend on
//! allocation behavior.

use std::collections::BTreeMap;

use crate::graph::{EdgeView, Graph};
use crate::model::{Attributes, EdgeId, LogicalTime, NodeId};
use crate::timeline::{last_create_time, EntityHistory};
use crate::view::GraphView;

/// A read-only view of a [`Graph`]'s state as of a fixed logical time.
///
/// Once constructed, a `Snapshot` never observes later mutation of the
/// `Graph` it was built from, and is safe to share across threads (it
/// holds no reference to the live graph).
#[derive(Debug, Clone)]
pub struct Snapshot {
    time: LogicalTime,
    node_histories: BTreeMap<NodeId, EntityHistory>,
    edge_histories: BTreeMap<EdgeId, EntityHistory>,
    edge_endpoints: BTreeMap<EdgeId, (NodeId, NodeId)>,
}

impl Snapshot {
    /// Builds a snapshot of `graph` as of `time`, copying every entity's
    /// history so the snapshot remains valid after further mutation of
    /// `graph`.
    pub fn new(graph: &Graph, time: LogicalTime) -> Self {
        let node_histories = graph
            .node_ids_ever()
            .map(|id| (id.to_string(), graph.node_history(id).cloned().unwrap_or_default()))
            .collect();
        let edge_histories = graph
            .edge_ids_ever()
            .map(|id| (id.to_string(), graph.edge_history(id).cloned().unwrap_or_default()))
            .collect();
        Self {
            time,
            node_histories,
            edge_histories,
            edge_endpoints: graph.edge_endpoints.clone(),
        }
    }

    /// The logical time this snapshot is fixed at.
    pub fn time(&self) -> LogicalTime {
        self.time
    }

    /// Every node live at this snapshot's time, mapped to its effective
    /// attributes.
    pub fn get_nodes(&self) -> BTreeMap<NodeId, Attributes> {
        self.node_histories
            .iter()
            .filter_map(|(id, history)| {
                crate::timeline::effective_state(history, self.time).map(|attrs| (id.clone(), attrs))
            })
            .collect()
    }

    /// Every edge live at this snapshot's time whose endpoints are both
    /// live at this snapshot's time.
    pub fn get_edges(&self) -> BTreeMap<EdgeId, EdgeView> {
        self.edge_histories
            .iter()
            .filter_map(|(id, history)| {
                let attrs = crate::timeline::effective_state(history, self.time)?;
                let (source, target) = self.edge_endpoints.get(id)?;
                if !self.node_live(source) || !self.node_live(target) {
                    return None;
                }
                Some((
                    id.clone(),
                    EdgeView {
                        id: id.clone(),
                        source: source.clone(),
                        target: target.clone(),
                        attributes: attrs,
                    },
                ))
            })
            .collect()
    }

    fn node_live(&self, id: &str) -> bool {
        self.node_histories
            .get(id)
            .map(|h| crate::timeline::effective_state(h, self.time).is_some())
            .unwrap_or(false)
    }
}

impl GraphView for Snapshot {
    fn node_ids(&self) -> Vec<NodeId> {
        self.get_nodes().into_keys().collect()
    }

    fn edge_ids(&self) -> Vec<(EdgeId, NodeId, NodeId)> {
        self.get_edges()
            .into_values()
            .map(|e| (e.id, e.source, e.target))
            .collect()
    }

    fn has_node(&self, node: &str) -> bool {
        self.node_live(node)
    }

    fn out_edges(&self, node: &str) -> Vec<(EdgeId, NodeId)> {
        let mut pairs: Vec<(EdgeId, NodeId)> = self
            .get_edges()
            .into_values()
            .filter(|e| e.source == node)
            .map(|e| (e.id, e.target))
            .collect();
        pairs.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        pairs
    }

    fn in_edges(&self, node: &str) -> Vec<(EdgeId, NodeId)> {
        let mut pairs: Vec<(EdgeId, NodeId)> = self
            .get_edges()
            .into_values()
            .filter(|e| e.target == node)
            .map(|e| (e.id, e.source))
            .collect();
        pairs.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        pairs
    }

    fn edge_created_at(&self, edge: &str) -> Option<LogicalTime> {
        let history = self.edge_histories.get(edge)?;
        last_create_time(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Attributes;

    #[test]
    fn snapshot_before_edge_exists() {
        let mut g = Graph::new();
        g.add_node("X".into(), Attributes::new(), 1).unwrap();
        g.add_node("Y".into(), Attributes::new(), 2).unwrap();
        g.add_edge("E".into(), "X".into(), "Y".into(), Attributes::new(), 3)
            .unwrap();

        let before = Snapshot::new(&g, 2);
        assert!(before.get_edges().is_empty());

        let after = Snapshot::new(&g, 3);
        assert!(after.get_edges().contains_key("E"));
    }

    #[test]
    fn snapshot_is_immutable_to_later_mutation() {
        let mut g = Graph::new();
        g.add_node("A".into(), Attributes::new(), 1).unwrap();
        let snap = Snapshot::new(&g, 1);
        g.add_node("B".into(), Attributes::new(), 2).unwrap();
        assert_eq!(snap.get_nodes().len(), 1);
        assert_eq!(g.get_nodes().len(), 2);
    }

    #[test]
    fn edges_require_both_endpoints_live_at_time() {
        let mut g = Graph::new();
        g.add_node("A".into(), Attributes::new(), 1).unwrap();
        g.add_node("B".into(), Attributes::new(), 2).unwrap();
        g.add_edge("e1".into(), "A".into(), "B".into(), Attributes::new(), 3)
            .unwrap();
        g.del_node("B", 4).unwrap();
        // re-add B later without recreating the edge
        g.add_node("B".into(), Attributes::new(), 5).unwrap();

        let snap = Snapshot::new(&g, 5);
        assert!(!snap.get_edges().contains_key("e1"));
    }
}
