//! The mutable working view over a pair of [`TimelineStore`]s, maintaining
//! current adjacency for O(1) current-state access.
//!
//! The timeline store owns every node's and edge's history; `Graph` owns
//! the adjacency indexes derived from it (design note: cyclic references
//! between node, adjacency, and edge are resolved by storing `EdgeId`s in
//! the adjacency maps rather than direct references, with lookups always
//! going through the owning timeline).

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::error::{reject, ChronoError, Result};
use crate::model::{Attributes, EdgeId, Event, LogicalTime, NodeId};
use crate::timeline::{last_create_time, EntityHistory, TimelineStore};
use crate::view::GraphView;

/// An edge's effective state as returned by [`Graph::get_edges`] and
/// [`crate::snapshot::Snapshot::get_edges`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeView {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub attributes: Attributes,
}

/// The live, mutable working view of a temporal property graph.
///
/// `Graph` is not reentrant: mutating calls must be externally serialized
/// to a single writer, per the concurrency model. Constructing a
/// [`crate::snapshot::Snapshot`] over a `Graph` and reading from the
/// snapshot is safe to do concurrently with further mutation of the
/// `Graph`.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub(crate) nodes: TimelineStore,
    pub(crate) edges: TimelineStore,
    pub(crate) edge_endpoints: BTreeMap<EdgeId, (NodeId, NodeId)>,
    pub(crate) outgoing: BTreeMap<NodeId, BTreeSet<EdgeId>>,
    pub(crate) incoming: BTreeMap<NodeId, BTreeSet<EdgeId>>,
    current_time: LogicalTime,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// The maximum logical time seen across every mutation so far (0 for
    /// an empty graph). Used by `get_nodes`/`get_edges` as "now", and
    /// equal by invariant to `Snapshot(self, now).get_nodes()/get_edges()`.
    pub fn now(&self) -> LogicalTime {
        self.current_time
    }

    fn observe_time(&mut self, time: LogicalTime) {
        self.current_time = self.current_time.max(time);
    }

    fn node_currently_live(&self, id: &str) -> bool {
        matches!(self.nodes.history(id), Ok(h) if is_live_tail(h))
    }

    fn edge_currently_live(&self, id: &str) -> bool {
        matches!(self.edges.history(id), Ok(h) if is_live_tail(h))
    }

    /// Adds a new node, or reactivates one after a prior delete.
    ///
    /// Fails with `DuplicateLive` if the node is currently live.
    pub fn add_node(&mut self, id: NodeId, attrs: Attributes, time: LogicalTime) -> Result<()> {
        if self.node_currently_live(&id) {
            return reject(ChronoError::DuplicateLive {
                kind: "node",
                id,
            });
        }
        debug!(node = %id, time, "add_node");
        self.nodes.append(&id, Event::create(time, attrs))?;
        self.observe_time(time);
        Ok(())
    }

    /// Merges `attrs` key-wise into the node's effective attributes.
    ///
    /// Fails with `NotLive` if the node is not currently live. To replace
    /// all attributes, delete then create the node instead.
    pub fn update_node(&mut self, id: &str, attrs: Attributes, time: LogicalTime) -> Result<()> {
        if !self.node_currently_live(id) {
            return reject(ChronoError::NotLive {
                kind: "node",
                id: id.to_string(),
            });
        }
        debug!(node = id, time, "update_node");
        self.nodes.append(id, Event::update(time, attrs))?;
        self.observe_time(time);
        Ok(())
    }

    /// Marks the node as deleted, cascading a delete at the same time to
    /// every edge currently incident on it. A no-op (not an error) if the
    /// node is already not live.
    pub fn del_node(&mut self, id: &str, time: LogicalTime) -> Result<()> {
        if !self.node_currently_live(id) {
            return Ok(());
        }
        debug!(node = id, time, "del_node");
        let incident: BTreeSet<EdgeId> = self
            .outgoing
            .get(id)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .chain(self.incoming.get(id).cloned().unwrap_or_default())
            .collect();
        for edge_id in incident {
            self.del_edge(&edge_id, time)?;
        }
        self.nodes.append(id, Event::delete(time))?;
        self.observe_time(time);
        Ok(())
    }

    /// Adds a new edge, or reactivates one after a prior delete.
    ///
    /// Fails with `DuplicateLive` if the edge is currently live, or
    /// `EndpointMissing` if either endpoint is not live at `time`.
    pub fn add_edge(
        &mut self,
        id: EdgeId,
        source: NodeId,
        target: NodeId,
        attrs: Attributes,
        time: LogicalTime,
    ) -> Result<()> {
        if self.edge_currently_live(&id) {
            return reject(ChronoError::DuplicateLive {
                kind: "edge",
                id,
            });
        }
        if !self.nodes.exists_at(&source, time) {
            return reject(ChronoError::EndpointMissing {
                edge: id,
                node: source,
                time,
            });
        }
        if !self.nodes.exists_at(&target, time) {
            return reject(ChronoError::EndpointMissing {
                edge: id,
                node: target,
                time,
            });
        }
        debug!(edge = %id, source = %source, target = %target, time, "add_edge");
        self.edges.append(&id, Event::create(time, attrs))?;
        self.edge_endpoints
            .insert(id.clone(), (source.clone(), target.clone()));
        self.outgoing.entry(source).or_default().insert(id.clone());
        self.incoming.entry(target).or_default().insert(id);
        self.observe_time(time);
        Ok(())
    }

    /// Merges `attrs` key-wise into the edge's effective attributes.
    ///
    /// Fails with `NotLive` if the edge is not currently live.
    pub fn update_edge(&mut self, id: &str, attrs: Attributes, time: LogicalTime) -> Result<()> {
        if !self.edge_currently_live(id) {
            return reject(ChronoError::NotLive {
                kind: "edge",
                id: id.to_string(),
            });
        }
        debug!(edge = id, time, "update_edge");
        self.edges.append(id, Event::update(time, attrs))?;
        self.observe_time(time);
        Ok(())
    }

    /// Marks the edge as deleted and removes it from adjacency. A no-op
    /// (not an error) if the edge is already not live.
    pub fn del_edge(&mut self, id: &str, time: LogicalTime) -> Result<()> {
        if !self.edge_currently_live(id) {
            return Ok(());
        }
        debug!(edge = id, time, "del_edge");
        if let Some((source, target)) = self.edge_endpoints.get(id).cloned() {
            if let Some(set) = self.outgoing.get_mut(&source) {
                set.remove(id);
            }
            if let Some(set) = self.incoming.get_mut(&target) {
                set.remove(id);
            }
        }
        self.edges.append(id, Event::delete(time))?;
        self.observe_time(time);
        Ok(())
    }

    /// Every live node, as of `now()`, mapped to its effective attributes.
    pub fn get_nodes(&self) -> BTreeMap<NodeId, Attributes> {
        let now = self.current_time;
        self.nodes
            .entity_ids()
            .filter_map(|id| {
                self.nodes
                    .latest_effective(id, now)
                    .map(|attrs| (id.to_string(), attrs))
            })
            .collect()
    }

    /// Every live edge whose endpoints are both live, as of `now()`.
    pub fn get_edges(&self) -> BTreeMap<EdgeId, EdgeView> {
        let now = self.current_time;
        self.edges
            .entity_ids()
            .filter_map(|id| {
                let attrs = self.edges.latest_effective(id, now)?;
                let (source, target) = self.edge_endpoints.get(id)?;
                if !self.nodes.exists_at(source, now) || !self.nodes.exists_at(target, now) {
                    return None;
                }
                Some((
                    id.to_string(),
                    EdgeView {
                        id: id.to_string(),
                        source: source.clone(),
                        target: target.clone(),
                        attributes: attrs,
                    },
                ))
            })
            .collect()
    }

    /// Current outgoing adjacency: node id to sorted list of live outgoing
    /// edge ids.
    pub fn get_outgoing(&self) -> BTreeMap<NodeId, Vec<EdgeId>> {
        self.outgoing
            .iter()
            .map(|(k, v)| (k.clone(), v.iter().cloned().collect()))
            .collect()
    }

    /// Current incoming adjacency: node id to sorted list of live incoming
    /// edge ids.
    pub fn get_incoming(&self) -> BTreeMap<NodeId, Vec<EdgeId>> {
        self.incoming
            .iter()
            .map(|(k, v)| (k.clone(), v.iter().cloned().collect()))
            .collect()
    }

    /// A handle onto the node timeline, for snapshot construction.
    pub(crate) fn node_history(&self, id: &str) -> Option<&EntityHistory> {
        self.nodes.history(id).ok()
    }

    /// A handle onto the edge timeline, for snapshot construction.
    pub(crate) fn edge_history(&self, id: &str) -> Option<&EntityHistory> {
        self.edges.history(id).ok()
    }

    /// Every node id ever seen by this graph, live or not (snapshot
    /// construction needs this to answer "was it live back then" even for
    /// entities dead now).
    pub(crate) fn node_ids_ever(&self) -> impl Iterator<Item = &str> {
        self.nodes.entity_ids()
    }

    /// Every edge id ever seen by this graph, live or not.
    pub(crate) fn edge_ids_ever(&self) -> impl Iterator<Item = &str> {
        self.edges.entity_ids()
    }

    /// A copy of the edge endpoint table, for freezing into a
    /// [`crate::commit::GraphState`].
    pub(crate) fn edge_endpoints_snapshot(&self) -> BTreeMap<EdgeId, (NodeId, NodeId)> {
        self.edge_endpoints.clone()
    }

    /// Rebuilds a `Graph` from previously recorded histories and endpoint
    /// table (the inverse of freezing into a
    /// [`crate::commit::GraphState`]). Adjacency and `current_time` are
    /// both derived, not carried, since they are functions of the
    /// histories.
    pub(crate) fn from_state(
        node_histories: BTreeMap<NodeId, EntityHistory>,
        edge_histories: BTreeMap<EdgeId, EntityHistory>,
        edge_endpoints: BTreeMap<EdgeId, (NodeId, NodeId)>,
    ) -> Self {
        let mut current_time = 0;
        for history in node_histories.values().chain(edge_histories.values()) {
            if let Some(last) = history.last() {
                current_time = current_time.max(last.time);
            }
        }

        let mut outgoing: BTreeMap<NodeId, BTreeSet<EdgeId>> = BTreeMap::new();
        let mut incoming: BTreeMap<NodeId, BTreeSet<EdgeId>> = BTreeMap::new();
        for (edge_id, history) in &edge_histories {
            if !is_live_tail(history) {
                continue;
            }
            if let Some((source, target)) = edge_endpoints.get(edge_id) {
                outgoing.entry(source.clone()).or_default().insert(edge_id.clone());
                incoming.entry(target.clone()).or_default().insert(edge_id.clone());
            }
        }

        Self {
            nodes: TimelineStore::from_histories(node_histories),
            edges: TimelineStore::from_histories(edge_histories),
            edge_endpoints,
            outgoing,
            incoming,
            current_time,
        }
    }
}

fn is_live_tail(history: &[Event]) -> bool {
    !matches!(history.last(), None | Some(Event { kind: crate::model::EventKind::Delete, .. }))
}

impl GraphView for Graph {
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
        self.nodes.exists_at(node, self.current_time)
    }

    fn out_edges(&self, node: &str) -> Vec<(EdgeId, NodeId)> {
        let mut pairs: Vec<(EdgeId, NodeId)> = self
            .outgoing
            .get(node)
            .into_iter()
            .flatten()
            .filter_map(|eid| {
                self.edge_endpoints
                    .get(eid)
                    .map(|(_, target)| (eid.clone(), target.clone()))
            })
            .collect();
        pairs.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        pairs
    }

    fn in_edges(&self, node: &str) -> Vec<(EdgeId, NodeId)> {
        let mut pairs: Vec<(EdgeId, NodeId)> = self
            .incoming
            .get(node)
            .into_iter()
            .flatten()
            .filter_map(|eid| {
                self.edge_endpoints
                    .get(eid)
                    .map(|(source, _)| (eid.clone(), source.clone()))
            })
            .collect();
        pairs.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        pairs
    }

    fn edge_created_at(&self, edge: &str) -> Option<LogicalTime> {
        let history = self.edges.history(edge).ok()?;
        last_create_time(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn add_node_then_duplicate_fails() {
        let mut g = Graph::new();
        g.add_node("A".into(), Attributes::new(), 1).unwrap();
        let err = g.add_node("A".into(), Attributes::new(), 2).unwrap_err();
        assert!(matches!(err, ChronoError::DuplicateLive { .. }));
    }

    #[test]
    fn add_edge_requires_live_endpoints() {
        let mut g = Graph::new();
        g.add_node("A".into(), Attributes::new(), 1).unwrap();
        let err = g
            .add_edge("e1".into(), "A".into(), "B".into(), Attributes::new(), 2)
            .unwrap_err();
        assert!(matches!(err, ChronoError::EndpointMissing { .. }));
    }

    #[test]
    fn del_node_cascades_to_incident_edges() {
        let mut g = Graph::new();
        g.add_node("A".into(), Attributes::new(), 1).unwrap();
        g.add_node("B".into(), Attributes::new(), 2).unwrap();
        g.add_edge("e1".into(), "A".into(), "B".into(), Attributes::new(), 3)
            .unwrap();
        g.del_node("A", 4).unwrap();
        assert!(!g.get_nodes().contains_key("A"));
        assert!(!g.get_edges().contains_key("e1"));
        assert!(g.get_outgoing().get("A").map_or(true, |v| v.is_empty()));
    }

    #[test]
    fn del_node_is_idempotent() {
        let mut g = Graph::new();
        g.add_node("A".into(), Attributes::new(), 1).unwrap();
        g.del_node("A", 2).unwrap();
        g.del_node("A", 3).unwrap();
        assert!(!g.get_nodes().contains_key("A"));
    }

    #[test]
    fn reactivation_after_delete_resets_attributes() {
        let mut g = Graph::new();
        g.add_node("A".into(), attrs(&[("v", "1")]), 1).unwrap();
        g.del_node("A", 2).unwrap();
        g.add_node("A".into(), attrs(&[("v", "2")]), 3).unwrap();
        assert_eq!(g.get_nodes().get("A"), Some(&attrs(&[("v", "2")])));
    }

    #[test]
    fn update_node_merges_keywise() {
        let mut g = Graph::new();
        g.add_node("A".into(), attrs(&[("x", "1"), ("y", "1")]), 1)
            .unwrap();
        g.update_node("A", attrs(&[("y", "2")]), 2).unwrap();
        assert_eq!(g.get_nodes().get("A"), Some(&attrs(&[("x", "1"), ("y", "2")])));
    }

    #[test]
    fn get_nodes_matches_snapshot_at_now() {
        let mut g = Graph::new();
        g.add_node("A".into(), Attributes::new(), 1).unwrap();
        g.add_node("B".into(), Attributes::new(), 2).unwrap();
        g.add_edge("e1".into(), "A".into(), "B".into(), Attributes::new(), 3)
            .unwrap();
        let snap = crate::snapshot::Snapshot::new(&g, g.now());
        assert_eq!(g.get_nodes(), snap.get_nodes());
        assert_eq!(g.get_edges(), snap.get_edges());
    }
}
