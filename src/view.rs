//! The capability set shared by [`crate::graph::Graph`] (current time) and
//! [`crate::snapshot::Snapshot`] (a fixed logical time), so that
//! [`crate::algorithms`] can run identically over either without caring
//! which one it was handed.
//!
//! Adjacency storage uses `EdgeId`s rather than direct references between
//! `Node`/`Edge` records (design note: cyclic references are resolved via
//! indirection through the owning map), so implementors only need to
//! answer "what edges touch this node" and "what does an edge connect".

use crate::model::{EdgeId, LogicalTime, NodeId};

/// A read-only view over a set of live nodes and edges, at either the
/// current time or a fixed logical time.
pub trait GraphView {
    /// All live node ids in this view, sorted lexicographically.
    fn node_ids(&self) -> Vec<NodeId>;

    /// All live edge ids in this view, together with their endpoints,
    /// sorted lexicographically by edge id.
    fn edge_ids(&self) -> Vec<(EdgeId, NodeId, NodeId)>;

    /// Whether `node` is live in this view.
    fn has_node(&self, node: &str) -> bool;

    /// Outgoing edges from `node`: `(edge_id, target)` pairs, sorted by
    /// `target` then `edge_id` so traversal order is deterministic.
    fn out_edges(&self, node: &str) -> Vec<(EdgeId, NodeId)>;

    /// Incoming edges into `node`: `(edge_id, source)` pairs, sorted by
    /// `source` then `edge_id`.
    fn in_edges(&self, node: &str) -> Vec<(EdgeId, NodeId)>;

    /// The logical time of `edge`'s `Create` event, used by algorithms
    /// that must respect edge creation order (e.g. time-respecting
    /// reachability). `None` if the edge does not exist in this view.
    fn edge_created_at(&self, edge: &str) -> Option<LogicalTime>;
}
