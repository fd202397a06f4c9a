//! Content-addressed commits.
//!
//! A commit freezes the full history of every node and edge the working
//! [`crate::graph::Graph`] has ever recorded, plus the edge endpoint table
//! needed to rebuild adjacency. Its id is a stable hash over that state
//! together with its parents, message, author and timestamp. Equal
//! content always produces an equal id (spec's dedup-by-content
//! requirement), independent of map insertion order, since every map
//! involved (`BTreeMap`) already iterates in sorted order.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::graph::Graph;
use crate::model::{EdgeId, EventKind, NodeId};
use crate::timeline::EntityHistory;

/// A commit's content-addressed identifier: the lowercase hex SHA-256
/// digest of its canonicalised content.
pub type CommitId = String;

/// A frozen copy of every node's and edge's history, plus the endpoint
/// table, as recorded by a [`Graph`] at the moment of commit.
///
/// Histories are never truncated to "live only". A deleted-then-later
/// reactivated entity's full history is retained, the same way
/// [`crate::timeline::TimelineStore`] retains it, so that diffing two
/// commits' states against a common ancestor can always find a prefix
/// relationship between them (see `crate::repository`'s merge).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GraphState {
    pub(crate) node_histories: BTreeMap<NodeId, EntityHistory>,
    pub(crate) edge_histories: BTreeMap<EdgeId, EntityHistory>,
    pub(crate) edge_endpoints: BTreeMap<EdgeId, (NodeId, NodeId)>,
}

impl GraphState {
    /// Freezes `graph`'s current state.
    pub(crate) fn from_graph(graph: &Graph) -> Self {
        let node_histories = graph
            .node_ids_ever()
            .map(|id| (id.to_string(), graph.node_history(id).cloned().unwrap_or_default()))
            .collect();
        let edge_histories = graph
            .edge_ids_ever()
            .map(|id| (id.to_string(), graph.edge_history(id).cloned().unwrap_or_default()))
            .collect();
        Self {
            node_histories,
            edge_histories,
            edge_endpoints: graph.edge_endpoints_snapshot(),
        }
    }

    /// Rebuilds a working [`Graph`] whose live view equals this state (the
    /// "re-materialising a commit yields an equivalent live view" invariant
    /// from spec §8).
    pub(crate) fn materialize(&self) -> Graph {
        Graph::from_state(
            self.node_histories.clone(),
            self.edge_histories.clone(),
            self.edge_endpoints.clone(),
        )
    }
}

/// An immutable, content-addressed node in the commit DAG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub id: CommitId,
    pub parents: Vec<CommitId>,
    pub message: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub graph_state: GraphState,
}

impl Commit {
    /// Builds a commit, computing its id from the supplied content. Two
    /// calls with equal `parents` (as a set), `message`, `author`,
    /// `timestamp` and `graph_state` always produce the same id.
    pub(crate) fn new(
        parents: Vec<CommitId>,
        message: String,
        author: String,
        timestamp: DateTime<Utc>,
        graph_state: GraphState,
    ) -> Self {
        let id = content_hash(&parents, &message, &author, timestamp, &graph_state);
        Self {
            id,
            parents,
            message,
            author,
            timestamp,
            graph_state,
        }
    }
}

/// Hashes `(sorted parent ids, message, author, timestamp, sorted entity
/// histories)` into a lowercase hex SHA-256 digest.
///
/// Canonicalisation relies on two things holding everywhere upstream:
/// attribute maps are `BTreeMap` (so payload keys are always iterated
/// sorted) and entity histories are stored in `BTreeMap`s keyed by id (so
/// entities are always iterated sorted too). Parents are sorted explicitly
/// here since commit order of `[T, S]` is meaningful for the DAG but not
/// for the hash.
fn content_hash(
    parents: &[CommitId],
    message: &str,
    author: &str,
    timestamp: DateTime<Utc>,
    state: &GraphState,
) -> String {
    let mut hasher = Sha256::new();

    let mut sorted_parents = parents.to_vec();
    sorted_parents.sort();
    for parent in &sorted_parents {
        hasher.update(parent.as_bytes());
        hasher.update(b"\0");
    }
    hasher.update(b"\x01");

    hasher.update(message.as_bytes());
    hasher.update(b"\x01");
    hasher.update(author.as_bytes());
    hasher.update(b"\x01");
    hasher.update(timestamp.to_rfc3339().as_bytes());
    hasher.update(b"\x01");

    hash_histories(&mut hasher, &state.node_histories);
    hasher.update(b"\x01");
    hash_histories(&mut hasher, &state.edge_histories);

    format!("{:x}", hasher.finalize())
}

fn hash_histories(hasher: &mut Sha256, histories: &BTreeMap<String, EntityHistory>) {
    for (id, history) in histories {
        hasher.update(id.as_bytes());
        hasher.update(b"\0");
        for event in history {
            hasher.update(&event.time.to_be_bytes());
            let tag: u8 = match event.kind {
                EventKind::Create => 0,
                EventKind::Update => 1,
                EventKind::Delete => 2,
            };
            hasher.update([tag]);
            for (k, v) in &event.payload {
                hasher.update(k.as_bytes());
                hasher.update(b"=");
                hasher.update(v.as_bytes());
                hasher.update(b"\0");
            }
            hasher.update(b"\x02");
        }
        hasher.update(b"\x03");
    }
}
