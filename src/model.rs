//! Core value types shared by the timeline store, graph, snapshots, and
//! algorithms: identifiers, logical time, attribute maps, and events.

use std::collections::BTreeMap;

/// A caller-chosen, opaque, stable identifier for a node. Unique within a
/// graph's node namespace.
pub type NodeId = String;

/// A caller-chosen, opaque, stable identifier for an edge. Unique within a
/// graph's edge namespace.
pub type EdgeId = String;

/// A non-negative integer supplied by the caller on every mutating call.
/// The engine trusts and orders by this value; it never generates time
/// itself. Equal times are allowed; ties are broken by arrival order
/// within a single entity's history.
pub type LogicalTime = u64;

/// A mapping from string key to string value. Keys are unique; insertion
/// order is not significant. `BTreeMap` keeps keys sorted, which both
/// gives deterministic iteration and canonicalizes the map for
/// content-addressed hashing (see [`crate::commit`]).
pub type Attributes = BTreeMap<String, String>;

/// The kind of mutation recorded by an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Brings an entity into existence (or reactivates it after a prior
    /// delete). Must be the first event in any entity's history, and the
    /// only kind of event allowed to follow a `Delete`.
    Create,
    /// Merges `payload` key-wise into the entity's effective attributes as
    /// of the `Create` (or reactivating `Create`) currently in effect.
    Update,
    /// Marks the entity as no longer live as of `time`. Carries no
    /// payload.
    Delete,
}

/// A single recorded mutation of an entity's state at a given logical
/// time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub time: LogicalTime,
    pub kind: EventKind,
    pub payload: Attributes,
}

impl Event {
    pub fn create(time: LogicalTime, payload: Attributes) -> Self {
        Self {
            time,
            kind: EventKind::Create,
            payload,
        }
    }

    pub fn update(time: LogicalTime, payload: Attributes) -> Self {
        Self {
            time,
            kind: EventKind::Update,
            payload,
        }
    }

    pub fn delete(time: LogicalTime) -> Self {
        Self {
            time,
            kind: EventKind::Delete,
            payload: Attributes::new(),
        }
    }
}
