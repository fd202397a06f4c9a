//! Append-only per-entity event log keyed by logical time.
//!
//! `TimelineStore` is intentionally ignorant of node/edge semantics. It
//! only enforces that, for a given entity, logical time never regresses.
//! Interpreting event sequences into Create/Update/Delete state machines
//! and their invariants (first event is `Create`, only a `Create` may
//! follow a `Delete`, endpoint liveness, cascading deletes, …) is
//! [`crate::graph::Graph`]'s job; `TimelineStore` just stores and replays.

use std::collections::BTreeMap;

use tracing::trace;

use crate::error::{reject, ChronoError, Result};
use crate::model::{Attributes, Event, EventKind, LogicalTime};

/// The ordered sequence of events recorded for a single node or edge
/// identifier.
pub type EntityHistory = Vec<Event>;

/// An append-only, per-entity event log.
///
/// Two independent `TimelineStore`s back a [`crate::graph::Graph`] (one
/// for node ids, one for edge ids), so the same string may legally be used
/// as both a node id and an edge id without collision.
#[derive(Debug, Clone, Default)]
pub struct TimelineStore {
    histories: BTreeMap<String, EntityHistory>,
}

impl TimelineStore {
    pub fn new() -> Self {
        Self {
            histories: BTreeMap::new(),
        }
    }

    /// Builds a store directly from already-recorded histories. Used to
    /// materialize a [`crate::commit::GraphState`] back into a working
    /// [`crate::graph::Graph`] on checkout, without replaying `append`'s
    /// monotonicity check (a committed history is already valid).
    pub(crate) fn from_histories(histories: BTreeMap<String, EntityHistory>) -> Self {
        Self { histories }
    }

    /// Appends `event` to `entity_id`'s history.
    ///
    /// Rejects the event with `ChronoError::InvalidTime` if its time is
    /// strictly less than the entity's last recorded event time. Equal
    /// times are accepted; the new event is ordered after all
    /// already-recorded events at that time (arrival order).
    pub fn append(&mut self, entity_id: &str, event: Event) -> Result<()> {
        let history = self.histories.entry(entity_id.to_string()).or_default();
        if let Some(last) = history.last() {
            if event.time < last.time {
                return reject(ChronoError::InvalidTime {
                    entity: entity_id.to_string(),
                    got: event.time,
                    last: last.time,
                });
            }
        }
        trace!(entity = entity_id, time = event.time, kind = ?event.kind, "appended event");
        history.push(event);
        Ok(())
    }

    /// The full recorded event sequence for `entity_id`.
    ///
    /// Returns `ChronoError::UnknownEntity` if the id has never appeared in
    /// this store (as opposed to an entity that once existed and was
    /// deleted, whose history is retained).
    pub fn history(&self, entity_id: &str) -> Result<&[Event]> {
        self.histories
            .get(entity_id)
            .map(Vec::as_slice)
            .ok_or_else(|| ChronoError::UnknownEntity(entity_id.to_string()))
    }

    /// Whether `entity_id` has ever appeared in this store.
    pub fn contains(&self, entity_id: &str) -> bool {
        self.histories.contains_key(entity_id)
    }

    /// The merged attribute map for `entity_id` as of `time`, or `None` if
    /// the entity is not live at `time` (including entities that have
    /// never been created, or that are not yet known to this store).
    ///
    /// Effective attributes are the payload of the latest `Create` at or
    /// before `time`, with every `Update` payload at or before `time`
    /// since that `Create` merged in key-wise (later wins).
    pub fn latest_effective(&self, entity_id: &str, time: LogicalTime) -> Option<Attributes> {
        let history = self.histories.get(entity_id)?;
        effective_state(history, time)
    }

    /// Whether `entity_id` is live at `time`.
    pub fn exists_at(&self, entity_id: &str, time: LogicalTime) -> bool {
        self.latest_effective(entity_id, time).is_some()
    }

    /// All entity ids that have ever appeared in this store (live or not),
    /// in sorted order.
    pub fn entity_ids(&self) -> impl Iterator<Item = &str> {
        self.histories.keys().map(String::as_str)
    }
}

/// Replays `history` up to and including `time`, returning the merged
/// attributes if the entity is live at `time`, or `None` if it is not
/// (never created, or deleted and not yet recreated).
pub(crate) fn effective_state(history: &[Event], time: LogicalTime) -> Option<Attributes> {
    let mut acc: Option<Attributes> = None;
    for event in history {
        if event.time > time {
            break;
        }
        match event.kind {
            EventKind::Create => acc = Some(event.payload.clone()),
            EventKind::Update => {
                if let Some(attrs) = acc.as_mut() {
                    for (k, v) in &event.payload {
                        attrs.insert(k.clone(), v.clone());
                    }
                }
            }
            EventKind::Delete => acc = None,
        }
    }
    acc
}

/// The logical time of the most recent `Create` event in `history`: the
/// creation time of the entity's current "epoch" (the `Create` that is
/// still in effect, possibly followed by `Update`s). Used by algorithms
/// that key off an edge's creation time, e.g. time-respecting
/// reachability.
pub(crate) fn last_create_time(history: &[Event]) -> Option<LogicalTime> {
    history
        .iter()
        .rev()
        .find(|e| e.kind == EventKind::Create)
        .map(|e| e.time)
}
