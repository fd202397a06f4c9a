//! Traversal and analysis over any [`GraphView`] (a live [`Graph`] at the
//! current time, or a [`Snapshot`] fixed at a logical time).
//!
//! No algorithm here ever returns a [`ChronoError`] for a data-shape issue:
//! a missing node id produces an empty result (`false`, an empty path, a
//! singleton component of nothing), matching the propagation policy that
//! reserves errors for genuine API misuse.
//!
//! There is no cancellation token in the core (spec §5): a caller embedding
//! ChronoGraph in a bounded-latency service is expected to size its own
//! budget instead. The frontier-expanding searches (`is_reachable`,
//! `is_time_respecting_reachable`, `shortest_path`) each have a `_bounded`
//! counterpart that takes an [`EngineConfig`] and gives up once
//! `max_traversal_nodes` frontier nodes have been expanded, returning the
//! same "not found" result an exhaustive search would give up to that
//! point. `weakly_connected_components`, `has_cycle` and
//! `topological_sort` always visit every node by construction; a partial
//! answer for them is not a well-defined "best effort", so they have no
//! bounded counterpart.
//!
//! [`Graph`]: crate::graph::Graph
//! [`Snapshot`]: crate::snapshot::Snapshot
//! [`ChronoError`]: crate::error::ChronoError
//! [`EngineConfig`]: crate::config::EngineConfig

mod components;
mod cycles;
mod reachability;
mod shortest_path;
mod toposort;

pub use components::weakly_connected_components;
pub use cycles::has_cycle;
pub use reachability::{
    is_reachable, is_reachable_bounded, is_time_respecting_reachable,
    is_time_respecting_reachable_bounded,
};
pub use shortest_path::{shortest_path, shortest_path_bounded};
pub use toposort::topological_sort;
