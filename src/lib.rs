//! ChronoGraph is an in-memory temporal property graph with Git-style
//! version control.
//!
//! A [`Graph`] records every node's and edge's full history as a sequence
//! of timestamped Create/Update/Delete events rather than overwriting
//! current state, so both the live view (`Graph::get_nodes`/`get_edges`)
//! and any past view ([`Snapshot`]) are cheap to ask for. [`algorithms`]
//! runs identically over either, via the [`view::GraphView`] trait.
//!
//! [`Repository`] layers Git-like version control on top: branches,
//! content-addressed [`commit::Commit`]s, and a three-way merge with
//! configurable conflict resolution ([`MergePolicy`]).
//!
//! # Example
//!
//! ```rust
//! use chronograph::{Graph, Snapshot, algorithms};
//!
//! let mut g = Graph::new();
//! g.add_node("A".to_string(), Default::default(), 1).unwrap();
//! g.add_node("B".to_string(), Default::default(), 2).unwrap();
//! g.add_edge("e1".to_string(), "A".to_string(), "B".to_string(), Default::default(), 3)
//!     .unwrap();
//!
//! assert!(algorithms::is_reachable(&g, "A", "B"));
//!
//! let before_edge = Snapshot::new(&g, 2);
//! assert!(before_edge.get_edges().is_empty());
//! ```

mod commit;
mod config;
mod error;
mod graph;
pub mod logging;
mod model;
mod repository;
mod snapshot;
mod timeline;
mod view;

pub mod algorithms;

pub use commit::{Commit, CommitId, GraphState};
pub use config::EngineConfig;
pub use error::{ChronoError, Result};
pub use graph::{EdgeView, Graph};
pub use model::{Attributes, EdgeId, Event, EventKind, LogicalTime, NodeId};
pub use repository::{MergePolicy, MergeResult, Repository};
pub use snapshot::Snapshot;
pub use view::GraphView;
