//! Error handling for ChronoGraph operations.
//!
//! This module defines the error type used throughout the crate. All
//! public APIs return `Result<T, ChronoError>` for consistent error
//! handling.
//!
//! # Error Handling Pattern
//!
//! ```rust
//! use chronograph::{Graph, Result};
//!
//! fn safe_operation() -> Result<()> {
//!     let mut g = Graph::new();
//!     g.add_node("A".to_string(), Default::default(), 1)?;
//!     g.update_node("A", Default::default(), 2)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;
use tracing::warn;

/// Result type for ChronoGraph operations.
///
/// All public APIs return `Result<T, ChronoError>` for error handling.
pub type Result<T> = std::result::Result<T, ChronoError>;

/// Errors that can occur while mutating or querying a timeline, graph, or
/// repository.
///
/// Algorithms never return `ChronoError` for data-shape issues. A missing
/// node id produces an empty/`false`/`None` result instead (see the
/// `algorithms` module). These variants are reserved for genuine misuse of
/// the mutating API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChronoError {
    /// An event was appended with a logical time strictly less than the
    /// entity's last recorded event time.
    #[error("time regression for entity {entity}: got {got}, last was {last}")]
    InvalidTime {
        entity: String,
        got: u64,
        last: u64,
    },

    /// `add_node`/`add_edge` was called for an identifier that is already
    /// live at the supplied time.
    #[error("{kind} {id} is already live")]
    DuplicateLive { kind: &'static str, id: String },

    /// `update_node`/`update_edge`/`del_node`/`del_edge` was called on an
    /// identifier that is not currently live.
    #[error("{kind} {id} is not live")]
    NotLive { kind: &'static str, id: String },

    /// An edge was created or updated but one of its endpoints is not live
    /// at the supplied time.
    #[error("edge {edge} references endpoint {node} which is not live at time {time}")]
    EndpointMissing {
        edge: String,
        node: String,
        time: u64,
    },

    /// A history lookup was attempted for an identifier that has never
    /// appeared in the timeline store.
    #[error("unknown entity {0}")]
    UnknownEntity(String),

    /// `checkout`/`branch` referenced a branch name that does not exist.
    #[error("unknown branch {0}")]
    UnknownBranch(String),

    /// `branch` was called with a name that is already registered.
    #[error("branch {0} already exists")]
    BranchExists(String),

    /// `checkout` was attempted while the working graph has uncommitted
    /// mutations relative to HEAD.
    #[error("working set has uncommitted changes; commit or discard before checkout")]
    DirtyWorkingSet,

    /// A commit id referenced during merge or ancestor traversal does not
    /// exist in the repository's commit store.
    #[error("unknown commit {0}")]
    UnknownCommit(String),

    /// An ambient-configuration call (e.g. logging setup) received a bad
    /// argument. Not part of the core data-model error kinds; raised only
    /// by tooling in [`crate::logging`] and [`crate::config`].
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Logs a warning before propagating an error, for call sites where the
/// rejection is noteworthy but fully handled by the caller.
pub(crate) fn reject<T>(err: ChronoError) -> Result<T> {
    warn!(error = %err, "operation rejected");
    Err(err)
}
