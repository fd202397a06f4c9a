//! Engine-wide tunables that are orthogonal to the data model.
//!
//! ChronoGraph does not cap algorithm work internally. A caller running
//! traversal over a huge graph is expected to bound it themselves (see
//! the crate-level docs on concurrency and resource discipline). `EngineConfig`
//! exists so that bound can be expressed declaratively instead of every
//! caller hand-rolling a node counter.
//!
//! # Example
//!
//! ```rust
//! use chronograph::EngineConfig;
//!
//! let cfg = EngineConfig::default();
//! assert!(cfg.max_traversal_nodes.is_none());
//!
//! let bounded = EngineConfig::bounded(10_000);
//! assert_eq!(bounded.max_traversal_nodes, Some(10_000));
//! ```

/// Engine-wide tunables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of nodes a single algorithm invocation may visit
    /// before aborting early with a partial/empty result. `None` means no
    /// bound is enforced (the default).
    pub max_traversal_nodes: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_traversal_nodes: None,
        }
    }
}

impl EngineConfig {
    /// An `EngineConfig` with no traversal bound. Appropriate for small to
    /// medium graphs.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// An `EngineConfig` that aborts traversal algorithms after visiting
    /// `max_nodes` nodes, for callers embedding ChronoGraph in a
    /// latency-sensitive service over very large graphs.
    pub fn bounded(max_nodes: usize) -> Self {
        Self {
            max_traversal_nodes: Some(max_nodes),
            ..Self::default()
        }
    }
}
