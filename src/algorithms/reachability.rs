use std::collections::{HashSet, VecDeque};

use crate::config::EngineConfig;
use crate::model::NodeId;
use crate::view::GraphView;

/// Whether a directed path from `src` to `dst` exists, ignoring edge
/// creation times entirely. Unweighted BFS over outgoing adjacency.
///
/// Returns `false` (never errors) if either id is unknown to `view`.
pub fn is_reachable<V: GraphView + ?Sized>(view: &V, src: &str, dst: &str) -> bool {
    is_reachable_bounded(view, src, dst, &EngineConfig::unbounded())
}

/// As [`is_reachable`], but gives up and returns `false` once
/// `cfg.max_traversal_nodes` nodes have been dequeued from the BFS
/// frontier, instead of visiting the whole graph.
pub fn is_reachable_bounded<V: GraphView + ?Sized>(
    view: &V,
    src: &str,
    dst: &str,
    cfg: &EngineConfig,
) -> bool {
    if !view.has_node(src) || !view.has_node(dst) {
        return false;
    }
    if src == dst {
        return true;
    }
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    visited.insert(src.to_string());
    queue.push_back(src.to_string());

    let mut expanded = 0usize;
    while let Some(node) = queue.pop_front() {
        if cfg.max_traversal_nodes.is_some_and(|budget| expanded >= budget) {
            return false;
        }
        expanded += 1;
        for (_, target) in view.out_edges(&node) {
            if target == dst {
                return true;
            }
            if visited.insert(target.clone()) {
                queue.push_back(target);
            }
        }
    }
    false
}

/// Whether a path `src = v0, e1, v1, …, vk = dst` exists whose edges'
/// creation times are non-decreasing along the traversal
/// (`t(e_i) <= t(e_{i+1})`).
///
/// Implemented as BFS over states `(node, min_next_time)`: from a given
/// state only edges created at or after `min_next_time` may be followed,
/// and the state reached has `min_next_time` set to that edge's creation
/// time.
pub fn is_time_respecting_reachable<V: GraphView + ?Sized>(
    view: &V,
    src: &str,
    dst: &str,
) -> bool {
    is_time_respecting_reachable_bounded(view, src, dst, &EngineConfig::unbounded())
}

/// As [`is_time_respecting_reachable`], but gives up and returns `false`
/// once `cfg.max_traversal_nodes` states have been dequeued from the BFS
/// frontier.
pub fn is_time_respecting_reachable_bounded<V: GraphView + ?Sized>(
    view: &V,
    src: &str,
    dst: &str,
    cfg: &EngineConfig,
) -> bool {
    if !view.has_node(src) || !view.has_node(dst) {
        return false;
    }
    if src == dst {
        return true;
    }
    let mut visited: HashSet<(NodeId, u64)> = HashSet::new();
    let mut queue: VecDeque<(NodeId, u64)> = VecDeque::new();
    let start = (src.to_string(), 0u64);
    visited.insert(start.clone());
    queue.push_back(start);

    let mut expanded = 0usize;
    while let Some((node, min_next_time)) = queue.pop_front() {
        if cfg.max_traversal_nodes.is_some_and(|budget| expanded >= budget) {
            return false;
        }
        expanded += 1;
        for (edge_id, target) in view.out_edges(&node) {
            let Some(created_at) = view.edge_created_at(&edge_id) else {
                continue;
            };
            if created_at < min_next_time {
                continue;
            }
            if target == dst {
                return true;
            }
            let next_state = (target.clone(), created_at);
            if visited.insert(next_state.clone()) {
                queue.push_back(next_state);
            }
        }
    }
    false
}
