//! Git-style version control over a working [`Graph`]: branches, commits,
//! and three-way merge.
//!
//! A `Repository` owns exactly one mutable working `Graph` at a time (the
//! checked-out branch's materialised state), plus an immutable, growing
//! commit store and a name-to-id branch table. Mutating the working graph
//! never touches the commit store directly; only `commit` freezes it.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use tracing::{debug, info};

use crate::commit::{Commit, CommitId, GraphState};
use crate::error::{reject, ChronoError, Result};
use crate::graph::Graph;
use crate::model::{Attributes, EdgeId, Event, LogicalTime, NodeId};
use crate::timeline::EntityHistory;

/// Conflict-resolution strategy for [`Repository::merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Keep the current branch's history for any entity both sides
    /// changed differently.
    Ours,
    /// Take the source branch's history for any entity both sides
    /// changed differently.
    Theirs,
    /// Concatenate both sides' post-ancestor events in non-decreasing
    /// time order (current branch's events before the source branch's on
    /// a tie) for any entity both sides changed differently.
    Union,
}

/// The outcome of a [`Repository::merge`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    /// The id of the resulting merge commit (or, for a fast-forward or
    /// already-ancestor merge, the id that HEAD now points at).
    pub merge_commit_id: CommitId,
    /// Entity ids where both sides changed differently since the lowest
    /// common ancestor, in sorted order. Populated even when `policy`
    /// resolved the conflict cleanly (spec's observability requirement).
    pub conflicts: Vec<String>,
}

/// A version-controlled temporal property graph.
pub struct Repository {
    branches: BTreeMap<String, CommitId>,
    head: String,
    working: Graph,
    commits: BTreeMap<CommitId, Commit>,
}

impl Repository {
    /// Creates a repository with an empty working graph and a single
    /// empty root commit on `branch_name`.
    pub fn init(branch_name: impl Into<String>) -> Self {
        let branch_name = branch_name.into();
        let root = Commit::new(
            vec![],
            "root".to_string(),
            "chronograph".to_string(),
            Utc::now(),
            GraphState::from_graph(&Graph::new()),
        );
        info!(branch = %branch_name, commit = %root.id, "repository initialised");
        let mut commits = BTreeMap::new();
        let mut branches = BTreeMap::new();
        branches.insert(branch_name.clone(), root.id.clone());
        commits.insert(root.id.clone(), root);
        Self {
            branches,
            head: branch_name,
            working: Graph::new(),
            commits,
        }
    }

    /// The branch currently checked out.
    pub fn current_branch(&self) -> &str {
        &self.head
    }

    /// The commit id HEAD currently points at.
    pub fn head_commit_id(&self) -> CommitId {
        self.branches[&self.head].clone()
    }

    /// All branch names, sorted.
    pub fn branch_names(&self) -> Vec<String> {
        self.branches.keys().cloned().collect()
    }

    /// A read-only view of the working graph.
    pub fn graph(&self) -> &Graph {
        &self.working
    }

    /// A mutable view of the working graph, for callers that need direct
    /// access beyond the delegated mutation methods below.
    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.working
    }

    /// Creates `name` pointing at HEAD's current commit.
    ///
    /// Fails with `BranchExists` if the name is already registered.
    pub fn branch(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if self.branches.contains_key(&name) {
            return reject(ChronoError::BranchExists(name));
        }
        let tip = self.head_commit_id();
        debug!(branch = %name, at = %tip, "branch created");
        self.branches.insert(name, tip);
        Ok(())
    }

    /// Whether the working graph differs from HEAD's committed state.
    pub fn is_dirty(&self) -> bool {
        let head_state = &self.commits[&self.head_commit_id()].graph_state;
        &GraphState::from_graph(&self.working) != head_state
    }

    /// Switches HEAD to `name`, replacing the working graph with that
    /// branch's committed state.
    ///
    /// Fails with `UnknownBranch` if `name` is not registered, or
    /// `DirtyWorkingSet` if the working graph has uncommitted changes.
    /// Call [`Repository::discard_changes`] first to proceed anyway.
    pub fn checkout(&mut self, name: &str) -> Result<()> {
        if !self.branches.contains_key(name) {
            return reject(ChronoError::UnknownBranch(name.to_string()));
        }
        if self.is_dirty() {
            return reject(ChronoError::DirtyWorkingSet);
        }
        let tip = self.branches[name].clone();
        debug!(branch = name, commit = %tip, "checkout");
        self.working = self.commits[&tip].graph_state.materialize();
        self.head = name.to_string();
        Ok(())
    }

    /// Discards uncommitted changes in the working graph, resetting it to
    /// HEAD's committed state. An explicit counterpart to the
    /// `DirtyWorkingSet` check in [`Repository::checkout`].
    pub fn discard_changes(&mut self) {
        let tip = self.head_commit_id();
        self.working = self.commits[&tip].graph_state.materialize();
    }

    /// Freezes the working graph into a new commit whose sole parent is
    /// the branch tip, and advances HEAD. Returns the existing tip's id
    /// without creating a new commit if nothing changed.
    pub fn commit(&mut self, message: impl Into<String>) -> Result<CommitId> {
        let tip = self.head_commit_id();
        let state = GraphState::from_graph(&self.working);
        if state == self.commits[&tip].graph_state {
            debug!(commit = %tip, "commit is a no-op, no changes since tip");
            return Ok(tip);
        }
        let commit = Commit::new(
            vec![tip],
            message.into(),
            "chronograph".to_string(),
            Utc::now(),
            state,
        );
        info!(branch = %self.head, commit = %commit.id, "commit created");
        self.branches.insert(self.head.clone(), commit.id.clone());
        let id = commit.id.clone();
        self.commits.insert(commit.id.clone(), commit);
        Ok(id)
    }

    /// The transitive closure of `cid` and its ancestors, over `parents`.
    fn ancestors(&self, cid: &str) -> Result<BTreeSet<CommitId>> {
        let mut seen = BTreeSet::new();
        let mut stack = vec![cid.to_string()];
        while let Some(id) = stack.pop() {
            if seen.insert(id.clone()) {
                let commit = self
                    .commits
                    .get(&id)
                    .ok_or_else(|| ChronoError::UnknownCommit(id.clone()))?;
                stack.extend(commit.parents.iter().cloned());
            }
        }
        Ok(seen)
    }

    /// The lowest common ancestor of `a` and `b`: the common ancestor with
    /// the largest commit timestamp, ties broken by the lexicographically
    /// greatest id. A deterministic fallback for criss-cross histories
    /// with no single LCA.
    fn lowest_common_ancestor(&self, a: &str, b: &str) -> Result<CommitId> {
        let ancestors_a = self.ancestors(a)?;
        let ancestors_b = self.ancestors(b)?;
        ancestors_a
            .intersection(&ancestors_b)
            .max_by(|x, y| {
                let cx = &self.commits[*x];
                let cy = &self.commits[*y];
                cx.timestamp.cmp(&cy.timestamp).then_with(|| x.cmp(y))
            })
            .cloned()
            .ok_or_else(|| ChronoError::UnknownCommit(format!("no common ancestor of {a} and {b}")))
    }

    /// Merges `source_branch` into HEAD under `policy`.
    ///
    /// Fails with `UnknownBranch` if `source_branch` is not registered, or
    /// `DirtyWorkingSet` if the working graph has uncommitted changes: the
    /// merge result replaces the working graph outright, so an
    /// uncommitted mutation would otherwise be silently discarded.
    pub fn merge(&mut self, source_branch: &str, policy: MergePolicy) -> Result<MergeResult> {
        if !self.branches.contains_key(source_branch) {
            return reject(ChronoError::UnknownBranch(source_branch.to_string()));
        }
        if self.is_dirty() {
            return reject(ChronoError::DirtyWorkingSet);
        }
        let ours = self.head_commit_id();
        let theirs = self.branches[source_branch].clone();
        let base = self.lowest_common_ancestor(&ours, &theirs)?;

        if base == theirs {
            debug!(ours = %ours, theirs = %theirs, "merge is a no-op, source already an ancestor");
            return Ok(MergeResult {
                merge_commit_id: ours,
                conflicts: vec![],
            });
        }

        if base == ours {
            info!(ours = %ours, theirs = %theirs, "fast-forward merge");
            self.branches.insert(self.head.clone(), theirs.clone());
            self.working = self.commits[&theirs].graph_state.materialize();
            return Ok(MergeResult {
                merge_commit_id: theirs,
                conflicts: vec![],
            });
        }

        let ours_state = self.commits[&ours].graph_state.clone();
        let theirs_state = self.commits[&theirs].graph_state.clone();
        let base_state = self.commits[&base].graph_state.clone();

        let (node_histories, mut conflicts) = merge_histories(
            &base_state.node_histories,
            &ours_state.node_histories,
            &theirs_state.node_histories,
            policy,
        );
        let (edge_histories, edge_conflicts) = merge_histories(
            &base_state.edge_histories,
            &ours_state.edge_histories,
            &theirs_state.edge_histories,
            policy,
        );
        conflicts.extend(edge_conflicts);
        conflicts.sort();

        let mut edge_endpoints = ours_state.edge_endpoints.clone();
        for (id, endpoints) in &theirs_state.edge_endpoints {
            edge_endpoints.entry(id.clone()).or_insert_with(|| endpoints.clone());
        }

        let merged_state = GraphState {
            node_histories,
            edge_histories,
            edge_endpoints,
        };

        let message = format!("merge {source_branch} into {}", self.head);
        let commit = Commit::new(
            vec![ours, theirs],
            message,
            "chronograph".to_string(),
            Utc::now(),
            merged_state,
        );
        info!(commit = %commit.id, conflicts = conflicts.len(), "merge commit created");
        self.branches.insert(self.head.clone(), commit.id.clone());
        self.working = commit.graph_state.materialize();
        let id = commit.id.clone();
        self.commits.insert(commit.id.clone(), commit);

        Ok(MergeResult {
            merge_commit_id: id,
            conflicts,
        })
    }

    pub fn add_node(&mut self, id: NodeId, attrs: Attributes, time: LogicalTime) -> Result<()> {
        self.working.add_node(id, attrs, time)
    }

    pub fn update_node(&mut self, id: &str, attrs: Attributes, time: LogicalTime) -> Result<()> {
        self.working.update_node(id, attrs, time)
    }

    pub fn del_node(&mut self, id: &str, time: LogicalTime) -> Result<()> {
        self.working.del_node(id, time)
    }

    pub fn add_edge(
        &mut self,
        id: EdgeId,
        source: NodeId,
        target: NodeId,
        attrs: Attributes,
        time: LogicalTime,
    ) -> Result<()> {
        self.working.add_edge(id, source, target, attrs, time)
    }

    pub fn update_edge(&mut self, id: &str, attrs: Attributes, time: LogicalTime) -> Result<()> {
        self.working.update_edge(id, attrs, time)
    }

    pub fn del_edge(&mut self, id: &str, time: LogicalTime) -> Result<()> {
        self.working.del_edge(id, time)
    }
}

/// Three-way-merges per-entity histories from `base`, `ours` and `theirs`,
/// over every entity id appearing in `ours` or `theirs`.
///
/// Relies on the invariant that a branch's history for any entity is
/// always `base`'s history for that entity (possibly empty) extended by
/// further appended events. Branches and checkouts only ever materialise
/// an existing commit's state and then append, never rewrite. So `base`'s
/// history is always a prefix of both `ours`'s and `theirs`'s, and the
/// "diff" of either side is simply the suffix past that prefix.
fn merge_histories(
    base: &BTreeMap<String, EntityHistory>,
    ours: &BTreeMap<String, EntityHistory>,
    theirs: &BTreeMap<String, EntityHistory>,
    policy: MergePolicy,
) -> (BTreeMap<String, EntityHistory>, Vec<String>) {
    let empty: EntityHistory = Vec::new();
    let mut merged = BTreeMap::new();
    let mut conflicts = Vec::new();

    for id in ours.keys().chain(theirs.keys()).collect::<BTreeSet<_>>() {
        let base_hist = base.get(id).unwrap_or(&empty);
        let ours_hist = ours.get(id).unwrap_or(&empty);
        let theirs_hist = theirs.get(id).unwrap_or(&empty);

        let ours_diff = &ours_hist[base_hist.len().min(ours_hist.len())..];
        let theirs_diff = &theirs_hist[base_hist.len().min(theirs_hist.len())..];

        let resolved = if ours_diff.is_empty() && theirs_diff.is_empty() {
            base_hist.clone()
        } else if ours_diff.is_empty() {
            theirs_hist.clone()
        } else if theirs_diff.is_empty() {
            ours_hist.clone()
        } else if ours_diff == theirs_diff {
            ours_hist.clone()
        } else {
            conflicts.push(id.clone());
            match policy {
                MergePolicy::Ours => ours_hist.clone(),
                MergePolicy::Theirs => theirs_hist.clone(),
                MergePolicy::Union => {
                    let mut tail: Vec<Event> = ours_diff.to_vec();
                    tail.extend(theirs_diff.iter().cloned());
                    tail.sort_by_key(|e| e.time);
                    let mut combined = base_hist.clone();
                    combined.extend(tail);
                    combined
                }
            }
        };
        merged.insert(id.clone(), resolved);
    }

    (merged, conflicts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Attributes;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn basic_commit_and_branch() {
        let mut repo = Repository::init("main");
        repo.add_node("X".into(), Attributes::new(), 10).unwrap();
        let c1 = repo.commit("add X").unwrap();
        assert_eq!(repo.head_commit_id(), c1);
        assert!(repo.graph().get_nodes().contains_key("X"));
    }

    #[test]
    fn commit_with_no_changes_is_a_no_op() {
        let mut repo = Repository::init("main");
        repo.add_node("X".into(), Attributes::new(), 1).unwrap();
        let c1 = repo.commit("add X").unwrap();
        let c2 = repo.commit("add X again, no new changes").unwrap();
        assert_eq!(c1, c2);
    }

    #[test]
    fn branch_isolation_and_checkout() {
        let mut repo = Repository::init("main");
        repo.add_node("X".into(), Attributes::new(), 1).unwrap();
        repo.commit("add X").unwrap();

        repo.branch("dev").unwrap();
        repo.checkout("dev").unwrap();
        repo.add_node("Y".into(), Attributes::new(), 2).unwrap();
        repo.commit("add Y").unwrap();

        repo.checkout("main").unwrap();
        let main_nodes: BTreeSet<_> = repo.graph().get_nodes().into_keys().collect();
        assert_eq!(main_nodes, BTreeSet::from(["X".to_string()]));

        repo.checkout("dev").unwrap();
        let dev_nodes: BTreeSet<_> = repo.graph().get_nodes().into_keys().collect();
        assert_eq!(dev_nodes, BTreeSet::from(["X".to_string(), "Y".to_string()]));
    }

    #[test]
    fn checkout_with_dirty_working_set_fails() {
        let mut repo = Repository::init("main");
        repo.branch("dev").unwrap();
        repo.add_node("X".into(), Attributes::new(), 1).unwrap();
        let err = repo.checkout("dev").unwrap_err();
        assert!(matches!(err, ChronoError::DirtyWorkingSet));
    }

    #[test]
    fn discard_changes_allows_checkout() {
        let mut repo = Repository::init("main");
        repo.branch("dev").unwrap();
        repo.add_node("X".into(), Attributes::new(), 1).unwrap();
        repo.discard_changes();
        repo.checkout("dev").unwrap();
    }

    #[test]
    fn fast_forward_merge_preserves_commit_id() {
        let mut repo = Repository::init("main");
        repo.add_node("A".into(), Attributes::new(), 1).unwrap();
        repo.commit("add A").unwrap();

        repo.branch("feature").unwrap();
        repo.checkout("feature").unwrap();
        repo.add_node("B".into(), Attributes::new(), 2).unwrap();
        let feature_tip = repo.commit("add B").unwrap();

        repo.checkout("main").unwrap();
        let result = repo.merge("feature", MergePolicy::Ours).unwrap();
        assert!(result.conflicts.is_empty());
        assert_eq!(result.merge_commit_id, feature_tip);
        assert_eq!(repo.head_commit_id(), feature_tip);
        assert!(repo.graph().get_nodes().contains_key("B"));
    }

    #[test]
    fn divergent_merge_with_ours_keeps_our_value() {
        let mut repo = Repository::init("main");
        repo.add_node("X".into(), attrs(&[("v", "0")]), 1).unwrap();
        repo.commit("add X").unwrap();
        repo.branch("div").unwrap();

        repo.update_node("X", attrs(&[("v", "1")]), 2).unwrap();
        repo.commit("main updates X to 1").unwrap();

        repo.checkout("div").unwrap();
        repo.update_node("X", attrs(&[("v", "2")]), 2).unwrap();
        repo.commit("div updates X to 2").unwrap();

        repo.checkout("main").unwrap();
        let result = repo.merge("div", MergePolicy::Ours).unwrap();
        assert_eq!(result.conflicts, vec!["X".to_string()]);
        assert_eq!(
            repo.graph().get_nodes().get("X").and_then(|a| a.get("v")).map(String::as_str),
            Some("1")
        );
    }

    #[test]
    fn divergent_merge_with_union_concatenates_both_sides() {
        let mut repo = Repository::init("main");
        repo.add_node("X".into(), attrs(&[("v", "0")]), 1).unwrap();
        repo.commit("add X").unwrap();
        repo.branch("div").unwrap();

        repo.update_node("X", attrs(&[("a", "1")]), 2).unwrap();
        repo.commit("main sets a").unwrap();

        repo.checkout("div").unwrap();
        repo.update_node("X", attrs(&[("b", "2")]), 2).unwrap();
        repo.commit("div sets b").unwrap();

        repo.checkout("main").unwrap();
        let result = repo.merge("div", MergePolicy::Union).unwrap();
        assert_eq!(result.conflicts, vec!["X".to_string()]);
        let x = repo.graph().get_nodes().remove("X").unwrap();
        assert_eq!(x.get("a").map(String::as_str), Some("1"));
        assert_eq!(x.get("b").map(String::as_str), Some("2"));
    }
}
