//! Shared state for one search tree: the claim set and the write-once
//! predecessor map, plus path reconstruction.

use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::{DashMap, DashSet};

use crate::maze::NodeId;

/// An ordered sequence of nodes from the start to a goal.
pub type Path = Vec<NodeId>;

/// State shared by every task of one search tree.
///
/// The two collections here are the only mutable state shared across tasks;
/// everything else a task touches is task-local. Both are mutated exclusively
/// through linearizable insert-if-absent operations, which is what makes
/// concurrent exploration race-free:
///
/// - `claim` is an atomic test-and-set on the visited set. Exactly one task
///   wins the claim for any node; claims are permanent for the lifetime of
///   the search.
/// - `record_predecessor` is an atomic insert-if-absent on the provenance
///   map. The first writer wins; later writers for the same node leave the
///   entry untouched.
#[derive(Debug, Default)]
pub struct SearchState {
    visited: DashSet<NodeId>,
    predecessor: DashMap<NodeId, NodeId>,
    forks: AtomicUsize,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claims `node` for the calling task. Returns `true` iff the
    /// caller won the claim; a `false` return means some other task owns the
    /// node and the caller must abandon it.
    pub fn claim(&self, node: NodeId) -> bool {
        self.visited.insert(node)
    }

    /// Whether `node` has been claimed by any task.
    pub fn is_claimed(&self, node: NodeId) -> bool {
        self.visited.contains(&node)
    }

    /// Number of nodes claimed so far.
    pub fn claimed_count(&self) -> usize {
        self.visited.len()
    }

    /// Records `from` as the provenance of `node`. First writer wins; a
    /// provenance entry is never overwritten once present.
    pub fn record_predecessor(&self, node: NodeId, from: NodeId) {
        self.predecessor.entry(node).or_insert(from);
    }

    /// The recorded provenance of `node`, if any.
    pub fn predecessor_of(&self, node: NodeId) -> Option<NodeId> {
        self.predecessor.get(&node).map(|e| *e.value())
    }

    /// Counts one forked child task.
    pub(crate) fn note_fork(&self) {
        self.forks.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of child tasks forked so far in this search tree.
    pub fn fork_count(&self) -> usize {
        self.forks.load(Ordering::Relaxed)
    }

    /// Reconstructs the path from `start` to `goal` by walking the
    /// provenance map backwards.
    ///
    /// Every claimed node other than the start had its provenance recorded
    /// before it could be claimed, and every recorded hop is a real graph
    /// edge pointing at an earlier claim, so the walk always terminates at
    /// `start`. A missing entry therefore indicates a bug in the claim
    /// discipline, not a runtime condition, and panics.
    pub fn path_from_to(&self, start: NodeId, goal: NodeId) -> Path {
        let mut path = vec![goal];
        let mut current = goal;
        while current != start {
            let prev = self
                .predecessor_of(current)
                .unwrap_or_else(|| panic!("provenance chain broken at node {}", current));
            path.push(prev);
            current = prev;
        }
        path.reverse();
        path
    }
}
