//! The fork/join search engine.
//!
//! A search runs as a dynamically growing tree of tokio tasks. Each task
//! explores depth-first from its root node, claiming nodes through the shared
//! [`SearchState`]. Corridors (exactly one unclaimed neighbour) are followed
//! inside the same task as a plain loop; branch points spawn one child task
//! per candidate and the parent later joins them all, keeping the first
//! non-empty result in spawn order. Joining is an `.await`, so a waiting
//! parent never pins a worker thread: the runtime's work-stealing workers
//! keep picking up spawned-but-unstarted tasks, which is what makes deep
//! fork trees safe on a bounded thread pool.

use std::sync::Arc;

use futures::future::{join_all, BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use super::state::{Path, SearchState};
use crate::core::errors::{MazeflowError, Result};
use crate::maze::{Maze, NodeId};

/// Configuration for the fork/join search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Minimum number of sequentially claimed nodes a task must accumulate
    /// before a branch point is allowed to fork; until then multi-candidate
    /// branches are explored inside the current task. Zero or negative
    /// disables throttling: every branch with more than one candidate forks.
    pub fork_granularity: i64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self { fork_granularity: 0 }
    }
}

/// Outcome of one search run, with task accounting.
#[derive(Debug, Clone, Serialize)]
pub struct SolveReport {
    /// The discovered path from start to a goal, or `None` when no goal is
    /// reachable. First found, not shortest.
    pub path: Option<Path>,
    /// Nodes claimed across the whole search tree.
    pub nodes_claimed: usize,
    /// Child tasks forked across the whole search tree. Zero for a search
    /// that never hit a multi-candidate branch.
    pub tasks_forked: usize,
}

/// Parallel maze solver. Cheap to construct; one instance may run any number
/// of searches, each with its own freshly created shared state.
#[derive(Debug, Clone, Default)]
pub struct ParallelSolver {
    config: SolverConfig,
}

impl ParallelSolver {
    /// Creates a solver that forks at every multi-candidate branch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a solver with an explicit configuration.
    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Searches `maze` for a path from its start node to any goal.
    ///
    /// Returns `Ok(None)` when no goal is reachable; that is a normal
    /// outcome, not an error. `Err` is reserved for scheduler-level failures
    /// (the root search task panicked or was aborted).
    pub async fn solve<M: Maze + 'static>(&self, maze: Arc<M>) -> Result<Option<Path>> {
        Ok(self.solve_with_report(maze).await?.path)
    }

    /// Like [`solve`](Self::solve), but also reports how much work the
    /// search tree performed.
    pub async fn solve_with_report<M: Maze + 'static>(&self, maze: Arc<M>) -> Result<SolveReport> {
        let state = Arc::new(SearchState::new());
        let start = maze.start();
        info!(
            start,
            fork_granularity = self.config.fork_granularity,
            "starting parallel search"
        );

        let root = tokio::spawn(search_task(
            maze,
            Arc::clone(&state),
            self.config.fork_granularity,
            start,
            start,
        ));
        let path = root.await.map_err(|e| MazeflowError::Execution {
            component: "solver".to_string(),
            message: "root search task failed".to_string(),
            source: Some(Box::new(e)),
        })?;

        let report = SolveReport {
            path,
            nodes_claimed: state.claimed_count(),
            tasks_forked: state.fork_count(),
        };
        match &report.path {
            Some(path) => info!(
                len = path.len(),
                claimed = report.nodes_claimed,
                forked = report.tasks_forked,
                "path found"
            ),
            None => info!(
                claimed = report.nodes_claimed,
                forked = report.tasks_forked,
                "no path to any goal"
            ),
        }
        Ok(report)
    }
}

/// Searches `maze` from its start node, forking at branch points.
///
/// Convenience entry point over [`ParallelSolver`]; see [`SolverConfig`] for
/// the meaning of `fork_granularity`.
pub async fn solve<M: Maze + 'static>(
    maze: Arc<M>,
    fork_granularity: i64,
) -> Result<Option<Path>> {
    ParallelSolver::with_config(SolverConfig { fork_granularity })
        .solve(maze)
        .await
}

/// One search task: explores from `root`, spawning children at branch points.
///
/// Boxed so the task can spawn copies of itself. The exploration itself is an
/// explicit loop over a task-local stack rather than recursion, so arbitrarily
/// long corridors cost no call-stack depth.
fn search_task<M: Maze + 'static>(
    maze: Arc<M>,
    state: Arc<SearchState>,
    fork_granularity: i64,
    start: NodeId,
    root: NodeId,
) -> BoxFuture<'static, Option<Path>> {
    async move {
        let mut pending: Vec<NodeId> = vec![root];
        let mut forks: Vec<JoinHandle<Option<Path>>> = Vec::new();
        let mut steps: i64 = 0;
        let mut found: Option<Path> = None;

        while let Some(node) = pending.pop() {
            if !state.claim(node) {
                // Another task owns this node; abandon the branch.
                trace!(node, "lost claim");
                continue;
            }
            maze.on_advance(node);
            steps += 1;

            if maze.is_goal(node) {
                debug!(node, "goal reached");
                found = Some(state.path_from_to(start, node));
                break;
            }

            let mut candidates: Vec<NodeId> = Vec::new();
            for next in maze.neighbours(node) {
                if !state.is_claimed(next) {
                    // Provenance must be in place before any child task can
                    // reach `next`; first writer wins.
                    state.record_predecessor(next, node);
                    candidates.push(next);
                }
            }

            match candidates.len() {
                // Dead end on this branch; fall back to the local stack.
                0 => {}
                // A corridor: continue in this task instead of paying for a
                // one-step child.
                1 => pending.push(candidates[0]),
                _ => {
                    if fork_granularity > 0 && steps < fork_granularity {
                        // Not enough sequential work yet; keep the whole
                        // branch local. Reversed so exploration order matches
                        // candidate order.
                        candidates.reverse();
                        pending.append(&mut candidates);
                    } else {
                        debug!(node, children = candidates.len(), "forking");
                        steps = 0;
                        for next in candidates {
                            state.note_fork();
                            forks.push(tokio::spawn(search_task(
                                Arc::clone(&maze),
                                Arc::clone(&state),
                                fork_granularity,
                                start,
                                next,
                            )));
                        }
                    }
                }
            }
        }

        // Join every child in spawn order. The first non-empty result wins;
        // later children are still awaited so no work is left dangling, but
        // their results are discarded.
        for joined in join_all(forks).await {
            match joined {
                Ok(Some(path)) => {
                    if found.is_none() {
                        found = Some(path);
                    }
                }
                Ok(None) => {}
                Err(err) => warn!(error = %err, "child search task failed"),
            }
        }
        found
    }
    .boxed()
}
