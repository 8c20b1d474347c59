//! Mazeflow - a parallel fork/join maze solver.
//!
//! Given a graph-like maze exposing a start node, adjacency, and goal
//! membership, the engine finds *a* path from start to any goal (first
//! discovered, not shortest) by spawning independent search tasks at branch
//! points and joining their results. The shared visited set and predecessor
//! map are the only cross-task state; both are mutated exclusively through
//! linearizable insert-if-absent operations, so concurrent exploration never
//! duplicates work and never races on provenance.

// Core infrastructure modules
pub mod core {
    pub mod errors;
}

// The two halves of the system
pub mod maze; // the graph collaborator the engine reads from
pub mod solve; // the fork/join search engine

// Re-exports for convenience
pub use crate::core::errors::{MazeflowError, Result};
pub use maze::{Maze, MazeGraph, MazeSpec, NodeId};
pub use solve::{solve, ParallelSolver, Path, SearchState, SolveReport, SolverConfig};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_solve_smoke() {
        let maze = Arc::new(
            MazeGraph::new("smoke", 1, [3], [(1, 2), (2, 3)], false).unwrap(),
        );
        let path = solve(maze, 0).await.unwrap();
        assert_eq!(path, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_solver_reuse_across_runs() {
        let solver = ParallelSolver::new();
        let maze = Arc::new(
            MazeGraph::new("pair", 1, [2], [(1, 2)], true).unwrap(),
        );
        for _ in 0..3 {
            let report = solver.solve_with_report(Arc::clone(&maze)).await.unwrap();
            assert_eq!(report.path, Some(vec![1, 2]));
            assert_eq!(report.nodes_claimed, 2);
        }
    }
}
