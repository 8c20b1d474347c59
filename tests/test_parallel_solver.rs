//! Integration tests for the fork/join solver.
//!
//! These exercise the solver end to end against small hand-built mazes plus
//! a wide fan-out stress maze that forces heavy claim contention.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use pretty_assertions::assert_eq;

use mazeflow::{
    solve, Maze, MazeGraph, NodeId, ParallelSolver, SolverConfig,
};

/// Replays `path` against the maze adjacency: starts at the start node, every
/// consecutive pair is a real edge, the last node is a goal, and no node
/// repeats.
fn assert_valid_path(maze: &MazeGraph, path: &[NodeId]) {
    assert!(!path.is_empty(), "path must not be empty");
    assert_eq!(path[0], maze.start(), "path must begin at the start node");
    assert!(
        maze.is_goal(*path.last().unwrap()),
        "path must end at a goal"
    );
    for pair in path.windows(2) {
        assert!(
            maze.has_edge(pair[0], pair[1]),
            "step {} -> {} is not an edge",
            pair[0],
            pair[1]
        );
    }
    let unique: HashSet<NodeId> = path.iter().copied().collect();
    assert_eq!(unique.len(), path.len(), "path repeats a node");
}

/// A layered maze with fan-out `width` at every step: the start connects to
/// `width` nodes, each of which connects to all `width` nodes of the next
/// layer, and so on. A single goal sits in the last layer. Every branch point
/// has `width` candidates, so the solver forks aggressively.
fn fan_out_maze(layers: u64, width: u64) -> MazeGraph {
    let node = |layer: u64, slot: u64| 1 + layer * width + slot;
    let mut edges = Vec::new();
    for slot in 0..width {
        edges.push((0, node(0, slot)));
    }
    for layer in 0..layers - 1 {
        for from in 0..width {
            for to in 0..width {
                edges.push((node(layer, from), node(layer + 1, to)));
            }
        }
    }
    let goal = node(layers - 1, width - 1);
    MazeGraph::new("fan_out", 0, [goal], edges, false).unwrap()
}

#[tokio::test]
async fn test_no_goals_yields_no_path() -> Result<()> {
    let maze = Arc::new(MazeGraph::new(
        "goalless",
        1,
        [],
        [(1, 2), (2, 3), (3, 1)],
        false,
    )?);
    assert_eq!(solve(maze, 0).await?, None);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_goal_yields_no_path() -> Result<()> {
    // The goal exists but no edge leads to it from the start component.
    let maze = Arc::new(MazeGraph::new(
        "island",
        1,
        [5],
        [(1, 2), (2, 3), (4, 5)],
        false,
    )?);
    assert_eq!(solve(maze, 0).await?, None);
    Ok(())
}

#[tokio::test]
async fn test_goal_at_start() -> Result<()> {
    let maze = Arc::new(MazeGraph::new("here", 1, [1], [(1, 2)], false)?);
    assert_eq!(solve(maze, 0).await?, Some(vec![1]));
    Ok(())
}

#[tokio::test]
async fn test_unique_path_returned_exactly() -> Result<()> {
    let maze = Arc::new(MazeGraph::new(
        "zigzag",
        1,
        [6],
        [(1, 3), (3, 2), (2, 5), (5, 6)],
        false,
    )?);
    assert_eq!(solve(maze, 0).await?, Some(vec![1, 3, 2, 5, 6]));
    Ok(())
}

#[tokio::test]
async fn test_corridor_never_forks() -> Result<()> {
    let maze = Arc::new(MazeGraph::new(
        "corridor",
        1,
        [4],
        [(1, 2), (2, 3), (3, 4)],
        false,
    )?);
    let report = ParallelSolver::new().solve_with_report(maze).await?;
    assert_eq!(report.path, Some(vec![1, 2, 3, 4]));
    assert_eq!(report.tasks_forked, 0, "a corridor must stay sequential");
    assert_eq!(report.nodes_claimed, 4);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_diamond_returns_either_branch() -> Result<()> {
    let maze = Arc::new(MazeGraph::new(
        "diamond",
        1,
        [4],
        [(1, 2), (1, 3), (2, 4), (3, 4)],
        false,
    )?);
    for _ in 0..20 {
        let path = solve(Arc::clone(&maze), 0).await?.expect("diamond has a path");
        assert_eq!(path.len(), 3);
        assert!(path == vec![1, 2, 4] || path == vec![1, 3, 4], "got {:?}", path);
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_fan_out_stress_paths_stay_valid() -> Result<()> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let maze = Arc::new(fan_out_maze(6, 6));
    for _ in 0..20 {
        let report = ParallelSolver::new()
            .solve_with_report(Arc::clone(&maze))
            .await?;
        let path = report.path.expect("fan-out maze has a path");
        assert_valid_path(&maze, &path);
        assert!(report.tasks_forked > 0, "fan-out must fork");
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_disjoint_routes_yield_some_valid_path() -> Result<()> {
    // Two fully disjoint corridors of different length to the same goal.
    let maze = Arc::new(MazeGraph::new(
        "two_routes",
        1,
        [9],
        [(1, 2), (2, 9), (1, 3), (3, 4), (4, 5), (5, 9)],
        false,
    )?);
    for _ in 0..10 {
        let path = solve(Arc::clone(&maze), 0).await?.expect("goal is reachable");
        assert_valid_path(&maze, &path);
    }
    Ok(())
}

#[tokio::test]
async fn test_fork_granularity_throttles_forking() -> Result<()> {
    let maze = Arc::new(fan_out_maze(4, 3));

    // A granularity larger than the maze keeps the whole search in one task.
    let throttled = ParallelSolver::with_config(SolverConfig {
        fork_granularity: 10_000,
    });
    let report = throttled.solve_with_report(Arc::clone(&maze)).await?;
    let path = report.path.expect("fan-out maze has a path");
    assert_valid_path(&maze, &path);
    assert_eq!(report.tasks_forked, 0);

    // Negative means no throttling at all.
    let eager = ParallelSolver::with_config(SolverConfig {
        fork_granularity: -1,
    });
    let report = eager.solve_with_report(Arc::clone(&maze)).await?;
    assert_valid_path(&maze, &report.path.expect("fan-out maze has a path"));
    assert!(report.tasks_forked > 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_undirected_grid() -> Result<()> {
    // 4x4 undirected grid, start at one corner, goal at the opposite one.
    let id = |x: u64, y: u64| y * 4 + x;
    let mut edges = Vec::new();
    for y in 0..4 {
        for x in 0..4 {
            if x + 1 < 4 {
                edges.push((id(x, y), id(x + 1, y)));
            }
            if y + 1 < 4 {
                edges.push((id(x, y), id(x, y + 1)));
            }
        }
    }
    let maze = Arc::new(MazeGraph::new("grid", id(0, 0), [id(3, 3)], edges, true)?);
    for _ in 0..10 {
        let path = solve(Arc::clone(&maze), 0).await?.expect("grid is connected");
        assert_valid_path(&maze, &path);
        assert!(path.len() >= 7, "corner-to-corner needs at least 7 nodes");
    }
    Ok(())
}

/// Wrapper maze that counts move notifications.
struct Observed {
    inner: MazeGraph,
    advances: AtomicUsize,
}

impl Maze for Observed {
    fn start(&self) -> NodeId {
        self.inner.start()
    }

    fn neighbours(&self, node: NodeId) -> Vec<NodeId> {
        self.inner.neighbours(node)
    }

    fn is_goal(&self, node: NodeId) -> bool {
        self.inner.is_goal(node)
    }

    fn on_advance(&self, _node: NodeId) {
        self.advances.fetch_add(1, Ordering::Relaxed);
    }
}

#[tokio::test]
async fn test_move_hook_fires_once_per_claim() -> Result<()> {
    let maze = Arc::new(Observed {
        inner: MazeGraph::new("corridor", 1, [3], [(1, 2), (2, 3)], false)?,
        advances: AtomicUsize::new(0),
    });
    let report = ParallelSolver::new()
        .solve_with_report(Arc::clone(&maze))
        .await?;
    assert_eq!(report.path, Some(vec![1, 2, 3]));
    assert_eq!(maze.advances.load(Ordering::Relaxed), report.nodes_claimed);
    Ok(())
}
