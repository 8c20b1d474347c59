//! The maze-graph collaborator: the read interface the solver consumes, plus
//! a petgraph-backed implementation loadable from YAML descriptions.

pub mod graph;

pub use graph::{MazeGraph, MazeSpec};

/// Identifier of a location in a maze. Opaque to the solver; only equality
/// and hashing are used.
pub type NodeId = u64;

/// Read interface over a maze graph.
///
/// The solver only ever reads through this trait; it never mutates the maze.
/// Implementations must be shareable across worker threads.
pub trait Maze: Send + Sync {
    /// The node every search begins from.
    fn start(&self) -> NodeId;

    /// All nodes adjacent to `node`. The solver imposes no ordering
    /// requirement, but implementations should iterate deterministically so
    /// that single-path searches are reproducible.
    fn neighbours(&self, node: NodeId) -> Vec<NodeId>;

    /// Whether `node` is a goal.
    fn is_goal(&self, node: NodeId) -> bool;

    /// Notification hook fired when a search task's cursor advances to a new
    /// node. Purely observational (visualization, test instrumentation);
    /// the default does nothing.
    fn on_advance(&self, _node: NodeId) {}
}

impl<M: Maze + ?Sized> Maze for std::sync::Arc<M> {
    fn start(&self) -> NodeId {
        (**self).start()
    }

    fn neighbours(&self, node: NodeId) -> Vec<NodeId> {
        (**self).neighbours(node)
    }

    fn is_goal(&self, node: NodeId) -> bool {
        (**self).is_goal(node)
    }

    fn on_advance(&self, node: NodeId) {
        (**self).on_advance(node)
    }
}
