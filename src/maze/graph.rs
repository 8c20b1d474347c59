//! Petgraph-backed maze graphs, buildable in code or loaded from YAML
//! descriptions.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path as FsPath;

use petgraph::graph::{DiGraph, NodeIndex};
use serde::Deserialize;
use tracing::debug;

use super::{Maze, NodeId};
use crate::core::errors::{MazeflowError, Result};

/// Declarative description of a maze, deserializable from YAML.
///
/// ```yaml
/// name: diamond
/// start: 1
/// goals: [4]
/// undirected: true
/// edges:
///   - [1, 2]
///   - [1, 3]
///   - [2, 4]
///   - [3, 4]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct MazeSpec {
    /// Human-readable name of the maze.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// The node searches begin from. Must appear in `edges` unless the maze
    /// is a single isolated node.
    pub start: NodeId,
    /// Goal nodes. May be empty; the solver then reports no path.
    pub goals: Vec<NodeId>,
    /// Adjacency as `[from, to]` pairs.
    pub edges: Vec<(NodeId, NodeId)>,
    /// When true every edge is mirrored, giving an undirected maze.
    #[serde(default)]
    pub undirected: bool,
}

/// A maze backed by a `petgraph` directed graph.
#[derive(Debug)]
pub struct MazeGraph {
    graph: DiGraph<NodeId, ()>,
    indices: HashMap<NodeId, NodeIndex>,
    goals: HashSet<NodeId>,
    start: NodeId,
    name: String,
}

impl MazeGraph {
    /// Builds a maze from explicit parts. The start node must be present in
    /// the graph; goals that reference unknown nodes are rejected.
    pub fn new(
        name: impl Into<String>,
        start: NodeId,
        goals: impl IntoIterator<Item = NodeId>,
        edges: impl IntoIterator<Item = (NodeId, NodeId)>,
        undirected: bool,
    ) -> Result<Self> {
        let mut graph = DiGraph::new();
        let mut indices: HashMap<NodeId, NodeIndex> = HashMap::new();

        let mut index_of = |graph: &mut DiGraph<NodeId, ()>, id: NodeId| {
            *indices.entry(id).or_insert_with(|| graph.add_node(id))
        };

        for (from, to) in edges {
            let a = index_of(&mut graph, from);
            let b = index_of(&mut graph, to);
            graph.update_edge(a, b, ());
            if undirected {
                graph.update_edge(b, a, ());
            }
        }
        // A maze consisting of just its start node is legal.
        if graph.node_count() == 0 {
            let idx = graph.add_node(start);
            indices.insert(start, idx);
        }

        if !indices.contains_key(&start) {
            return Err(MazeflowError::validation_field(
                format!("start node {} is not part of the maze", start),
                "start".to_string(),
            ));
        }
        let goals: HashSet<NodeId> = goals.into_iter().collect();
        if let Some(unknown) = goals.iter().find(|g| !indices.contains_key(*g)) {
            return Err(MazeflowError::validation_field(
                format!("goal node {} is not part of the maze", unknown),
                "goals".to_string(),
            ));
        }

        let name = name.into();
        debug!(
            maze = %name,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            goals = goals.len(),
            "built maze graph"
        );

        Ok(Self {
            graph,
            indices,
            goals,
            start,
            name,
        })
    }

    /// Builds a maze from a parsed [`MazeSpec`].
    pub fn from_spec(spec: MazeSpec) -> Result<Self> {
        Self::new(spec.name, spec.start, spec.goals, spec.edges, spec.undirected)
    }

    /// Parses a YAML maze description and builds the graph.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let spec: MazeSpec = serde_yaml::from_str(yaml)
            .map_err(|e| MazeflowError::serialization("yaml", Box::new(e)))?;
        Self::from_spec(spec)
    }

    /// Loads a maze description from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<FsPath>) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path)
            .map_err(|e| MazeflowError::io(format!("open {}", path.display()), e))?;
        let mut yaml = String::new();
        file.read_to_string(&mut yaml)
            .map_err(|e| MazeflowError::io(format!("read {}", path.display()), e))?;
        Self::from_yaml_str(&yaml)
    }

    /// The name given to this maze.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of nodes in the maze.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Whether the maze contains a direct edge from `from` to `to`.
    /// Useful for replaying a returned path against the adjacency.
    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        match (self.indices.get(&from), self.indices.get(&to)) {
            (Some(&a), Some(&b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }
}

impl Maze for MazeGraph {
    fn start(&self) -> NodeId {
        self.start
    }

    fn neighbours(&self, node: NodeId) -> Vec<NodeId> {
        let Some(&idx) = self.indices.get(&node) else {
            return Vec::new();
        };
        let mut out: Vec<NodeId> = self.graph.neighbors(idx).map(|n| self.graph[n]).collect();
        // petgraph iterates in reverse insertion order; sort for determinism
        out.sort_unstable();
        out
    }

    fn is_goal(&self, node: NodeId) -> bool {
        self.goals.contains(&node)
    }
}
