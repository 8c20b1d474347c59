//! The parallel fork/join search engine.

pub mod parallel;
pub mod state;

pub use parallel::{solve, ParallelSolver, SolveReport, SolverConfig};
pub use state::{Path, SearchState};
