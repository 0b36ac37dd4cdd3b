//! Procedural maze generation plus a genetic search over maze-solving strategies.
//!
//! Mazes are carved with randomized Prim's algorithm and then given extra loops.
//! The optimizer treats "which solver, with which hyperparameters" as a genome and
//! scores each one by solving freshly generated mazes.

pub mod error;
pub mod generators;
pub mod maze;
pub mod optimizer;
pub mod solvers;

pub use error::{MazeError, OptimizerError};
pub use generators::MazeGenerator;
pub use maze::{Board, Coord, GridCell};
pub use optimizer::{Evolution, GeneticOptimizer, Genome, OptimizerConfig, SearchAlgorithm};
pub use solvers::{Agent, AgentError, Solver};
