//! Error types shared across the maze, solver and optimizer modules.

use crate::maze::Coord;

/// Errors raised while building or carving a board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    /// `generate` was called before `initialize` set up the frontier set.
    #[error("maze generation requires an initialized frontier set; call initialize first")]
    Uninitialized,
    /// A coordinate lies outside a `rows x cols` grid.
    #[error("cell {coord:?} is outside the {rows}x{cols} grid")]
    OutOfBounds { coord: Coord, rows: u16, cols: u16 },
    /// Grid dimensions do not fit in a `u16`.
    #[error("a {rows}x{cols} grid exceeds the {max}x{max} limit", max = u16::MAX)]
    TooLarge { rows: usize, cols: usize },
}

/// Errors raised by the optimizer itself. Bad configurations never surface
/// here; they only score zero.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptimizerError {
    #[error("population size must be at least 1")]
    EmptyPopulation,
    /// Offspring are bred from two distinct survivors.
    #[error("recombination needs at least 2 survivors, found {survivors}")]
    PopulationExhausted { survivors: usize },
}
