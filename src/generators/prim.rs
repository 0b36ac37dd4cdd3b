use rand::{Rng, seq::IndexedRandom};

use crate::error::MazeError;
use crate::maze::{Board, Coord, Direction, GridCell};

/// Randomized Prim's carving on a board, followed by optional loop injection.
///
/// Cells an even number of steps away from the start become the maze's rooms; the
/// odd cells between them are carved to join each new room to the tree.
pub struct MazeGenerator<R> {
    rng: R,
}

impl<R: Rng> MazeGenerator<R> {
    /// Pass `&mut rng` to share a generator with the caller.
    pub fn new(rng: R) -> Self {
        MazeGenerator { rng }
    }

    /// Initialize + generate + break walls, the full pipeline for a fresh board.
    pub fn run(&mut self, board: &mut Board, chance: f64) -> Result<(), MazeError> {
        self.initialize(board);
        self.generate(board)?;
        self.break_walls_randomly(board, chance);
        Ok(())
    }

    /// Fill the board with walls, open the start cell and seed the frontier set with
    /// the start's frontiers.
    pub fn initialize(&mut self, board: &mut Board) {
        board.fill_walls();
        board.reset_frontiers();
        if board.is_empty() {
            return;
        }
        let start = board.start();
        board.set(start, GridCell::PASSAGE);
        for frontier in self.get_frontiers(board, start) {
            board.add_frontier(frontier);
        }
    }

    /// Frontiers of a cell: plain walls in bounds at straight-line distance 2.
    pub fn get_frontiers(&self, board: &Board, cell: Coord) -> Vec<Coord> {
        Direction::ALL
            .into_iter()
            .filter_map(|d| d.step(cell, 2))
            .filter(|&c| board.is_in_bounds(c) && board[c] == GridCell::WALL)
            .collect()
    }

    /// Pick a random passage at distance 2 from `frontier`.
    pub fn frontier_neighbor(&mut self, board: &Board, frontier: Coord) -> Option<Coord> {
        let neighbors = Direction::ALL
            .into_iter()
            .filter_map(|d| d.step(frontier, 2))
            .filter(|&c| board.is_passage(c))
            .collect::<Vec<_>>();
        neighbors.choose(&mut self.rng).copied()
    }

    /// Carve the wall cell midway between two cells two steps apart on one axis.
    /// Returns `false` if the cells are not aligned that way or the middle is
    /// already a passage.
    pub fn connect_cell(&self, board: &mut Board, cell_1: Coord, cell_2: Coord) -> bool {
        let (r1, c1) = cell_1;
        let (r2, c2) = cell_2;
        let middle = if r1 == r2 && c1.abs_diff(c2) == 2 {
            (r1, c1.min(c2) + 1)
        } else if c1 == c2 && r1.abs_diff(r2) == 2 {
            (r1.min(r2) + 1, c1)
        } else {
            return false;
        };
        board.carve(middle)
    }

    /// Carve until no frontiers remain.
    pub fn generate(&mut self, board: &mut Board) -> Result<(), MazeError> {
        let mut carved = 0usize;
        while self.step(board)? {
            carved += 1;
        }
        tracing::debug!(
            "[maze] carved {} cells on a {}x{} board",
            carved,
            board.v_cells(),
            board.h_cells()
        );
        Ok(())
    }

    /// Carve one random frontier into the maze. Returns `Ok(false)` once the frontier
    /// set is empty.
    pub fn step(&mut self, board: &mut Board) -> Result<bool, MazeError> {
        let remaining = match board.frontiers() {
            Some(frontiers) => frontiers.len(),
            None => return Err(MazeError::Uninitialized),
        };
        if remaining == 0 {
            return Ok(false);
        }

        // Ramdonly select a cell from the frontiers
        let index = self.rng.random_range(0..remaining);
        let Some(frontier) = board.take_frontier(index) else {
            return Ok(false);
        };
        let Some(neighbor) = self.frontier_neighbor(board, frontier) else {
            // Every frontier comes from a passage two steps away, so this should not
            // happen. Leave the cell as a wall.
            tracing::warn!("[maze] frontier {:?} has no passage neighbor", frontier);
            return Ok(true);
        };

        board.set(frontier, GridCell::PASSAGE);
        self.connect_cell(board, frontier, neighbor);
        for next in self.get_frontiers(board, frontier) {
            board.add_frontier(next);
        }
        Ok(true)
    }

    /// Open up a `chance` fraction of the dead ends by knocking down one of their
    /// surrounding walls, which adds loops and shortcuts to the maze.
    ///
    /// Dead ends (passages with exactly one passage neighbor) are sampled without
    /// replacement. The start and target are candidates like any other cell.
    pub fn break_walls_randomly(&mut self, board: &mut Board, chance: f64) -> usize {
        let chance = if chance.is_nan() { 0.0 } else { chance.clamp(0.0, 1.0) };
        let dead_ends = board
            .passages()
            .filter(|&cell| board.neighbors(cell, false).len() == 1)
            .collect::<Vec<_>>();

        let num_to_remove = (dead_ends.len() as f64 * chance) as usize;
        let chosen = dead_ends
            .choose_multiple(&mut self.rng, num_to_remove)
            .copied()
            .collect::<Vec<_>>();

        let mut removed = 0;
        for cell in chosen {
            let walls = board
                .neighbors(cell, true)
                .into_iter()
                .filter(|&(_, c)| board.is_wall(c))
                .collect::<Vec<_>>();
            if let Some(&(_, wall)) = walls.choose(&mut self.rng) {
                if board.carve(wall) {
                    removed += 1;
                }
            }
        }
        tracing::debug!(
            "[maze] removed {} walls around {} dead ends",
            removed,
            dead_ends.len()
        );
        removed
    }
}
