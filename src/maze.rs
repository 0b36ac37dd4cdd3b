pub mod cell;
pub mod render;

pub use cell::{GridCell, WallType};

use crate::error::MazeError;

/// A `(row, col)` position on the board.
pub type Coord = (u16, u16);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Move `distance` cells from `coord` in this direction, or `None` if the step
    /// leaves the `u16` coordinate range. The result may still be off the board.
    pub fn step(self, coord: Coord, distance: u16) -> Option<Coord> {
        let (row, col) = coord;
        match self {
            Direction::Up => Some((row.checked_sub(distance)?, col)),
            Direction::Down => Some((row.checked_add(distance)?, col)),
            Direction::Left => Some((row, col.checked_sub(distance)?)),
            Direction::Right => Some((row, col.checked_add(distance)?)),
        }
    }
}

/// Cells waiting to be carved, picked uniformly at random by index.
///
/// Membership is mirrored on the board by [`WallType::Frontier`], which keeps
/// duplicate checks O(1).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontierSet {
    cells: Vec<Coord>,
}

impl FrontierSet {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coord> {
        self.cells.iter()
    }

    fn push(&mut self, coord: Coord) {
        self.cells.push(coord);
    }

    /// Remove the cell at `index` in O(1), not preserving order.
    fn take(&mut self, index: usize) -> Coord {
        self.cells.swap_remove(index)
    }
}

/// A `v_cells x h_cells` grid where every cell is either a wall or a passage.
///
/// The wall/passage partition holds by construction: each cell stores exactly
/// one [`GridCell`].
#[derive(Debug, Clone)]
pub struct Board {
    grid: Box<[GridCell]>,
    v_cells: u16,
    h_cells: u16,
    start: Coord,
    target: Coord,
    /// `None` until the generator initializes the board.
    frontiers: Option<FrontierSet>,
    /// Solution path from start to target, set after a successful solve.
    path: Option<Vec<Coord>>,
}

impl Board {
    /// Creates an all-wall board. `start` and `target` must be in bounds unless
    /// the grid is empty.
    pub fn new(v_cells: u16, h_cells: u16, start: Coord, target: Coord) -> Result<Self, MazeError> {
        let grid = vec![GridCell::WALL; v_cells as usize * h_cells as usize].into_boxed_slice();
        let board = Board {
            grid,
            v_cells,
            h_cells,
            start,
            target,
            frontiers: None,
            path: None,
        };
        if !board.is_empty() {
            board.check_bounds(start)?;
            board.check_bounds(target)?;
        }
        Ok(board)
    }

    /// Builds a board from rows of text, `#` for walls and anything else for passages.
    /// Short rows are padded with walls.
    pub fn from_ascii(rows: &[&str], start: Coord, target: Coord) -> Result<Self, MazeError> {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let (Ok(v_cells), Ok(h_cells)) = (u16::try_from(rows.len()), u16::try_from(width)) else {
            return Err(MazeError::TooLarge {
                rows: rows.len(),
                cols: width,
            });
        };
        let mut board = Board::new(v_cells, h_cells, start, target)?;
        for (row, line) in (0..v_cells).zip(rows) {
            for (col, ch) in (0..h_cells).zip(line.chars()) {
                if ch != '#' {
                    board.set((row, col), GridCell::PASSAGE);
                }
            }
        }
        Ok(board)
    }

    /// A fresh all-wall board with the same geometry, start and target.
    pub fn blank_copy(&self) -> Self {
        Board {
            grid: vec![GridCell::WALL; self.grid.len()].into_boxed_slice(),
            v_cells: self.v_cells,
            h_cells: self.h_cells,
            start: self.start,
            target: self.target,
            frontiers: None,
            path: None,
        }
    }

    /// Number of rows.
    pub fn v_cells(&self) -> u16 {
        self.v_cells
    }

    /// Number of columns.
    pub fn h_cells(&self) -> u16 {
        self.h_cells
    }

    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    pub fn start(&self) -> Coord {
        self.start
    }

    pub fn target(&self) -> Coord {
        self.target
    }

    pub fn set_start(&mut self, start: Coord) -> Result<(), MazeError> {
        self.check_bounds(start)?;
        self.start = start;
        Ok(())
    }

    pub fn set_target(&mut self, target: Coord) -> Result<(), MazeError> {
        self.check_bounds(target)?;
        self.target = target;
        Ok(())
    }

    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        coord.0 < self.v_cells && coord.1 < self.h_cells
    }

    fn check_bounds(&self, coord: Coord) -> Result<(), MazeError> {
        if self.is_in_bounds(coord) {
            Ok(())
        } else {
            Err(MazeError::OutOfBounds {
                coord,
                rows: self.v_cells,
                cols: self.h_cells,
            })
        }
    }

    /// Row-major index of an in-bounds coordinate.
    pub fn ravel_index(&self, coord: Coord) -> usize {
        // Overflow-safe since both dimensions are u16 (assuming usize is at least 32 bits)
        coord.0 as usize * self.h_cells as usize + coord.1 as usize
    }

    /// Out-of-bounds cells count as walls.
    pub fn is_wall(&self, coord: Coord) -> bool {
        !self.is_passage(coord)
    }

    pub fn is_passage(&self, coord: Coord) -> bool {
        self.is_in_bounds(coord) && self[coord].is_passage()
    }

    pub(crate) fn set(&mut self, coord: Coord, cell: GridCell) {
        let idx = self.ravel_index(coord);
        self.grid[idx] = cell;
    }

    /// Resets every cell to a plain wall and forgets frontiers and path.
    pub fn fill_walls(&mut self) {
        self.grid.fill(GridCell::WALL);
        self.frontiers = None;
        self.path = None;
    }

    /// Turns a plain wall into a passage. Returns `false` if nothing changed.
    ///
    /// Frontier-marked walls are left alone; only the generator carves those, since
    /// it must also drop them from the frontier set.
    pub fn carve(&mut self, coord: Coord) -> bool {
        if self.is_in_bounds(coord) && self[coord] == GridCell::WALL {
            self.set(coord, GridCell::PASSAGE);
            true
        } else {
            false
        }
    }

    /// All coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        let (rows, cols) = (self.v_cells, self.h_cells);
        (0..rows).flat_map(move |r| (0..cols).map(move |c| (r, c)))
    }

    pub fn passages(&self) -> impl Iterator<Item = Coord> + '_ {
        self.coords().filter(|&c| self[c].is_passage())
    }

    pub fn walls(&self) -> impl Iterator<Item = Coord> + '_ {
        self.coords().filter(|&c| self[c].is_wall())
    }

    /// Adjacent in-bounds cells labeled by direction, in Up, Down, Left, Right order.
    /// With `wall_included == false` only passages are returned.
    pub fn neighbors(&self, coord: Coord, wall_included: bool) -> Vec<(Direction, Coord)> {
        if !self.is_in_bounds(coord) {
            return Vec::new();
        }
        Direction::ALL
            .into_iter()
            .filter_map(|d| d.step(coord, 1).map(|c| (d, c)))
            .filter(|&(_, c)| self.is_in_bounds(c))
            .filter(|&(_, c)| wall_included || self[c].is_passage())
            .collect()
    }

    pub fn frontiers(&self) -> Option<&FrontierSet> {
        self.frontiers.as_ref()
    }

    /// Starts an empty frontier set, marking the board as initialized.
    pub(crate) fn reset_frontiers(&mut self) {
        self.frontiers = Some(FrontierSet::default());
    }

    /// Marks a plain wall as frontier and records it. Returns `false` if the cell is
    /// not a plain wall, the set is uninitialized, or the cell is out of bounds.
    pub(crate) fn add_frontier(&mut self, coord: Coord) -> bool {
        if !self.is_in_bounds(coord) || self[coord] != GridCell::WALL {
            return false;
        }
        let idx = self.ravel_index(coord);
        match self.frontiers.as_mut() {
            Some(frontiers) => {
                frontiers.push(coord);
                self.grid[idx] = GridCell::FRONTIER;
                true
            }
            None => false,
        }
    }

    /// Removes the frontier at `index` and turns it back into a plain wall mark-wise.
    pub(crate) fn take_frontier(&mut self, index: usize) -> Option<Coord> {
        let frontiers = self.frontiers.as_mut()?;
        if index >= frontiers.len() {
            return None;
        }
        let coord = frontiers.take(index);
        self.set(coord, GridCell::WALL);
        Some(coord)
    }

    pub fn path(&self) -> Option<&[Coord]> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: Vec<Coord>) {
        self.path = Some(path);
    }
}

impl std::ops::Index<Coord> for Board {
    type Output = GridCell;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.grid[self.ravel_index(index)]
    }
}

/// Manhattan distance between two cells.
pub fn manhattan(a: Coord, b: Coord) -> usize {
    a.0.abs_diff(b.0) as usize + a.1.abs_diff(b.1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_indexing() {
        let mut board = Board::new(5, 4, (0, 0), (4, 3)).unwrap();
        assert_eq!(board[(2, 3)], GridCell::WALL);
        board.set((2, 3), GridCell::PASSAGE);
        assert_eq!(board[(2, 3)], GridCell::PASSAGE);
        assert_eq!(board.ravel_index((2, 3)), 11);
    }

    #[test]
    fn test_out_of_bounds() {
        let board = Board::new(5, 5, (0, 0), (4, 4)).unwrap();
        assert!(!board.is_in_bounds((5, 5)));
        assert!(!board.is_in_bounds((0, 5)));
        assert!(!board.is_in_bounds((5, 0)));
        assert!(board.is_in_bounds((4, 4)));
        assert!(board.is_wall((9, 9)));
        assert!(matches!(
            Board::new(3, 3, (0, 0), (3, 0)),
            Err(MazeError::OutOfBounds { coord: (3, 0), .. })
        ));
    }

    #[test]
    fn test_step_stays_in_coordinate_range() {
        assert_eq!(Direction::Up.step((0, 3), 2), None);
        assert_eq!(Direction::Left.step((3, 1), 2), None);
        assert_eq!(Direction::Down.step((u16::MAX - 1, 0), 2), None);
        assert_eq!(Direction::Right.step((0, u16::MAX), 1), None);
        assert_eq!(Direction::Up.step((5, 3), 2), Some((3, 3)));
        assert_eq!(Direction::Right.step((5, 3), 2), Some((5, 5)));
    }

    #[test]
    fn test_neighbors_on_tallest_board() {
        let board = Board::new(u16::MAX, 1, (0, 0), (u16::MAX - 1, 0)).unwrap();
        assert_eq!(board.neighbors((0, 0), true), vec![(Direction::Down, (1, 0))]);
        assert_eq!(
            board.neighbors((u16::MAX - 1, 0), true),
            vec![(Direction::Up, (u16::MAX - 2, 0))]
        );
    }

    #[test]
    fn test_from_ascii_rejects_oversized_grid() {
        let wide = ".".repeat(u16::MAX as usize + 1);
        assert_eq!(
            Board::from_ascii(&[wide.as_str()], (0, 0), (0, 0)).unwrap_err(),
            MazeError::TooLarge {
                rows: 1,
                cols: u16::MAX as usize + 1
            }
        );
        let tall = vec!["."; u16::MAX as usize + 1];
        assert!(matches!(
            Board::from_ascii(&tall, (0, 0), (0, 0)),
            Err(MazeError::TooLarge { rows: 65536, cols: 1 })
        ));
    }

    #[test]
    fn test_empty_board_is_legal() {
        let board = Board::new(0, 0, (0, 0), (0, 0)).unwrap();
        assert!(board.is_empty());
        assert_eq!(board.coords().count(), 0);
    }

    #[test]
    fn test_neighbors() {
        let board = Board::from_ascii(&["#.#", "...", "###"], (1, 1), (1, 0)).unwrap();
        let all = board.neighbors((1, 1), true);
        assert_eq!(
            all,
            vec![
                (Direction::Up, (0, 1)),
                (Direction::Down, (2, 1)),
                (Direction::Left, (1, 0)),
                (Direction::Right, (1, 2)),
            ]
        );
        let open = board.neighbors((1, 1), false);
        assert_eq!(open.len(), 3);
        assert!(open.iter().all(|&(_, c)| board.is_passage(c)));
        // Corner cells only have in-bounds neighbors
        assert_eq!(board.neighbors((0, 0), true).len(), 2);
    }

    #[test]
    fn test_carve_skips_frontiers() {
        let mut board = Board::new(3, 3, (0, 0), (2, 2)).unwrap();
        board.reset_frontiers();
        assert!(board.add_frontier((0, 2)));
        // Already marked
        assert!(!board.add_frontier((0, 2)));
        assert!(!board.carve((0, 2)));
        assert!(board.carve((1, 1)));
        assert!(!board.carve((1, 1)));
        assert_eq!(board.take_frontier(0), Some((0, 2)));
        assert_eq!(board[(0, 2)], GridCell::WALL);
    }

    #[test]
    fn test_blank_copy_keeps_geometry() {
        let mut board = Board::from_ascii(&["..", ".."], (0, 0), (1, 1)).unwrap();
        board.set_path(vec![(0, 0), (0, 1), (1, 1)]);
        let copy = board.blank_copy();
        assert_eq!((copy.v_cells(), copy.h_cells()), (2, 2));
        assert_eq!((copy.start(), copy.target()), ((0, 0), (1, 1)));
        assert!(copy.passages().next().is_none());
        assert!(copy.path().is_none());
        assert!(copy.frontiers().is_none());
    }
}
