use crossterm::style::{Color, Stylize};

use std::fmt;

/// Represents a cell in the board, which is either part of the maze or a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCell {
    Passage,
    Wall(WallType),
}

impl GridCell {
    pub const PASSAGE: GridCell = GridCell::Passage;
    pub const WALL: GridCell = GridCell::Wall(WallType::Block);
    pub const FRONTIER: GridCell = GridCell::Wall(WallType::Frontier);
    /// The width of each cell when rendered, in character widths.
    pub const CELL_WIDTH: u16 = 2;

    /// Frontier cells are still walls until they get carved.
    pub fn is_wall(&self) -> bool {
        matches!(self, GridCell::Wall(_))
    }

    pub fn is_passage(&self) -> bool {
        matches!(self, GridCell::Passage)
    }
}

/// Represents different types of wall cells in the board.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallType {
    #[default]
    Block,
    /// A wall at distance 2 from the carved region, waiting to be carved.
    Frontier,
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            GridCell::Passage => "  ".with(Color::Reset),
            GridCell::Wall(WallType::Block) => "⬜".with(Color::White),
            GridCell::Wall(WallType::Frontier) => "🟪".with(Color::Magenta),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                GridCell::CELL_WIDTH as usize,
                "Each cell must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frontier_is_a_wall() {
        assert!(GridCell::FRONTIER.is_wall());
        assert!(GridCell::WALL.is_wall());
        assert!(!GridCell::PASSAGE.is_wall());
        assert!(GridCell::PASSAGE.is_passage());
    }

    #[test]
    fn test_display_keeps_cell_width() {
        // Display asserts the width in debug builds
        for cell in [GridCell::PASSAGE, GridCell::WALL, GridCell::FRONTIER] {
            assert!(!format!("{cell}").is_empty());
        }
    }
}
