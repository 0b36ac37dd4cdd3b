use std::rc::Rc;

use super::{Agent, AgentError, TrackedCell, check_endpoints, dijkstra::best_first};
use crate::maze::{Board, Coord, manhattan};

pub struct AStar<'a> {
    board: &'a Board,
    pub find: bool,
    pub target_node: Option<Rc<TrackedCell>>,
}

impl<'a> AStar<'a> {
    pub fn new(board: &'a Board) -> Self {
        AStar {
            board,
            find: false,
            target_node: None,
        }
    }

    pub fn initialize(&mut self) -> Result<(), AgentError> {
        check_endpoints(self.board)?;
        self.find = false;
        self.target_node = None;
        Ok(())
    }

    /// Manhattan distance never overestimates on a 4-connected grid, so the first
    /// time the target is popped its cost is optimal.
    pub fn solver(&mut self) {
        let target = self.board.target();
        self.target_node = best_first(self.board, |c| manhattan(c, target));
        self.find = self.target_node.is_some();
    }
}

impl Agent for AStar<'_> {
    fn name(&self) -> &'static str {
        "A*"
    }

    fn solve(&mut self) -> Result<Option<Vec<Coord>>, AgentError> {
        self.initialize()?;
        self.solver();
        Ok(self.target_node.as_ref().map(|node| node.path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_astar_open_field() {
        let board = Board::from_ascii(&["....", "....", "...."], (0, 0), (2, 3)).unwrap();
        let mut astar = AStar::new(&board);
        let path = astar.solve().unwrap().unwrap();
        assert_eq!(path.len() - 1, manhattan((0, 0), (2, 3)));
        // Consecutive cells are adjacent
        assert!(path.windows(2).all(|w| manhattan(w[0], w[1]) == 1));
    }
}
