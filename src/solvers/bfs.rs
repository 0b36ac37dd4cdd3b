use std::collections::VecDeque;

use super::{Agent, AgentError, check_endpoints};
use crate::maze::{Board, Coord};

pub struct Bfs<'a> {
    board: &'a Board,
    queue: VecDeque<Coord>,
    /// Parent of each reached cell, indexed by row-major id
    parents: Vec<Option<Coord>>,
    visited: Vec<bool>,
    pub find: bool,
}

impl<'a> Bfs<'a> {
    pub fn new(board: &'a Board) -> Self {
        Bfs {
            board,
            queue: VecDeque::new(),
            parents: Vec::new(),
            visited: Vec::new(),
            find: false,
        }
    }

    /// Reset the search state and queue the start cell.
    pub fn initialize(&mut self) -> Result<(), AgentError> {
        check_endpoints(self.board)?;
        self.find = false;
        self.parents = vec![None; self.board.len()];
        self.visited = vec![false; self.board.len()];
        self.queue.clear();

        let start = self.board.start();
        self.visited[self.board.ravel_index(start)] = true;
        self.queue.push_back(start);
        Ok(())
    }

    pub fn solver(&mut self) -> Option<Vec<Coord>> {
        let target = self.board.target();
        while let Some(cell) = self.queue.pop_front() {
            if cell == target {
                self.find = true;
                return Some(self.trace(target));
            }
            for (_, next) in self.board.neighbors(cell, false) {
                let idx = self.board.ravel_index(next);
                if !self.visited[idx] {
                    self.visited[idx] = true;
                    self.parents[idx] = Some(cell);
                    self.queue.push_back(next);
                }
            }
        }
        None
    }

    fn trace(&self, target: Coord) -> Vec<Coord> {
        let mut path = vec![target];
        let mut cell = target;
        while let Some(parent) = self.parents[self.board.ravel_index(cell)] {
            path.push(parent);
            cell = parent;
        }
        path.reverse();
        path
    }
}

impl Agent for Bfs<'_> {
    fn name(&self) -> &'static str {
        "BFS"
    }

    fn solve(&mut self) -> Result<Option<Vec<Coord>>, AgentError> {
        self.initialize()?;
        Ok(self.solver())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bfs_no_path() {
        let board = Board::from_ascii(&["..#..", "..#.."], (0, 0), (1, 4)).unwrap();
        let mut bfs = Bfs::new(&board);
        assert_eq!(bfs.solve(), Ok(None));
        assert!(!bfs.find);
    }

    #[test]
    fn test_bfs_start_is_target() {
        let board = Board::from_ascii(&["."], (0, 0), (0, 0)).unwrap();
        let mut bfs = Bfs::new(&board);
        assert_eq!(bfs.solve(), Ok(Some(vec![(0, 0)])));
        assert!(bfs.find);
    }

    #[test]
    fn test_bfs_blocked_start() {
        let board = Board::from_ascii(&["#."], (0, 0), (0, 1)).unwrap();
        let mut bfs = Bfs::new(&board);
        assert_eq!(bfs.solve(), Err(AgentError::StartBlocked((0, 0))));
    }
}
