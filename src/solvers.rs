use std::rc::Rc;

mod astar;
mod bfs;
mod dijkstra;
mod q_learning;

pub use astar::AStar;
pub use bfs::Bfs;
pub use dijkstra::Dijkstra;
pub use q_learning::QLearning;

use crate::maze::{Board, Coord};

/// A maze-solving agent bound to one board.
pub trait Agent {
    fn name(&self) -> &'static str;

    /// Run the agent. `Ok(Some(path))` holds the cells from start to target inclusive,
    /// `Ok(None)` means no path was found.
    fn solve(&mut self) -> Result<Option<Vec<Coord>>, AgentError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    #[error("start cell {0:?} is not a passage")]
    StartBlocked(Coord),
    #[error("target cell {0:?} is not a passage")]
    TargetBlocked(Coord),
}

/// Both endpoints must be open before any search can run.
fn check_endpoints(board: &Board) -> Result<(), AgentError> {
    if !board.is_passage(board.start()) {
        return Err(AgentError::StartBlocked(board.start()));
    }
    if !board.is_passage(board.target()) {
        return Err(AgentError::TargetBlocked(board.target()));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Solver {
    Dijkstra,
    Bfs,
    AStar,
    QLearning,
}

impl Solver {
    pub const ALL: [Solver; 4] = [Solver::Dijkstra, Solver::Bfs, Solver::AStar, Solver::QLearning];
}

impl std::fmt::Display for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Solver::Dijkstra => write!(f, "Dijkstra's Algorithm"),
            Solver::Bfs => write!(f, "Breadth-First Search (BFS)"),
            Solver::AStar => write!(f, "A* Search"),
            Solver::QLearning => write!(f, "Q-Learning"),
        }
    }
}

#[derive(Debug, Default)]
pub struct TrackedCell {
    /// Coordinates of the cell in the board
    pub coord: Coord,
    /// The parent cell from which this cell was reached
    pub parent: Option<Rc<TrackedCell>>,
    /// Cost to reach this cell from the start
    pub traveling_cost: usize,
    /// Estimated cost to reach the target from this cell (for A* algorithm)
    pub heuristic_cost: usize,
}

impl TrackedCell {
    fn total_cost(&self) -> usize {
        self.traveling_cost + self.heuristic_cost
    }

    /// Cells from the root of the chain to this cell.
    pub fn path(&self) -> Vec<Coord> {
        let mut path = vec![self.coord];
        let mut node = self.parent.as_deref();
        while let Some(parent) = node {
            path.push(parent.coord);
            node = parent.parent.as_deref();
        }
        path.reverse();
        path
    }
}

// Heap order only looks at costs, ties go to the cell closer to the target.
impl PartialEq for TrackedCell {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for TrackedCell {}

impl PartialOrd for TrackedCell {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TrackedCell {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.total_cost()
            .cmp(&other.total_cost())
            .then(self.heuristic_cost.cmp(&other.heuristic_cost))
            .then(self.coord.cmp(&other.coord))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracked_cell_chain() {
        let root = Rc::new(TrackedCell {
            coord: (0, 0),
            ..Default::default()
        });
        let mid = Rc::new(TrackedCell {
            coord: (0, 1),
            parent: Some(root),
            traveling_cost: 1,
            heuristic_cost: 0,
        });
        let tip = TrackedCell {
            coord: (1, 1),
            parent: Some(mid),
            traveling_cost: 2,
            heuristic_cost: 0,
        };
        assert_eq!(tip.path(), vec![(0, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn test_check_endpoints() {
        let board = Board::from_ascii(&["..#", "#.."], (0, 0), (0, 2)).unwrap();
        assert_eq!(check_endpoints(&board), Err(AgentError::TargetBlocked((0, 2))));
        let board = Board::from_ascii(&["#..", "#.."], (0, 0), (1, 2)).unwrap();
        assert_eq!(check_endpoints(&board), Err(AgentError::StartBlocked((0, 0))));
    }

    #[test]
    fn test_all_agents_find_shortest_corridor() {
        let board = Board::from_ascii(
            &[
                ".....", //
                ".###.", //
                ".#...", //
                ".#.#.", //
                "...#.",
            ],
            (0, 0),
            (4, 4),
        )
        .unwrap();
        let mut agents: Vec<Box<dyn Agent + '_>> = vec![
            Box::new(Bfs::new(&board)),
            Box::new(Dijkstra::new(&board)),
            Box::new(AStar::new(&board)),
        ];
        for agent in agents.iter_mut() {
            let path = agent.solve().unwrap().unwrap();
            assert_eq!(path.first(), Some(&(0, 0)), "{}", agent.name());
            assert_eq!(path.last(), Some(&(4, 4)), "{}", agent.name());
            assert_eq!(path.len() - 1, 8, "{}", agent.name());
        }
    }
}
