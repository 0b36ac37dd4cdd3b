use std::{cmp::Reverse, collections::BinaryHeap, rc::Rc};

use super::{Agent, AgentError, TrackedCell, check_endpoints};
use crate::maze::{Board, Coord};

/// Uniform-cost search over passages, with an optional heuristic for A*.
/// Returns the target's node, whose parent chain leads back to the start.
pub(super) fn best_first(board: &Board, heuristic: impl Fn(Coord) -> usize) -> Option<Rc<TrackedCell>> {
    let start = board.start();
    let target = board.target();

    // Using Reverse to turn the max-heap into a min-heap
    let mut pq: BinaryHeap<Reverse<TrackedCell>> = BinaryHeap::new();
    pq.push(Reverse(TrackedCell {
        coord: start,
        parent: None,
        traveling_cost: 0,
        heuristic_cost: heuristic(start),
    }));

    // Minimum known cost to reach each cell
    let mut costs = vec![usize::MAX; board.len()];
    costs[board.ravel_index(start)] = 0;

    while let Some(Reverse(current)) = pq.pop() {
        if current.coord == target {
            return Some(Rc::new(current));
        }
        // Skip stale heap entries
        if current.traveling_cost > costs[board.ravel_index(current.coord)] {
            continue;
        }

        let rc_current = Rc::new(current);
        let new_cost = rc_current.traveling_cost + 1; // Uniform cost for each step

        for (_, next) in board.neighbors(rc_current.coord, false) {
            let idx = board.ravel_index(next);
            if new_cost < costs[idx] {
                costs[idx] = new_cost;
                pq.push(Reverse(TrackedCell {
                    coord: next,
                    parent: Some(rc_current.clone()),
                    traveling_cost: new_cost,
                    heuristic_cost: heuristic(next),
                }));
            }
        }
    }

    None
}

pub struct Dijkstra<'a> {
    board: &'a Board,
    pub find: bool,
    /// Reached target, set once the search succeeds.
    pub target_node: Option<Rc<TrackedCell>>,
}

impl<'a> Dijkstra<'a> {
    pub fn new(board: &'a Board) -> Self {
        Dijkstra {
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

    pub fn solver(&mut self) {
        self.target_node = best_first(self.board, |_| 0);
        self.find = self.target_node.is_some();
    }
}

impl Agent for Dijkstra<'_> {
    fn name(&self) -> &'static str {
        "Dijkstra"
    }

    fn solve(&mut self) -> Result<Option<Vec<Coord>>, AgentError> {
        self.initialize()?;
        self.solver();
        Ok(self.target_node.as_ref().map(|node| node.path()))
    }
}
