use rand::{Rng, rngs::StdRng};

use super::{Agent, AgentError, check_endpoints};
use crate::maze::{Board, Coord, Direction};

const GAMMA: f64 = 0.9;
const STEP_REWARD: f64 = -1.0;
const GOAL_REWARD: f64 = 100.0;
const BLOCKED_REWARD: f64 = -5.0;

/// Tabular Q-learning over (cell, direction) pairs.
pub struct QLearning<'a> {
    board: &'a Board,
    alpha: f64,
    epsilon: f64,
    episodes: usize,
    q_table: Vec<[f64; 4]>,
    rng: StdRng,
    pub find: bool,
}

impl<'a> QLearning<'a> {
    /// `alpha` is the learning rate and `epsilon` the exploration rate, both clamped
    /// to [0, 1]. `episodes` is the budget used when run through [`Agent::solve`].
    pub fn new(board: &'a Board, alpha: f64, epsilon: f64, episodes: usize, rng: StdRng) -> Self {
        QLearning {
            board,
            alpha: alpha.clamp(0.0, 1.0),
            epsilon: epsilon.clamp(0.0, 1.0),
            episodes,
            q_table: vec![[0.0; 4]; board.len()],
            rng,
            find: false,
        }
    }

    /// Train for `episodes` episodes, then follow the greedy policy from the start.
    pub fn solver(&mut self, episodes: usize) -> Result<Option<Vec<Coord>>, AgentError> {
        check_endpoints(self.board)?;
        self.find = false;

        let max_steps = self.board.len() * 4;
        for _ in 0..episodes {
            self.run_episode(max_steps);
        }

        let path = self.greedy_path();
        self.find = path.is_some();
        Ok(path)
    }

    fn run_episode(&mut self, max_steps: usize) {
        let target = self.board.target();
        let mut state = self.board.start();
        for _ in 0..max_steps {
            if state == target {
                break;
            }
            let action = if self.rng.random_bool(self.epsilon) {
                self.rng.random_range(0..4)
            } else {
                self.best_action(state)
            };

            let moved = Direction::ALL[action]
                .step(state, 1)
                .filter(|&c| self.board.is_passage(c));
            let (next, reward) = match moved {
                None => (state, BLOCKED_REWARD),
                Some(c) if c == target => (c, GOAL_REWARD),
                Some(c) => (c, STEP_REWARD),
            };

            let future = if next == target {
                0.0
            } else {
                self.max_q(next)
            };
            let idx = self.board.ravel_index(state);
            let current = self.q_table[idx][action];
            self.q_table[idx][action] = current + self.alpha * (reward + GAMMA * future - current);
            state = next;
        }
    }

    fn max_q(&self, state: Coord) -> f64 {
        self.q_table[self.board.ravel_index(state)]
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Highest-valued action, ties broken at random.
    fn best_action(&mut self, state: Coord) -> usize {
        let values = self.q_table[self.board.ravel_index(state)];
        let best = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let ties = (0..4).filter(|&a| values[a] == best).collect::<Vec<_>>();
        ties[self.rng.random_range(0..ties.len())]
    }

    /// Follow the highest-valued open move, never revisiting a cell.
    fn greedy_path(&self) -> Option<Vec<Coord>> {
        let target = self.board.target();
        let mut visited = vec![false; self.board.len()];
        let mut state = self.board.start();
        let mut path = vec![state];
        visited[self.board.ravel_index(state)] = true;

        while state != target {
            let values = self.q_table[self.board.ravel_index(state)];
            let next = Direction::ALL
                .into_iter()
                .zip(values)
                .filter_map(|(d, v)| d.step(state, 1).map(|c| (c, v)))
                .filter(|&(c, _)| self.board.is_passage(c))
                .max_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(c, _)| c)?;

            let idx = self.board.ravel_index(next);
            if visited[idx] {
                return None;
            }
            visited[idx] = true;
            path.push(next);
            state = next;
        }
        Some(path)
    }
}

impl Agent for QLearning<'_> {
    fn name(&self) -> &'static str {
        "Q-Learning"
    }

    fn solve(&mut self) -> Result<Option<Vec<Coord>>, AgentError> {
        self.solver(self.episodes)
    }
}
