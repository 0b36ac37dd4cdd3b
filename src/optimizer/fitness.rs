//! Fitness evaluation: generate fresh mazes, run the genome's solver on them and
//! score how quickly and directly it reached the target.

use std::collections::VecDeque;
use std::time::Instant;

use rand::{Rng, SeedableRng, rngs::StdRng};

use super::genome::{Genome, SearchAlgorithm};
use crate::error::MazeError;
use crate::generators::MazeGenerator;
use crate::maze::{Board, Coord};
use crate::solvers::{AStar, Agent, AgentError, Bfs, Dijkstra, QLearning};

/// Measures how long a run takes, in seconds.
pub trait Clock {
    fn measure<T>(&self, run: impl FnOnce() -> T) -> (T, f64);
}

/// Wall-clock timing with [`Instant`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClock;

impl Clock for WallClock {
    fn measure<T>(&self, run: impl FnOnce() -> T) -> (T, f64) {
        let start = Instant::now();
        let output = run();
        (output, start.elapsed().as_secs_f64())
    }
}

/// Reports the same duration for every run.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedClock(pub f64);

impl Clock for FixedClock {
    fn measure<T>(&self, run: impl FnOnce() -> T) -> (T, f64) {
        (run(), self.0)
    }
}

/// Builds the solver a genome describes, bound to one board.
pub trait AgentFactory {
    fn build<'a>(&self, genome: &Genome, board: &'a Board, rng: &mut StdRng) -> Box<dyn Agent + 'a>;
}

/// The four bundled solvers.
#[derive(Debug, Clone, Copy)]
pub struct StandardAgents {
    /// Training episodes given to the learning solver.
    pub episode_budget: usize,
}

impl Default for StandardAgents {
    fn default() -> Self {
        Self { episode_budget: 30 }
    }
}

impl AgentFactory for StandardAgents {
    fn build<'a>(&self, genome: &Genome, board: &'a Board, rng: &mut StdRng) -> Box<dyn Agent + 'a> {
        match *genome {
            Genome::GraphSearch(SearchAlgorithm::Dijkstra) => Box::new(Dijkstra::new(board)),
            Genome::GraphSearch(SearchAlgorithm::Bfs) => Box::new(Bfs::new(board)),
            Genome::GraphSearch(SearchAlgorithm::AStar) => Box::new(AStar::new(board)),
            Genome::Learning { alpha, epsilon } => Box::new(QLearning::new(
                board,
                alpha,
                epsilon,
                self.episode_budget,
                StdRng::seed_from_u64(rng.random()),
            )),
        }
    }
}

/// Why a trial contributed nothing to the score.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrialFailure {
    #[error("solver found no path")]
    NotFound,
    #[error(transparent)]
    Agent(#[from] AgentError),
    #[error(transparent)]
    Maze(#[from] MazeError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrialOutcome {
    Success { path_length: usize, duration: f64 },
    Failure(TrialFailure),
}

impl TrialOutcome {
    /// `1 / (path_length + duration + 1)` for a success, `None` for a failure.
    pub fn score(&self) -> Option<f64> {
        match self {
            TrialOutcome::Success {
                path_length,
                duration,
            } => Some(1.0 / (*path_length as f64 + duration.max(0.0) + 1.0)),
            TrialOutcome::Failure(_) => None,
        }
    }
}

/// Score of one genome plus what happened in each trial.
#[derive(Debug, Clone, PartialEq)]
pub struct FitnessReport {
    /// Mean score over successful trials, 0 if none succeeded.
    pub score: f64,
    pub outcomes: Vec<TrialOutcome>,
}

impl FitnessReport {
    pub fn from_outcomes(outcomes: Vec<TrialOutcome>) -> Self {
        let scores = outcomes.iter().filter_map(TrialOutcome::score).collect::<Vec<_>>();
        let score = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };
        FitnessReport { score, outcomes }
    }

    pub fn successes(&self) -> usize {
        self.outcomes.iter().filter(|o| o.score().is_some()).count()
    }
}

/// Closest non-wall cell to `pos` by breadth-first search over the whole grid,
/// walls included. Returns `pos` itself when the board has no passage.
pub fn find_nearest_passage(board: &Board, pos: Coord) -> Coord {
    if !board.is_in_bounds(pos) {
        return pos;
    }
    let mut visited = vec![false; board.len()];
    let mut queue = VecDeque::from([pos]);
    visited[board.ravel_index(pos)] = true;

    while let Some(cell) = queue.pop_front() {
        if board.is_passage(cell) {
            return cell;
        }
        for (_, next) in board.neighbors(cell, true) {
            let idx = board.ravel_index(next);
            if !visited[idx] {
                visited[idx] = true;
                queue.push_back(next);
            }
        }
    }
    pos
}

/// Store `found` as the board's solution unless one is already recorded, and return
/// the recorded path's length in steps.
pub fn record_path(board: &mut Board, found: Vec<Coord>) -> usize {
    if board.path().is_none() {
        board.set_path(found);
    }
    board.path().map_or(0, |path| path.len().saturating_sub(1))
}

/// Everything a trial needs besides the genome.
pub struct TrialSetup<'a, F, C> {
    pub template: &'a Board,
    pub factory: &'a F,
    pub clock: &'a C,
    /// Fraction of dead ends opened up after carving.
    pub break_chance: f64,
}

impl<F: AgentFactory, C: Clock> TrialSetup<'_, F, C> {
    /// Generate a fresh maze from the template and run the genome's solver on it.
    pub fn run_trial(&self, genome: &Genome, rng: &mut StdRng) -> TrialOutcome {
        match self.try_trial(genome, rng) {
            Ok(outcome) => outcome,
            Err(failure) => TrialOutcome::Failure(failure),
        }
    }

    fn try_trial(&self, genome: &Genome, rng: &mut StdRng) -> Result<TrialOutcome, TrialFailure> {
        let mut board = self.template.blank_copy();
        MazeGenerator::new(&mut *rng).run(&mut board, self.break_chance)?;

        // Start and target may sit off the carved lattice
        if board.is_wall(board.start()) {
            let start = find_nearest_passage(&board, board.start());
            board.set_start(start)?;
        }
        if board.is_wall(board.target()) {
            let target = find_nearest_passage(&board, board.target());
            board.set_target(target)?;
        }

        let mut agent = self.factory.build(genome, &board, rng);
        let (result, duration) = self.clock.measure(|| agent.solve());
        let found = result?.ok_or(TrialFailure::NotFound)?;
        drop(agent);

        Ok(TrialOutcome::Success {
            path_length: record_path(&mut board, found),
            duration,
        })
    }

    /// Run `num_trials` independent trials and average the successful ones.
    pub fn evaluate(&self, genome: &Genome, num_trials: usize, rng: &mut StdRng) -> FitnessReport {
        let outcomes = (0..num_trials)
            .map(|_| self.run_trial(genome, rng))
            .collect::<Vec<_>>();
        for outcome in &outcomes {
            if let TrialOutcome::Failure(reason) = outcome {
                tracing::debug!("[fitness] {} trial failed: {}", genome, reason);
            }
        }
        let report = FitnessReport::from_outcomes(outcomes);
        tracing::debug!(
            "[fitness] {} scored {:.4} ({}/{} trials solved)",
            genome,
            report.score,
            report.successes(),
            num_trials
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_passage_two_steps_away() {
        let board = Board::from_ascii(
            &[
                "#####", //
                "#####", //
                "#####", //
                "#####", //
                "#.###",
            ],
            (2, 1),
            (4, 1),
        )
        .unwrap();
        assert_eq!(find_nearest_passage(&board, (2, 1)), (4, 1));
    }

    #[test]
    fn test_nearest_passage_on_passage_is_identity() {
        let board = Board::from_ascii(&["#.", ".."], (1, 1), (1, 1)).unwrap();
        assert_eq!(find_nearest_passage(&board, (1, 1)), (1, 1));
    }

    #[test]
    fn test_nearest_passage_falls_back_to_input() {
        let board = Board::new(3, 3, (1, 1), (2, 2)).unwrap();
        assert_eq!(find_nearest_passage(&board, (1, 1)), (1, 1));
    }

    #[test]
    fn test_record_path_prefers_board_path() {
        let mut board = Board::from_ascii(&["...", "...", "..."], (0, 0), (2, 2)).unwrap();
        let detour = vec![(0, 0), (0, 1), (0, 2), (1, 2), (1, 1), (2, 1), (2, 2)];
        assert_eq!(record_path(&mut board, detour.clone()), 6);
        assert_eq!(board.path(), Some(detour.as_slice()));

        let direct = vec![(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)];
        assert_eq!(record_path(&mut board, direct), 6);
        assert_eq!(board.path(), Some(detour.as_slice()));
    }

    #[test]
    fn test_report_averages_successes_only() {
        let report = FitnessReport::from_outcomes(vec![
            TrialOutcome::Success {
                path_length: 3,
                duration: 0.0,
            },
            TrialOutcome::Failure(TrialFailure::NotFound),
            TrialOutcome::Success {
                path_length: 1,
                duration: 0.0,
            },
        ]);
        assert!((report.score - (0.25 + 0.5) / 2.0).abs() < 1e-12);
        assert_eq!(report.successes(), 2);

        let failed = FitnessReport::from_outcomes(vec![TrialOutcome::Failure(TrialFailure::NotFound)]);
        assert_eq!(failed.score, 0.0);
        assert_eq!(FitnessReport::from_outcomes(Vec::new()).score, 0.0);
    }

    #[test]
    fn test_trial_snaps_target_onto_maze() {
        // An even-sized grid leaves the far corner off the carved lattice
        let template = Board::new(6, 6, (0, 0), (5, 5)).unwrap();
        let setup = TrialSetup {
            template: &template,
            factory: &StandardAgents::default(),
            clock: &FixedClock(0.0),
            break_chance: 0.0,
        };
        let mut rng = StdRng::seed_from_u64(5);
        let outcome = setup.run_trial(&Genome::GraphSearch(SearchAlgorithm::Bfs), &mut rng);
        assert!(matches!(outcome, TrialOutcome::Success { duration, .. } if duration == 0.0));
        let score = outcome.score().unwrap();
        assert!(score > 0.0 && score <= 1.0);
    }
}
