//! Genetic search for the solver configuration that handles random mazes best.
//!
//! ```text
//! initialize_population
//!        │
//!        ▼
//! ┌─► fitness (fresh maze per trial → solver → score)
//! │      │
//! │      ▼
//! │   rank, keep top half
//! │      │
//! │      ▼
//! └── crossover + mutate until the population is full
//!        │  (after the last generation)
//!        ▼
//!     fitness once more, return the best genome
//! ```

mod evolution;
mod fitness;
mod genome;

pub use evolution::{Evolution, GenerationStats, fittest, next_generation, rank, survivor_count};
pub use fitness::{
    AgentFactory, Clock, FitnessReport, FixedClock, StandardAgents, TrialFailure, TrialOutcome, TrialSetup,
    WallClock, find_nearest_passage, record_path,
};
pub use genome::{
    ALPHA_BOUNDS, ALPHA_PRIOR, EPSILON_BOUNDS, EPSILON_PRIOR, Genome, MUTATION_STEP, SearchAlgorithm, crossover,
    mutate, round2,
};

use rand::rngs::StdRng;

use crate::error::OptimizerError;
use crate::generators::get_rng;
use crate::maze::Board;

/// Configuration for the optimizer. Defaults keep the search small.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerConfig {
    pub population_size: usize,
    pub generations: usize,
    /// Mazes generated per fitness evaluation.
    pub trials: usize,
    /// Training episodes given to the learning solver.
    pub episode_budget: usize,
    pub mutation_rate: f64,
    /// Fraction of dead ends opened up after carving each maze.
    pub break_chance: f64,
    /// RNG seed for reproducibility. `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            population_size: 10,
            generations: 3,
            trials: 1,
            episode_budget: 30,
            mutation_rate: 0.2,
            break_chance: 1.0,
            seed: None,
        }
    }
}

pub struct GeneticOptimizer<F = StandardAgents, C = WallClock> {
    /// Geometry, start and target shared by every generated maze.
    board: Board,
    config: OptimizerConfig,
    factory: F,
    clock: C,
    rng: StdRng,
}

impl GeneticOptimizer {
    /// Optimizer over the bundled solvers, timed with the wall clock.
    pub fn new(board: Board, config: OptimizerConfig) -> Self {
        let factory = StandardAgents {
            episode_budget: config.episode_budget,
        };
        GeneticOptimizer::with_parts(board, config, factory, WallClock)
    }
}

impl<F: AgentFactory, C: Clock> GeneticOptimizer<F, C> {
    pub fn with_parts(board: Board, config: OptimizerConfig, factory: F, clock: C) -> Self {
        let rng = get_rng(config.seed);
        GeneticOptimizer {
            board,
            config,
            factory,
            clock,
            rng,
        }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn initialize_population(&mut self, size: usize) -> Vec<Genome> {
        (0..size).map(|_| Genome::random(&mut self.rng)).collect()
    }

    /// Full per-trial breakdown of a genome's fitness.
    pub fn evaluate(&mut self, genome: &Genome, num_trials: usize) -> FitnessReport {
        let setup = TrialSetup {
            template: &self.board,
            factory: &self.factory,
            clock: &self.clock,
            break_chance: self.config.break_chance,
        };
        setup.evaluate(genome, num_trials, &mut self.rng)
    }

    /// Mean of `1 / (path_length + seconds + 1)` over the trials that found a path,
    /// or 0 if none did. Never fails: a broken configuration just scores 0.
    pub fn fitness(&mut self, genome: &Genome, num_trials: usize) -> f64 {
        self.evaluate(genome, num_trials).score
    }

    pub fn crossover(&mut self, p1: &Genome, p2: &Genome) -> Genome {
        genome::crossover(p1, p2, &mut self.rng)
    }

    pub fn mutate(&mut self, genome: &mut Genome, rate: f64) {
        genome::mutate(genome, rate, &mut self.rng)
    }

    fn score(&mut self, population: &[Genome]) -> Vec<(Genome, f64)> {
        let trials = self.config.trials;
        population
            .iter()
            .map(|genome| (*genome, self.fitness(genome, trials)))
            .collect()
    }

    /// Run the search with the configured population size and generation count.
    pub fn run(&mut self) -> Result<Evolution, OptimizerError> {
        self.evolve(self.config.population_size, self.config.generations)
    }

    /// Evolve a random population for `generations` generations and return the best
    /// genome of the final population. If every genome scores 0 the first one wins.
    pub fn evolve(&mut self, population_size: usize, generations: usize) -> Result<Evolution, OptimizerError> {
        if population_size == 0 {
            return Err(OptimizerError::EmptyPopulation);
        }

        let mut population = self.initialize_population(population_size);
        let mut history = Vec::with_capacity(generations + 1);

        for generation in 0..generations {
            let scored = self.score(&population);
            let fitness = scored.iter().map(|(_, f)| *f).collect::<Vec<_>>();
            let stats = GenerationStats::from_fitness(generation, &fitness);
            tracing::info!(
                "[optimizer] generation {}/{}: best {:.4}, mean {:.4}",
                generation + 1,
                generations,
                stats.best_fitness,
                stats.mean_fitness
            );
            history.push(stats);

            population = next_generation(&scored, population_size, self.config.mutation_rate, &mut self.rng)?;
        }

        let scored = self.score(&population);
        let fitness = scored.iter().map(|(_, f)| *f).collect::<Vec<_>>();
        history.push(GenerationStats::from_fitness(generations, &fitness));

        let (best, best_fitness) = fittest(&scored).ok_or(OptimizerError::EmptyPopulation)?;
        tracing::info!("[optimizer] best strategy: {} (fitness {:.4})", best, best_fitness);
        Ok(Evolution {
            best,
            best_fitness,
            history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(seed: u64) -> OptimizerConfig {
        OptimizerConfig {
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_initialize_population_size() {
        let board = Board::new(5, 5, (0, 0), (4, 4)).unwrap();
        let mut optimizer = GeneticOptimizer::new(board, config(1));
        assert_eq!(optimizer.initialize_population(7).len(), 7);
        assert!(optimizer.initialize_population(0).is_empty());
    }

    #[test]
    fn test_graph_search_fitness_is_bounded() {
        let board = Board::new(9, 9, (0, 0), (8, 8)).unwrap();
        let mut optimizer = GeneticOptimizer::new(board, config(2));
        for algorithm in [SearchAlgorithm::Bfs, SearchAlgorithm::Dijkstra, SearchAlgorithm::AStar] {
            let report = optimizer.evaluate(&Genome::GraphSearch(algorithm), 3);
            assert_eq!(report.successes(), 3, "{algorithm:?}");
            // At least 16 steps from corner to corner
            assert!(report.score > 0.0 && report.score <= 1.0 / 17.0);
        }
    }

    #[test]
    fn test_zero_trials_scores_zero() {
        let board = Board::new(5, 5, (0, 0), (4, 4)).unwrap();
        let mut optimizer = GeneticOptimizer::new(board, config(3));
        assert_eq!(optimizer.fitness(&Genome::GraphSearch(SearchAlgorithm::Bfs), 0), 0.0);
    }

    #[test]
    fn test_evolve_rejects_empty_population() {
        let board = Board::new(5, 5, (0, 0), (4, 4)).unwrap();
        let mut optimizer = GeneticOptimizer::new(board, config(4));
        assert_eq!(optimizer.evolve(0, 2), Err(OptimizerError::EmptyPopulation));
    }

    #[test]
    fn test_evolve_records_history() {
        let board = Board::new(7, 7, (0, 0), (6, 6)).unwrap();
        let mut optimizer = GeneticOptimizer::new(board, config(5));
        let evolution = optimizer.evolve(5, 2).unwrap();
        assert_eq!(evolution.history.len(), 3);
        assert!((0.0..=1.0).contains(&evolution.best_fitness));
        assert_eq!(evolution.history[2].best_fitness, evolution.best_fitness);
    }
}
