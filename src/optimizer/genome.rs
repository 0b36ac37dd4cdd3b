//! Genome representation and the genetic operators that act on it.

use std::fmt;

use rand::Rng;

use crate::solvers::Solver;

/// Prior range for a fresh learning rate.
pub const ALPHA_PRIOR: (f64, f64) = (0.3, 0.9);
/// Prior range for a fresh exploration rate.
pub const EPSILON_PRIOR: (f64, f64) = (0.1, 0.5);
/// Mutation keeps the learning rate inside this range.
pub const ALPHA_BOUNDS: (f64, f64) = (0.1, 1.0);
/// Mutation keeps the exploration rate inside this range.
pub const EPSILON_BOUNDS: (f64, f64) = (0.0, 1.0);
/// Largest step a single mutation takes.
pub const MUTATION_STEP: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchAlgorithm {
    Dijkstra,
    Bfs,
    AStar,
}

/// A candidate configuration: which solver to run and, for the learning solver,
/// its hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Genome {
    GraphSearch(SearchAlgorithm),
    Learning { alpha: f64, epsilon: f64 },
}

impl Genome {
    /// Sample uniformly over the four solvers. Learning genomes draw their
    /// hyperparameters from the narrower prior ranges.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        match Solver::ALL[rng.random_range(0..Solver::ALL.len())] {
            Solver::Dijkstra => Genome::GraphSearch(SearchAlgorithm::Dijkstra),
            Solver::Bfs => Genome::GraphSearch(SearchAlgorithm::Bfs),
            Solver::AStar => Genome::GraphSearch(SearchAlgorithm::AStar),
            Solver::QLearning => Genome::Learning {
                alpha: round2(rng.random_range(ALPHA_PRIOR.0..=ALPHA_PRIOR.1)),
                epsilon: round2(rng.random_range(EPSILON_PRIOR.0..=EPSILON_PRIOR.1)),
            },
        }
    }

    pub fn solver(&self) -> Solver {
        match self {
            Genome::GraphSearch(SearchAlgorithm::Dijkstra) => Solver::Dijkstra,
            Genome::GraphSearch(SearchAlgorithm::Bfs) => Solver::Bfs,
            Genome::GraphSearch(SearchAlgorithm::AStar) => Solver::AStar,
            Genome::Learning { .. } => Solver::QLearning,
        }
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Genome::GraphSearch(_) => write!(f, "{}", self.solver()),
            Genome::Learning { alpha, epsilon } => {
                write!(f, "{} (alpha={alpha:.2}, epsilon={epsilon:.2})", self.solver())
            }
        }
    }
}

/// Round to 2 decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Combine two parents into a child.
///
/// Solver identity cannot be blended, so unless both parents are learning genomes
/// the child is a copy of one parent picked at random. Two learning parents give a
/// child with the mean of their hyperparameters.
pub fn crossover<R: Rng>(p1: &Genome, p2: &Genome, rng: &mut R) -> Genome {
    match (p1, p2) {
        (
            Genome::Learning {
                alpha: a1,
                epsilon: e1,
            },
            Genome::Learning {
                alpha: a2,
                epsilon: e2,
            },
        ) => Genome::Learning {
            alpha: round2((a1 + a2) / 2.0),
            epsilon: round2((e1 + e2) / 2.0),
        },
        _ => {
            if rng.random_bool(0.5) {
                *p1
            } else {
                *p2
            }
        }
    }
}

/// Perturb a learning genome's hyperparameters, each independently with probability
/// `rate`. Graph-search genomes have nothing to mutate.
pub fn mutate<R: Rng>(genome: &mut Genome, rate: f64, rng: &mut R) {
    let rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
    if let Genome::Learning { alpha, epsilon } = genome {
        if rng.random_bool(rate) {
            *alpha = perturb(*alpha, ALPHA_BOUNDS, rng);
        }
        if rng.random_bool(rate) {
            *epsilon = perturb(*epsilon, EPSILON_BOUNDS, rng);
        }
    }
}

fn perturb<R: Rng>(value: f64, bounds: (f64, f64), rng: &mut R) -> f64 {
    let shifted = value + rng.random_range(-MUTATION_STEP..=MUTATION_STEP);
    round2(shifted.clamp(bounds.0, bounds.1))
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_random_genomes_respect_prior() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            let genome = Genome::random(&mut rng);
            seen.insert(genome.solver());
            if let Genome::Learning { alpha, epsilon } = genome {
                assert!((ALPHA_PRIOR.0..=ALPHA_PRIOR.1).contains(&alpha));
                assert!((EPSILON_PRIOR.0..=EPSILON_PRIOR.1).contains(&epsilon));
                assert_eq!(alpha, round2(alpha));
                assert_eq!(epsilon, round2(epsilon));
            }
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_crossover_copies_a_parent() {
        let mut rng = StdRng::seed_from_u64(1);
        let bfs = Genome::GraphSearch(SearchAlgorithm::Bfs);
        let learner = Genome::Learning {
            alpha: 0.5,
            epsilon: 0.2,
        };
        let child = crossover(&bfs, &learner, &mut rng);
        assert!(child == bfs || child == learner);
    }

    #[test]
    fn test_crossover_blends_learners() {
        let mut rng = StdRng::seed_from_u64(1);
        let child = crossover(
            &Genome::Learning {
                alpha: 0.3,
                epsilon: 0.1,
            },
            &Genome::Learning {
                alpha: 0.8,
                epsilon: 0.4,
            },
            &mut rng,
        );
        match child {
            Genome::Learning { alpha, epsilon } => {
                assert!((alpha - 0.55).abs() < 1e-9);
                assert!((epsilon - 0.25).abs() < 1e-9);
            }
            other => panic!("expected a learning genome, got {other:?}"),
        }
    }

    #[test]
    fn test_mutation_at_the_bounds() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut genome = Genome::Learning {
            alpha: ALPHA_BOUNDS.0,
            epsilon: EPSILON_BOUNDS.1,
        };
        mutate(&mut genome, 1.0, &mut rng);
        let Genome::Learning { alpha, epsilon } = genome else {
            panic!("mutation changed the solver");
        };
        assert!((ALPHA_BOUNDS.0..=ALPHA_BOUNDS.0 + MUTATION_STEP + 1e-9).contains(&alpha), "alpha {alpha}");
        assert!((EPSILON_BOUNDS.1 - MUTATION_STEP - 1e-9..=EPSILON_BOUNDS.1).contains(&epsilon), "epsilon {epsilon}");
    }

    #[test]
    fn test_mutation_leaves_graph_search_alone() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut genome = Genome::GraphSearch(SearchAlgorithm::Dijkstra);
        mutate(&mut genome, 1.0, &mut rng);
        assert_eq!(genome, Genome::GraphSearch(SearchAlgorithm::Dijkstra));
    }

    #[test]
    fn test_zero_rate_never_mutates() {
        let mut rng = StdRng::seed_from_u64(9);
        let original = Genome::Learning {
            alpha: 0.5,
            epsilon: 0.5,
        };
        let mut genome = original;
        for _ in 0..100 {
            mutate(&mut genome, 0.0, &mut rng);
        }
        assert_eq!(genome, original);
    }
}
