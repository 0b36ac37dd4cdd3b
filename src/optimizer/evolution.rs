//! The generational step: rank, truncate, recombine, mutate.

use rand::{Rng, seq::IndexedRandom};

use super::genome::{Genome, crossover, mutate};
use crate::error::OptimizerError;

/// Statistics for a single generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    /// Generation number. The final evaluation comes after the last bred generation.
    pub generation: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub worst_fitness: f64,
}

impl GenerationStats {
    pub fn from_fitness(generation: usize, fitness: &[f64]) -> Self {
        if fitness.is_empty() {
            return Self {
                generation,
                best_fitness: 0.0,
                mean_fitness: 0.0,
                worst_fitness: 0.0,
            };
        }
        Self {
            generation,
            best_fitness: fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            mean_fitness: fitness.iter().sum::<f64>() / fitness.len() as f64,
            worst_fitness: fitness.iter().copied().fold(f64::INFINITY, f64::min),
        }
    }
}

/// Result of an evolution run.
#[derive(Debug, Clone, PartialEq)]
pub struct Evolution {
    /// Highest-scoring genome of the final population.
    pub best: Genome,
    pub best_fitness: f64,
    pub history: Vec<GenerationStats>,
}

/// How many of a `population_size` population survive selection: the top half
/// rounded up, but never fewer than 2 so there is always a pair to breed from.
pub fn survivor_count(population_size: usize) -> usize {
    population_size.div_ceil(2).max(2).min(population_size)
}

/// Sort by fitness, best first. The sort is stable so earlier individuals win ties.
pub fn rank(scored: &[(Genome, f64)]) -> Vec<(Genome, f64)> {
    let mut ranked = scored.to_vec();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

/// First individual with the highest fitness.
pub fn fittest(scored: &[(Genome, f64)]) -> Option<(Genome, f64)> {
    scored.iter().copied().fold(None, |best, candidate| match best {
        Some((_, fit)) if candidate.1 <= fit => best,
        _ => Some(candidate),
    })
}

/// Build the next population from a scored one.
///
/// The survivors are kept in rank order and the rest of the `target_size` slots are
/// filled with mutated children of two distinct survivors picked at random.
pub fn next_generation<R: Rng>(
    scored: &[(Genome, f64)],
    target_size: usize,
    mutation_rate: f64,
    rng: &mut R,
) -> Result<Vec<Genome>, OptimizerError> {
    let mut population = rank(scored)
        .into_iter()
        .take(survivor_count(target_size))
        .map(|(genome, _)| genome)
        .collect::<Vec<_>>();

    let survivors = population.len();
    let offspring_needed = target_size.saturating_sub(survivors);
    if offspring_needed > 0 && survivors < 2 {
        return Err(OptimizerError::PopulationExhausted { survivors });
    }

    let mut children = Vec::with_capacity(offspring_needed);
    while children.len() < offspring_needed {
        let parents = population[..survivors].choose_multiple(rng, 2).collect::<Vec<_>>();
        let mut child = crossover(parents[0], parents[1], rng);
        mutate(&mut child, mutation_rate, rng);
        children.push(child);
    }
    population.extend(children);
    Ok(population)
}
