use rand::{SeedableRng, rngs::StdRng};

mod prim;

pub use prim::MazeGenerator;

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}
