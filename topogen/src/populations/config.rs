use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for population generation
/// and evolution.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Number of clients in the population.
    pub size: NonZeroUsize,
    /// Compatibility distance below which a client belongs
    /// to a species.
    pub distance_threshold: f64,
    /// Fraction of the population, ranked by score, whose
    /// genomes are detached and regrown from survivors each
    /// generation.
    pub cull_fraction: f64,
    /// Number of generations a species is protected from
    /// culling after its founding.
    pub grace_period: usize,
    /// Seed for the run's shared random source. Every draw in
    /// a generation step happens in a fixed sequence, so equal
    /// seeds reproduce equal runs.
    pub rng_seed: u64,
}

impl PopulationConfig {
    /// Returns a "zero-valued" configuration.
    /// All values are 0, or in the case of
    /// `NonZeroUsize`s, 1.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to fill in unused values during
    /// configuration instantiation.
    pub const fn zero() -> PopulationConfig {
        PopulationConfig {
            // SAFETY: 1 is a valid NonZeroUsize. Replace this with
            // NonZeroUsize::new(1).unwrap() once const Option::unwrap
            // becomes stable.
            size: unsafe { NonZeroUsize::new_unchecked(1) },
            distance_threshold: 0.0,
            cull_fraction: 0.0,
            grace_period: 0,
            rng_seed: 0,
        }
    }
}

impl Default for PopulationConfig {
    /// Returns the standard operating configuration:
    /// distance threshold 2.0, 90% culling, a 10-generation
    /// grace period and a fixed seed.
    fn default() -> PopulationConfig {
        PopulationConfig {
            distance_threshold: 2.0,
            cull_fraction: 0.9,
            grace_period: 10,
            rng_seed: 1111,
            ..PopulationConfig::zero()
        }
    }
}
