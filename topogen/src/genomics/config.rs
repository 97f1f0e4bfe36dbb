use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for genome generation
/// and inter-genome operations.
///
/// # Note
/// All quantities expressing probabilities
/// should be in the range [0.0, 1.0]. Using
/// values that are not in this bound may result
/// in odd behaviours and/or incorrect programs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneticConfig {
    /// Number of inputs in a genome.
    pub input_count: NonZeroUsize,
    /// Number of outputs in a genome.
    pub output_count: NonZeroUsize,
    /// Chance of a connection addition mutation taking place
    /// during a mutation pass.
    pub gene_addition_chance: f64,
    /// Maximum number of node-pair samples drawn before a
    /// connection addition mutation gives up. Exhaustion is
    /// a no-op, not an error.
    pub max_gene_addition_attempts: usize,
    /// Chance of a node addition mutation taking place
    /// during a mutation pass.
    pub node_addition_chance: f64,
    /// Chance that a gene's weight is nudged rather than
    /// reset during weight mutation.
    pub weight_nudge_chance: f64,
    /// Magnitude of the bound on the weight nudge
    /// uniform distribution.
    pub weight_nudge_power: f64,
    /// Magnitude of the bound on the weight reset
    /// uniform distribution.
    pub weight_reset_bound: f64,
    /// Chance that a node's bias is mutated at all
    /// during a bias mutation pass.
    pub bias_mutation_chance: f64,
    /// Chance that a mutated bias is reset instead of nudged.
    pub bias_reset_chance: f64,
    /// Magnitude of the bound on the bias nudge
    /// uniform distribution.
    pub bias_nudge_power: f64,
    /// Magnitude of the bound on the bias reset
    /// uniform distribution.
    pub bias_reset_bound: f64,
    /// Maximum magnitude of a node's bias. Mutated biases
    /// are clamped to this bound.
    pub bias_bound: f64,
    /// Weight of excess genes in genetic distance.
    pub excess_gene_factor: f64,
    /// Weight of disjoint genes in genetic distance.
    pub disjoint_gene_factor: f64,
    /// Weight of the common gene weight difference average
    /// in genetic distance.
    pub common_weight_factor: f64,
    /// Whether suppressed genes still contribute to the
    /// phenotype's forward pass. Historically they do, which
    /// makes gene suppression during node addition cosmetic;
    /// set to `false` to exclude them from generated networks.
    pub express_suppressed_genes: bool,
}

impl GeneticConfig {
    /// Returns a "zero-valued" configuration.
    /// All values are 0, `false`, or in the case of
    /// `NonZeroUsize`s, 1.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to fill in unused values during
    /// configuration instantiation.
    ///
    /// # Examples
    /// ```
    /// use topogen::genomics::GeneticConfig;
    ///
    /// let cfg = GeneticConfig {
    ///     gene_addition_chance: 1.0,
    ///     ..GeneticConfig::zero()
    /// };
    /// ```
    pub const fn zero() -> GeneticConfig {
        GeneticConfig {
            // SAFETY: 1 is a valid NonZeroUsize. Replace this with
            // NonZeroUsize::new(1).unwrap() once const Option::unwrap
            // becomes stable.
            input_count: unsafe { NonZeroUsize::new_unchecked(1) },
            output_count: unsafe { NonZeroUsize::new_unchecked(1) },
            gene_addition_chance: 0.0,
            max_gene_addition_attempts: 0,
            node_addition_chance: 0.0,
            weight_nudge_chance: 0.0,
            weight_nudge_power: 0.0,
            weight_reset_bound: 0.0,
            bias_mutation_chance: 0.0,
            bias_reset_chance: 0.0,
            bias_nudge_power: 0.0,
            bias_reset_bound: 0.0,
            bias_bound: 0.0,
            excess_gene_factor: 0.0,
            disjoint_gene_factor: 0.0,
            common_weight_factor: 0.0,
            express_suppressed_genes: true,
        }
    }
}

impl Default for GeneticConfig {
    /// Returns the standard operating configuration:
    /// 5% structural mutation chances, ±0.2 nudges, ±1.0 resets,
    /// biases clamped to ±5.0, and distance factors 1.0/1.0/0.4.
    fn default() -> GeneticConfig {
        GeneticConfig {
            gene_addition_chance: 0.05,
            max_gene_addition_attempts: 100,
            node_addition_chance: 0.05,
            weight_nudge_chance: 0.8,
            weight_nudge_power: 0.2,
            weight_reset_bound: 1.0,
            bias_mutation_chance: 0.2,
            bias_reset_chance: 0.2,
            bias_nudge_power: 0.2,
            bias_reset_bound: 1.0,
            bias_bound: 5.0,
            excess_gene_factor: 1.0,
            disjoint_gene_factor: 1.0,
            common_weight_factor: 0.4,
            ..GeneticConfig::zero()
        }
    }
}
