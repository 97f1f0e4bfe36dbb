//! An implementation of NeuroEvolution of Augmenting Topologies,
//! following the 2002 paper: <http://nn.cs.utexas.edu/keyword?stanley:ec02>
//!
//! Genomes are progressively complexified by structural and parametric
//! mutation, aligned across lineages through a shared innovation history,
//! and sheltered from premature competition by speciation. Fitness is
//! supplied externally: the engine only assumes that higher scores are
//! better.
//!
//! # Example usage: Evolution of an XOR function approximator
//! ```
//! use topogen::genomics::GeneticConfig;
//! use topogen::populations::{Population, PopulationConfig};
//! use std::num::NonZeroUsize;
//!
//! fn main() {
//!     let genetic_config = GeneticConfig {
//!         input_count: NonZeroUsize::new(2).unwrap(),
//!         output_count: NonZeroUsize::new(1).unwrap(),
//!         ..GeneticConfig::default()
//!     };
//!
//!     let population_config = PopulationConfig {
//!         size: NonZeroUsize::new(100).unwrap(),
//!         ..PopulationConfig::default()
//!     };
//!
//!     let values = [
//!         ([0.0, 0.0], 0.0),
//!         ([0.0, 1.0], 1.0),
//!         ([1.0, 0.0], 1.0),
//!         ([1.0, 1.0], 0.0),
//!     ];
//!
//!     let mut population = Population::new(population_config, genetic_config);
//!     for _ in 0..10 {
//!         population.evaluate_fitness(|network| {
//!             let mut score = 4.0;
//!             for (inputs, expected) in &values {
//!                 let output = network.predict(inputs)[0];
//!                 score -= (output - expected) * (output - expected);
//!             }
//!             score
//!         });
//!         if let Err(e) = population.evolve() {
//!             eprintln!("{}", e);
//!             break;
//!         }
//!     }
//! }
//! ```

pub mod genomics;
pub mod networks;
pub mod populations;

/// Identifier type used to designate historically
/// identical mutations for the purposes of
/// genome comparison and genetic tracking.
///
/// Node ids and connection ids are drawn from
/// two independent sequences of `Innovation`s.
pub type Innovation = usize;
