//! Genomes are the focus of evolution in NEAT.
//! They are a collection of node genes and connection genes that can be
//! instantiated as a phenotype (a neural network). Genomes can be
//! progressively mutated, thus adding complexity and functionality.
//!
//! All structural identity is issued by a [`History`], which guarantees
//! that identical mutations in different genomes receive identical
//! innovation numbers at any point in the run, keeping independently
//! evolved genomes comparable.

mod config;
mod errors;
mod genes;
mod genome;
mod history;
mod mutation;
mod nodes;

pub use config::GeneticConfig;
pub use errors::{GeneValidityError, NodeValidityError};
pub use genes::Gene;
pub use genome::Genome;
pub use history::History;
pub use nodes::Node;
