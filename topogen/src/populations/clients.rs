use crate::genomics::{GeneticConfig, Genome, History};
use crate::networks::FeedForwardNetwork;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A client is one individual of the population: a genome
/// mapped to a score, so the genome can be evolved against
/// an external fitness signal.
///
/// The client lazily builds and caches its phenotype; the
/// cache is invalidated whenever the genome is replaced or
/// mutated. A client whose genome has been detached is dead,
/// and is regrown from a survivor during the next generation
/// step.
#[derive(Debug, Serialize, Deserialize)]
pub struct Client {
    id: usize,
    genome: Option<Genome>,
    #[serde(skip)]
    network: Option<FeedForwardNetwork>,
    score: f64,
    species: Option<usize>,
}

impl Client {
    /// Creates a new client with the given genome.
    pub fn new(id: usize, genome: Genome) -> Client {
        Client {
            id,
            genome: Some(genome),
            network: None,
            score: 0.0,
            species: None,
        }
    }

    /// Returns the client's id.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the client's genome, if attached.
    pub fn genome(&self) -> Option<&Genome> {
        self.genome.as_ref()
    }

    /// Attaches a new genome, invalidating the cached phenotype.
    pub fn set_genome(&mut self, genome: Genome) {
        self.genome = Some(genome);
        self.network = None;
    }

    /// Detaches the client's genome, marking it dead, and
    /// invalidates the cached phenotype.
    pub fn detach_genome(&mut self) {
        self.genome = None;
        self.network = None;
    }

    /// Returns the client's phenotype, building it from the
    /// current genome if it is not already cached.
    ///
    /// # Panics
    /// Panics if the client's genome is detached.
    pub fn network(&mut self, history: &History, config: &GeneticConfig) -> &mut FeedForwardNetwork {
        if self.network.is_none() {
            let genome = self
                .genome
                .as_ref()
                .unwrap_or_else(|| panic!("client {} has no genome to instantiate", self.id));
            self.network = Some(FeedForwardNetwork::new(genome, history, config));
        }
        self.network.as_mut().unwrap()
    }

    /// Returns the client's score.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Sets the client's score. Higher is better; no other
    /// assumption is made about the scale.
    pub fn set_score(&mut self, score: f64) {
        self.score = score;
    }

    /// Returns the id of the species the client belongs to,
    /// if any.
    pub fn species(&self) -> Option<usize> {
        self.species
    }

    /// Sets or clears the client's species membership.
    pub fn set_species(&mut self, species: Option<usize>) {
        self.species = species;
    }

    /// Mutates the client's genome in place, invalidating the
    /// cached phenotype.
    ///
    /// # Panics
    /// Panics if the client's genome is detached.
    pub fn mutate<R: Rng>(&mut self, history: &mut History, config: &GeneticConfig, rng: &mut R) {
        self.genome
            .as_mut()
            .unwrap_or_else(|| panic!("client {} has no genome to mutate", self.id))
            .mutate(history, config, rng);
        self.network = None;
    }
}
