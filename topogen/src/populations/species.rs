use crate::genomics::{GeneticConfig, Genome, History};
use crate::populations::{Client, PopulationConfig, SpeciesError};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A species is a group of clients with pairwise similar
/// genomes, as determined by compatibility distance to a
/// _base_ member.
///
/// Species shelter structural innovation: clients compete for
/// survival within the whole population, but membership is
/// recomputed every generation so that novel structure is
/// grouped with its kin. A freshly founded species is
/// protected from [`kill`] for a grace period of generations.
///
/// Species refer to clients by their index in the
/// population's client list.
///
/// [`kill`]: Species::kill
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Species {
    id: usize,
    base: usize,
    members: Vec<usize>,
    score: f64,
    generations: usize,
    extinct: bool,
}

impl Species {
    /// Creates a new species around a base client, which
    /// becomes its first member.
    pub fn new(id: usize, base: usize, clients: &mut [Client]) -> Species {
        clients[base].set_species(Some(id));
        Species {
            id,
            base,
            members: vec![base],
            score: 0.0,
            generations: 0,
            extinct: false,
        }
    }

    /// Returns the species' id.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the index of the species' base client.
    pub fn base(&self) -> usize {
        self.base
    }

    /// Returns the indices of the species' current members.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Returns the species' average score, as of the last
    /// [`evaluate`].
    ///
    /// [`evaluate`]: Species::evaluate
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Returns the species' age in generations.
    pub fn generations(&self) -> usize {
        self.generations
    }

    /// Whether the species is extinct. Extinction is terminal.
    pub fn extinct(&self) -> bool {
        self.extinct
    }

    /// Returns a uniformly random member, or `None` if the
    /// species has no members.
    pub fn random_member<R: Rng>(&self, rng: &mut R) -> Option<usize> {
        if self.members.is_empty() {
            return None;
        }
        Some(self.members[rng.gen_range(0..self.members.len())])
    }

    /// Whether the client's genome is compatible with the
    /// species' base, i.e. their compatibility distance is
    /// below the configured threshold.
    ///
    /// A client or base without an attached genome matches
    /// nothing.
    pub fn matches(
        &self,
        client: usize,
        clients: &[Client],
        genetic_config: &GeneticConfig,
        population_config: &PopulationConfig,
    ) -> bool {
        match (clients[self.base].genome(), clients[client].genome()) {
            (Some(base), Some(genome)) => {
                Genome::genetic_distance(base, genome, genetic_config)
                    < population_config.distance_threshold
            }
            _ => false,
        }
    }

    /// Adds the client to the species if it matches the base,
    /// or unconditionally if `force` is set. Returns whether
    /// the client was added.
    ///
    /// # Errors
    /// Fails on an extinct species, which can never regain
    /// members.
    pub fn add(
        &mut self,
        client: usize,
        force: bool,
        clients: &mut [Client],
        genetic_config: &GeneticConfig,
        population_config: &PopulationConfig,
    ) -> Result<bool, SpeciesError> {
        if self.extinct {
            return Err(SpeciesError::ExtinctSpecies(self.id));
        }

        if force || self.matches(client, clients, genetic_config, population_config) {
            clients[client].set_species(Some(self.id));
            self.members.push(client);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Recomputes the species' average score over its current
    /// members and advances its age by one generation.
    ///
    /// The average is floored at 0.0001 so later divisions by
    /// species score stay well-defined.
    pub fn evaluate(&mut self, clients: &[Client]) {
        let mut score = 0.0;
        for &member in &self.members {
            score += clients[member].score();
        }
        if !self.members.is_empty() {
            score /= self.members.len() as f64;
        }

        self.score = score.max(0.0001);
        self.generations += 1;
    }

    /// Prepares the species for a re-speciation pass: zeroes
    /// the score, promotes a random current member to be the
    /// new base, detaches every member, and force-adds the
    /// (possibly unchanged) base back in, so that stale
    /// membership never leaks across generations.
    pub fn reset<R: Rng>(&mut self, clients: &mut [Client], rng: &mut R) {
        self.score = 0.0;
        if let Some(new_base) = self.random_member(rng) {
            self.base = new_base;
        }

        for &member in &self.members {
            clients[member].set_species(None);
        }
        self.members.clear();

        // Force the base client back into the species.
        clients[self.base].set_species(Some(self.id));
        self.members.push(self.base);
    }

    /// Removes the worst-scoring `percentage` fraction of the
    /// species' members, detaching their species reference.
    ///
    /// Young species are left untouched for a configured grace
    /// period, protecting fresh structural innovation from
    /// immediate culling. If the base itself is removed, a new
    /// random base is chosen from the remainder; if no members
    /// remain, the species goes extinct.
    pub fn kill<R: Rng>(
        &mut self,
        percentage: f64,
        clients: &mut [Client],
        config: &PopulationConfig,
        rng: &mut R,
    ) {
        // Only kill off older species that have had time to innovate.
        if self.generations < config.grace_period {
            return;
        }

        self.members.sort_by(|&a, &b| {
            clients[b]
                .score()
                .partial_cmp(&clients[a].score())
                .unwrap_or_else(|| panic!("uncomparable client scores detected"))
        });

        let kill_count = (percentage * self.members.len() as f64) as usize;
        let keep = self.members.len() - kill_count;
        for &member in &self.members[keep..] {
            clients[member].set_species(None);
        }
        self.members.truncate(keep);

        if !self.members.contains(&self.base) {
            match self.random_member(rng) {
                Some(new_base) => self.base = new_base,
                None => self.go_extinct(clients),
            }
        }
    }

    /// Marks the species as extinct and removes all members.
    /// Extinction is terminal.
    pub fn go_extinct(&mut self, clients: &mut [Client]) {
        self.extinct = true;
        for &member in &self.members {
            clients[member].set_species(None);
        }
        self.members.clear();
    }

    /// Breeds two uniformly random members (possibly the same
    /// client) into a new genome, passing the higher-scoring
    /// parent first to the crossover.
    ///
    /// Returns `None` if the species has no members, or if a
    /// chosen parent has no attached genome; callers must
    /// handle the absence.
    pub fn breed<R: Rng>(
        &self,
        clients: &[Client],
        history: &mut History,
        rng: &mut R,
    ) -> Option<Genome> {
        let a = self.random_member(rng)?;
        let b = self.random_member(rng)?;

        let (first, second) = if clients[a].score() > clients[b].score() {
            (a, b)
        } else {
            (b, a)
        };

        Some(Genome::crossover(
            clients[first].genome()?,
            clients[second].genome()?,
            history,
            rng,
        ))
    }
}
