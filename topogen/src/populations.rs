//! A population is a collection of clients, grouped into
//! species by genome compatibility and advanced generation by
//! generation against an externally supplied fitness signal.

mod clients;
mod config;
mod errors;
pub mod logging;
mod species;

pub use clients::Client;
pub use config::PopulationConfig;
pub use errors::{PopulationError, SpeciesError};
pub use species::Species;

use crate::genomics::{GeneticConfig, History};
use crate::networks::FeedForwardNetwork;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A population of clients.
///
/// The population owns the run's entire mutable state: the
/// clients, the species grouping them, the innovation
/// [`History`] and the single random source all operators
/// draw from, in a fixed order, so runs with equal seeds are
/// reproducible.
pub struct Population {
    clients: Vec<Client>,
    species: Vec<Species>,
    history: History,
    generation: usize,
    species_counter: usize,
    rng: StdRng,
    population_config: PopulationConfig,
    genetic_config: GeneticConfig,
}

impl Population {
    /// Creates a new population using the passed
    /// configurations, filled with clients bearing the default
    /// fully-connected input-to-output topology.
    ///
    /// # Examples
    /// ```
    /// use topogen::genomics::GeneticConfig;
    /// use topogen::populations::{Population, PopulationConfig};
    /// use std::num::NonZeroUsize;
    ///
    /// let population = Population::new(
    ///     PopulationConfig {
    ///         size: NonZeroUsize::new(50).unwrap(),
    ///         ..PopulationConfig::default()
    ///     },
    ///     GeneticConfig::default(),
    /// );
    ///
    /// assert_eq!(population.clients().count(), 50);
    /// assert_eq!(population.generation(), 0);
    /// ```
    pub fn new(population_config: PopulationConfig, genetic_config: GeneticConfig) -> Population {
        let mut history = History::new(&genetic_config);
        let clients = (0..population_config.size.get())
            .map(|id| Client::new(id, history.new_genome(false)))
            .collect();

        Population {
            clients,
            species: vec![],
            history,
            generation: 0,
            species_counter: 0,
            rng: StdRng::seed_from_u64(population_config.rng_seed),
            population_config,
            genetic_config,
        }
    }

    /// Evaluates the fitness of each client in the population
    /// using the passed evaluator, storing the returned score.
    ///
    /// Cached phenotypes are reused where the genome has not
    /// changed since the last evaluation.
    ///
    /// # Examples
    /// ```
    /// use topogen::genomics::GeneticConfig;
    /// use topogen::populations::{Population, PopulationConfig};
    ///
    /// let mut population = Population::new(
    ///     PopulationConfig::default(),
    ///     GeneticConfig::default(),
    /// );
    ///
    /// // Networks with outputs closer to 0 are given higher scores.
    /// population.evaluate_fitness(|network| {
    ///     1.0 - network.predict(&[1.0])[0].abs()
    /// });
    /// ```
    pub fn evaluate_fitness<E>(&mut self, mut evaluator: E)
    where
        E: FnMut(&mut FeedForwardNetwork) -> f64,
    {
        for client in &mut self.clients {
            let score = evaluator(client.network(&self.history, &self.genetic_config));
            client.set_score(score);
        }
    }

    /// Advances the population by one generation.
    ///
    /// Every client is expected to carry a current score, set
    /// through [`evaluate_fitness`] beforehand. The step:
    /// 1. re-speciates: extinct species are dropped, the rest
    ///    are reset, every client joins the first compatible
    ///    species or founds a new one around itself, and each
    ///    species re-evaluates its average score and age;
    /// 2. ranks all clients ascending by score;
    /// 3. detaches the genomes of the configured bottom
    ///    fraction of the ranking, marking those clients dead;
    /// 4. regrows each dead client from a uniformly random
    ///    survivor: a clone of the survivor's genome, run
    ///    through the full mutation pipeline;
    /// 5. mutates every survivor's genome in place;
    /// 6. increments the generation counter.
    ///
    /// # Errors
    /// Fails if culling leaves no survivors to regrow from
    /// (a `cull_fraction` of 1.0 on a small population), or on
    /// an invalid species operation; the population should be
    /// considered unusable afterwards.
    ///
    /// [`evaluate_fitness`]: Population::evaluate_fitness
    pub fn evolve(&mut self) -> Result<(), PopulationError> {
        self.respeciate()?;

        // Rank everyone, worst first.
        let mut ranking: Vec<usize> = (0..self.clients.len()).collect();
        ranking.sort_by(|&a, &b| {
            self.clients[a]
                .score()
                .partial_cmp(&self.clients[b].score())
                .unwrap_or_else(|| panic!("uncomparable client scores detected"))
        });

        let cull_count =
            (self.population_config.cull_fraction * self.clients.len() as f64) as usize;
        let (dead, survivors) = ranking.split_at(cull_count);
        if survivors.is_empty() {
            return Err(PopulationError::NoSurvivors);
        }

        for &client in dead {
            self.clients[client].detach_genome();
        }

        // Regrow the dead from mutated clones of random survivors.
        for &client in dead {
            let parent = survivors[self.rng.gen_range(0..survivors.len())];
            let mut genome = self.clients[parent]
                .genome()
                .unwrap_or_else(|| panic!("surviving client {} has no genome", parent))
                .clone();
            genome.mutate(&mut self.history, &self.genetic_config, &mut self.rng);
            self.clients[client].set_genome(genome);
        }

        for &client in survivors {
            self.clients[client].mutate(&mut self.history, &self.genetic_config, &mut self.rng);
        }

        self.generation += 1;
        Ok(())
    }

    /// Reassigns every client to a species: existing species
    /// are reset around a random surviving member, clients
    /// join the first species whose base they are compatible
    /// with, and clients compatible with none found a new
    /// species of their own.
    fn respeciate(&mut self) -> Result<(), PopulationError> {
        self.species.retain(|species| !species.extinct());

        for species in &mut self.species {
            species.reset(&mut self.clients, &mut self.rng);
        }

        for client in 0..self.clients.len() {
            if self.clients[client].species().is_some() {
                continue;
            }

            let mut assigned = false;
            for species in &mut self.species {
                if species.add(
                    client,
                    false,
                    &mut self.clients,
                    &self.genetic_config,
                    &self.population_config,
                )? {
                    assigned = true;
                    break;
                }
            }

            if !assigned {
                let id = self.species_counter;
                self.species_counter += 1;
                self.species
                    .push(Species::new(id, client, &mut self.clients));
            }
        }

        for species in &mut self.species {
            species.evaluate(&self.clients);
        }

        Ok(())
    }

    /// Returns the currently best-performing client.
    ///
    /// # Examples
    /// ```
    /// use topogen::genomics::GeneticConfig;
    /// use topogen::populations::{Population, PopulationConfig};
    ///
    /// let mut population = Population::new(
    ///     PopulationConfig::default(),
    ///     GeneticConfig::default(),
    /// );
    ///
    /// population.evaluate_fitness(|_| 1.0);
    /// assert_eq!(population.champion().score(), 1.0);
    /// ```
    pub fn champion(&self) -> &Client {
        self.clients
            .iter()
            .max_by(|a, b| {
                a.score()
                    .partial_cmp(&b.score())
                    .unwrap_or_else(|| panic!("uncomparable client scores detected"))
            })
            .expect("empty population has no champion")
    }

    /// Returns an iterator over all clients.
    pub fn clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.iter()
    }

    /// Returns an iterator over all current species.
    pub fn species(&self) -> impl Iterator<Item = &Species> {
        self.species.iter()
    }

    /// Returns the current generation number.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Returns the population's innovation history.
    pub fn history(&self) -> &History {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    fn configs(size: usize) -> (PopulationConfig, GeneticConfig) {
        (
            PopulationConfig {
                size: NonZeroUsize::new(size).unwrap(),
                ..PopulationConfig::default()
            },
            GeneticConfig {
                input_count: NonZeroUsize::new(2).unwrap(),
                output_count: NonZeroUsize::new(1).unwrap(),
                ..GeneticConfig::default()
            },
        )
    }

    #[test]
    fn one_generation_step_preserves_population_size() {
        let (population_config, genetic_config) = configs(100);
        let mut population = Population::new(population_config, genetic_config);

        population.evaluate_fitness(|network| network.predict(&[1.0, 0.0])[0]);
        population.evolve().unwrap();

        assert_eq!(population.clients().count(), 100);
        assert!(population.clients().all(|c| c.genome().is_some()));
        assert_eq!(population.generation(), 1);
    }

    #[test]
    fn every_client_is_speciated_after_a_step() {
        let (population_config, genetic_config) = configs(50);
        let mut population = Population::new(population_config, genetic_config);

        population.evaluate_fitness(|_| 1.0);
        population.evolve().unwrap();

        assert!(population.species().count() >= 1);
        let members: usize = population.species().map(|s| s.members().len()).sum();
        assert_eq!(members, 50);
        assert!(population.clients().all(|c| c.species().is_some()));
    }

    #[test]
    fn culling_spares_the_top_of_the_ranking() {
        let (population_config, genetic_config) = configs(10);
        let mut population = Population::new(population_config, genetic_config);

        // Give client ids as scores: clients 9 survives a 90% cull.
        let scores: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let mut index = 0;
        population.evaluate_fitness(|_| {
            let score = scores[index];
            index += 1;
            score
        });

        population.evolve().unwrap();

        // Survivor genomes are mutated but never detached, so
        // every client ends the step with a genome attached.
        assert!(population.clients().all(|c| c.genome().is_some()));
        assert_eq!(population.generation(), 1);
    }

    #[test]
    fn total_culling_is_reported() {
        let (mut population_config, genetic_config) = configs(4);
        population_config.cull_fraction = 1.0;
        let mut population = Population::new(population_config, genetic_config);

        population.evaluate_fitness(|_| 1.0);
        assert_eq!(population.evolve(), Err(PopulationError::NoSurvivors));
    }

    #[test]
    fn equal_seeds_reproduce_equal_runs() {
        let run = || {
            let (population_config, genetic_config) = configs(30);
            let mut population = Population::new(population_config, genetic_config);
            for _ in 0..5 {
                population.evaluate_fitness(|network| network.predict(&[1.0, 1.0])[0]);
                population.evolve().unwrap();
            }
            population
                .clients()
                .map(|c| c.genome().unwrap().genes().count())
                .collect::<Vec<_>>()
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn species_age_across_generations() {
        let (population_config, genetic_config) = configs(20);
        let mut population = Population::new(population_config, genetic_config);

        for _ in 0..3 {
            population.evaluate_fitness(|_| 1.0);
            population.evolve().unwrap();
        }

        // At least one species has survived since the first
        // re-speciation pass and aged with each one.
        assert!(population.species().any(|s| s.generations() >= 2));
    }
}
