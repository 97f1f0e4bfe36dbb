use topogen::genomics::GeneticConfig;
use topogen::populations::logging::{EvolutionLogger, ReportingLevel, Stats};
use topogen::populations::{Population, PopulationConfig};

use std::num::NonZeroUsize;

const TRIALS: usize = 100;
const MAX_GENERATIONS: usize = 1000;

const VALUES: [([f64; 2], f64); 4] = [
    ([0.0, 0.0], 0.0),
    ([0.0, 1.0], 1.0),
    ([1.0, 0.0], 1.0),
    ([1.0, 1.0], 0.0),
];

fn main() {
    let mut generations = Vec::with_capacity(TRIALS);
    for _ in 0..TRIALS {
        generations.push(run_trial());
    }

    let failures = generations.iter().filter(|g| g.is_none()).count();
    println!(
        "Successful run generation count {:?}, {}% failure rate over {} trials",
        Stats::from(generations.iter().filter_map(|g| g.map(|g| g as f64))),
        failures as f64 * 100.0 / TRIALS as f64,
        TRIALS
    );
}

/// Evolves one population until some client solves XOR, and
/// returns the generation count, or `None` if the trial ran
/// out of generations.
fn run_trial() -> Option<usize> {
    let genetic_config = GeneticConfig {
        input_count: NonZeroUsize::new(2).unwrap(),
        output_count: NonZeroUsize::new(1).unwrap(),
        ..GeneticConfig::default()
    };
    let population_config = PopulationConfig {
        size: NonZeroUsize::new(100).unwrap(),
        rng_seed: rand::random(),
        ..PopulationConfig::default()
    };

    let mut logger = EvolutionLogger::new(ReportingLevel::PopulationChampion);
    let mut population = Population::new(population_config, genetic_config);

    for generation in 0..MAX_GENERATIONS {
        // Start from the loss function's maximum of 4.0, so the
        // worst possible network scores 0. A client solves XOR
        // when its rounded outputs match the truth table within
        // 0.1.
        let mut solved = false;
        population.evaluate_fitness(|network| {
            let mut score = 4.0;
            let mut passed = true;
            for (inputs, expected) in &VALUES {
                let output = network.predict(inputs)[0];
                let diff = output - expected;
                score -= diff * diff;
                if (output.round() - expected).abs() > 0.1 {
                    passed = false;
                }
            }
            solved |= passed;
            score
        });

        if generation % 100 == 0 {
            logger.log(&population);
            if let Some(log) = logger.iter().last() {
                println!("{}", log);
            }
        }

        if solved {
            println!("Solved XOR in {} generations!", generation);
            return Some(generation);
        }

        if let Err(e) = population.evolve() {
            eprintln!("{}", e);
            break;
        }
    }

    None
}
