//! Network instantiation of genomes.
//!
//! A [`FeedForwardNetwork`] is the phenotype of a genome: the
//! runnable network its genes describe. Since genes only ever
//! flow from lower to strictly higher x positions, evaluating
//! hidden neurons in ascending-x order, then the outputs, is
//! sufficient for a single feed-forward pass.

use crate::genomics::{GeneticConfig, Genome, History};
use crate::Innovation;

use ahash::RandomState;

use std::collections::HashMap;

#[derive(Clone, Debug)]
struct Neuron {
    bias: f64,
    value: f64,
    /// Incoming connections, as (source neuron index, weight).
    incoming: Vec<(usize, f64)>,
}

/// A feed-forward neural network derived from a genome.
///
/// Input neurons take their value directly from the input
/// vector; every hidden and output neuron applies a rectified
/// linear activation to its bias plus the weighted sum of its
/// incoming values.
#[derive(Clone, Debug)]
pub struct FeedForwardNetwork {
    input_count: usize,
    output_count: usize,
    /// Inputs first, then hidden neurons in ascending-x order,
    /// then outputs: also the evaluation order.
    neurons: Vec<Neuron>,
}

impl FeedForwardNetwork {
    /// Builds the network described by a genome.
    ///
    /// Node attributes (position, bias) are read from the
    /// `history`, which owns them. Whether suppressed genes
    /// still contribute connections is controlled by
    /// [`express_suppressed_genes`], which historically
    /// defaults to `true`.
    ///
    /// [`express_suppressed_genes`]: GeneticConfig::express_suppressed_genes
    pub fn new(genome: &Genome, history: &History, config: &GeneticConfig) -> FeedForwardNetwork {
        let mut inputs = Vec::new();
        let mut hidden = Vec::new();
        let mut outputs = Vec::new();
        for id in genome.node_ids() {
            if history.is_input(id) {
                inputs.push(id);
            } else if history.is_output(id) {
                outputs.push(id);
            } else {
                hidden.push(id);
            }
        }

        // Sort left -> right. The genome's node sequence is
        // ascending by id, so equal positions stay in id order.
        hidden.sort_by(|&a, &b| {
            history
                .node(a)
                .x()
                .partial_cmp(&history.node(b).x())
                .unwrap_or_else(|| panic!("node {} or {} has an unorderable position", a, b))
        });

        let input_count = inputs.len();
        let output_count = outputs.len();

        let mut indices: HashMap<Innovation, usize, RandomState> = HashMap::default();
        let mut neurons = Vec::with_capacity(genome.node_ids().count());
        for id in inputs.into_iter().chain(hidden).chain(outputs) {
            indices.insert(id, neurons.len());
            neurons.push(Neuron {
                bias: history.node(id).bias(),
                value: 0.0,
                incoming: Vec::new(),
            });
        }

        for gene in genome.genes() {
            if gene.suppressed() && !config.express_suppressed_genes {
                continue;
            }
            let from = indices[&gene.input()];
            let to = indices[&gene.output()];
            neurons[to].incoming.push((from, gene.weight()));
        }

        FeedForwardNetwork {
            input_count,
            output_count,
            neurons,
        }
    }

    /// Feeds `inputs` into the network and returns the values
    /// of the output neurons after a full forward pass.
    ///
    /// # Panics
    /// Panics if `inputs` does not have exactly one value per
    /// input neuron.
    ///
    /// # Examples
    /// ```
    /// use topogen::genomics::{GeneticConfig, History};
    /// use topogen::networks::FeedForwardNetwork;
    ///
    /// let config = GeneticConfig::default();
    /// let mut history = History::new(&config);
    /// let genome = history.new_genome(false);
    ///
    /// let mut network = FeedForwardNetwork::new(&genome, &history, &config);
    /// assert_eq!(network.predict(&[1.0]).len(), 1);
    /// ```
    pub fn predict(&mut self, inputs: &[f64]) -> Vec<f64> {
        assert_eq!(
            inputs.len(),
            self.input_count,
            "input vector length does not match the network's input count"
        );

        for (neuron, &input) in self.neurons.iter_mut().zip(inputs) {
            neuron.value = input;
        }

        for index in self.input_count..self.neurons.len() {
            let sum = {
                let neuron = &self.neurons[index];
                neuron.bias
                    + neuron
                        .incoming
                        .iter()
                        .map(|&(source, weight)| self.neurons[source].value * weight)
                        .sum::<f64>()
            };
            // Rectified linear activation keeps the pass non-linear.
            self.neurons[index].value = sum.max(0.0);
        }

        self.neurons[self.neurons.len() - self.output_count..]
            .iter()
            .map(|neuron| neuron.value)
            .collect()
    }

    /// Returns the number of input neurons.
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    /// Returns the number of output neurons.
    pub fn output_count(&self) -> usize {
        self.output_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    fn config(inputs: usize, outputs: usize) -> GeneticConfig {
        GeneticConfig {
            input_count: NonZeroUsize::new(inputs).unwrap(),
            output_count: NonZeroUsize::new(outputs).unwrap(),
            ..GeneticConfig::default()
        }
    }

    /// Wires the classic fixed XOR topology: both inputs feed the
    /// output directly with weight 1.0, and a hidden node with
    /// bias -1.0, fed by both inputs with weight 1.0, inhibits
    /// the output with weight -2.0.
    fn xor_genome(history: &mut History) -> Genome {
        let mut genome = history.new_genome(false);
        for gene in genome.genes_mut() {
            gene.set_weight(1.0);
        }

        let middle = history.new_node(0.5, 0.5);
        history.node_mut(middle).set_bias(-1.0);
        genome.insert_node(middle).unwrap();

        let mut left = history.new_connection(0, middle).unwrap();
        let mut right = history.new_connection(1, middle).unwrap();
        let mut inhibitor = history.new_connection(middle, 2).unwrap();
        left.set_weight(1.0);
        right.set_weight(1.0);
        inhibitor.set_weight(-2.0);
        genome.insert_gene(left).unwrap();
        genome.insert_gene(right).unwrap();
        genome.insert_gene(inhibitor).unwrap();

        genome
    }

    #[test]
    fn xor_network_end_to_end() {
        let config = config(2, 1);
        let mut history = History::new(&config);
        let genome = xor_genome(&mut history);

        let mut network = FeedForwardNetwork::new(&genome, &history, &config);

        let values = [
            ([0.0, 0.0], 0.0),
            ([0.0, 1.0], 1.0),
            ([1.0, 0.0], 1.0),
            ([1.0, 1.0], 0.0),
        ];
        for (inputs, expected) in &values {
            let output = network.predict(inputs)[0];
            assert!(
                (output - expected).abs() < 0.1,
                "xor({:?}) = {}, expected {}",
                inputs,
                output,
                expected
            );
        }
    }

    #[test]
    fn inputs_bypass_bias_and_activation() {
        let config = config(1, 1);
        let mut history = History::new(&config);
        let mut genome = history.new_genome(false);
        for gene in genome.genes_mut() {
            gene.set_weight(1.0);
        }
        history.node_mut(0).set_bias(3.0);

        let mut network = FeedForwardNetwork::new(&genome, &history, &config);

        // A negative input reaches the output unrectified and
        // without the input node's bias.
        assert_eq!(network.predict(&[-2.0]), vec![0.0]);
        assert_eq!(network.predict(&[2.0]), vec![2.0]);
    }

    #[test]
    fn suppressed_genes_contribute_by_default() {
        let config = config(1, 1);
        let mut history = History::new(&config);
        let mut genome = history.new_genome(false);
        for gene in genome.genes_mut() {
            gene.set_weight(1.0);
            gene.set_suppressed(true);
        }

        let mut network = FeedForwardNetwork::new(&genome, &history, &config);
        assert_eq!(network.predict(&[1.0]), vec![1.0]);
    }

    #[test]
    fn suppressed_genes_can_be_excluded() {
        let config = GeneticConfig {
            express_suppressed_genes: false,
            ..config(1, 1)
        };
        let mut history = History::new(&config);
        let mut genome = history.new_genome(false);
        for gene in genome.genes_mut() {
            gene.set_weight(1.0);
            gene.set_suppressed(true);
        }

        let mut network = FeedForwardNetwork::new(&genome, &history, &config);
        assert_eq!(network.predict(&[1.0]), vec![0.0]);
    }

    #[test]
    fn hidden_neurons_evaluate_in_ascending_x_order() {
        let config = config(1, 1);
        let mut history = History::new(&config);
        let mut genome = history.new_genome(true);

        // A two-deep chain: input -> near -> far -> output, with
        // the far neuron created first. Ordering by x is what
        // makes the chain evaluate correctly in a single pass.
        let far = history.new_node(0.7, 0.5);
        let near = history.new_node(0.3, 0.5);
        genome.insert_node(far).unwrap();
        genome.insert_node(near).unwrap();

        for (from, to) in [(0, near), (near, far), (far, 1)] {
            let mut gene = history.new_connection(from, to).unwrap();
            gene.set_weight(1.0);
            genome.insert_gene(gene).unwrap();
        }

        let mut network = FeedForwardNetwork::new(&genome, &history, &config);
        assert_eq!(network.predict(&[1.5]), vec![1.5]);
    }
}
