//! The genome mutation pipeline.
//!
//! Four operators are applied in a fixed sequence, each gated
//! by its own chance, all drawing from the run's single random
//! source in a deterministic order: connection addition, node
//! addition, weight mutation and bias mutation.

use crate::genomics::{Gene, GeneticConfig, Genome, History};

use rand::Rng;

impl Genome {
    /// Applies the full mutation pipeline to the genome.
    ///
    /// Structural mutations consult the `history` so that
    /// identical changes made anywhere in the population
    /// receive identical innovation numbers. Bias mutation
    /// writes through the `history` as well, since node
    /// attributes are shared by every genome holding the node.
    ///
    /// # Examples
    /// ```
    /// use topogen::genomics::{GeneticConfig, History};
    /// use rand::rngs::StdRng;
    /// use rand::SeedableRng;
    ///
    /// let config = GeneticConfig::default();
    /// let mut history = History::new(&config);
    /// let mut rng = StdRng::seed_from_u64(1111);
    ///
    /// let mut genome = history.new_genome(false);
    /// genome.mutate(&mut history, &config, &mut rng);
    /// ```
    pub fn mutate<R: Rng>(&mut self, history: &mut History, config: &GeneticConfig, rng: &mut R) {
        self.mutate_add_connection(history, config, rng);
        self.mutate_add_node(history, config, rng);
        self.mutate_weights(config, rng);
        self.mutate_biases(history, config, rng);
    }

    /// Tries to connect two randomly-selected nodes of the
    /// genome, oriented left-to-right.
    ///
    /// Pairs at the same horizontal position and pairs already
    /// connected in this genome are rejected; up to
    /// [`max_gene_addition_attempts`] samples are drawn before
    /// the mutation gives up. Exhaustion leaves the genome
    /// unchanged: it is the expected outcome of a probabilistic
    /// search, not an error.
    ///
    /// [`max_gene_addition_attempts`]: GeneticConfig::max_gene_addition_attempts
    pub fn mutate_add_connection<R: Rng>(
        &mut self,
        history: &mut History,
        config: &GeneticConfig,
        rng: &mut R,
    ) {
        if rng.gen::<f64>() > config.gene_addition_chance {
            return;
        }

        for _ in 0..config.max_gene_addition_attempts {
            let mut from = self.nodes[rng.gen_range(0..self.nodes.len())];
            let mut to = self.nodes[rng.gen_range(0..self.nodes.len())];

            // Swap to make sure connections flow left -> right.
            if history.node(from).x() > history.node(to).x() {
                std::mem::swap(&mut from, &mut to);
            }

            // Nodes on the same vertical cannot be connected.
            if history.node(from).x() == history.node(to).x() {
                continue;
            }

            if self.contains_endpoints(from, to) {
                continue;
            }

            let gene = history
                .new_connection(from, to)
                .unwrap_or_else(|e| panic!("{} during connection addition", e));
            self.insert_gene(gene)
                .unwrap_or_else(|e| panic!("{} during connection addition", e));
            break;
        }
    }

    /// Splits a randomly-selected connection gene in two,
    /// inserting the (possibly shared) replacement node in the
    /// middle.
    ///
    /// The incoming half starts with weight 1.0 and the
    /// outgoing half inherits the original weight, so the
    /// split is initially behavior-preserving. The original
    /// gene is suppressed but kept for historical alignment.
    ///
    /// Re-splitting a connection whose replacement node is
    /// already present in this genome is a no-op: the operator
    /// never attempts a duplicate insertion.
    pub fn mutate_add_node<R: Rng>(
        &mut self,
        history: &mut History,
        config: &GeneticConfig,
        rng: &mut R,
    ) {
        if rng.gen::<f64>() > config.node_addition_chance {
            return;
        }

        if self.genes.is_empty() {
            return;
        }

        let index = rng.gen_range(0..self.genes.len());
        let split: Gene = self.genes[index].clone();
        let middle = history.replacement_node(&split);
        if self.contains_node(middle) {
            return;
        }

        let mut incoming = history
            .new_connection(split.input(), middle)
            .unwrap_or_else(|e| panic!("{} during node addition", e));
        let mut outgoing = history
            .new_connection(middle, split.output())
            .unwrap_or_else(|e| panic!("{} during node addition", e));
        incoming.set_weight(1.0);
        outgoing.set_weight(split.weight());

        self.genes[index].set_suppressed(true);
        self.insert_node(middle)
            .unwrap_or_else(|e| panic!("{} during node addition", e));
        self.insert_gene(incoming)
            .unwrap_or_else(|e| panic!("{} during node addition", e));
        self.insert_gene(outgoing)
            .unwrap_or_else(|e| panic!("{} during node addition", e));
    }

    /// Mutates every connection gene's weight: most are nudged
    /// by a uniform draw within ±[`weight_nudge_power`], the
    /// rest are reset to a uniform draw within
    /// ±[`weight_reset_bound`].
    ///
    /// [`weight_nudge_power`]: GeneticConfig::weight_nudge_power
    /// [`weight_reset_bound`]: GeneticConfig::weight_reset_bound
    pub fn mutate_weights<R: Rng>(&mut self, config: &GeneticConfig, rng: &mut R) {
        for gene in &mut self.genes {
            if rng.gen::<f64>() < config.weight_nudge_chance {
                let shift = rng.gen_range(-config.weight_nudge_power..config.weight_nudge_power);
                gene.set_weight(gene.weight() + shift);
            } else {
                gene.set_weight(rng.gen_range(-config.weight_reset_bound..config.weight_reset_bound));
            }
        }
    }

    /// Mutates a fraction of the genome's node biases, writing
    /// through the shared nodes in the `history`.
    ///
    /// Touched biases are mostly nudged within
    /// ±[`bias_nudge_power`], occasionally reinitialized within
    /// ±[`bias_reset_bound`], and always clamped to
    /// ±[`bias_bound`] to prevent extreme values.
    ///
    /// [`bias_nudge_power`]: GeneticConfig::bias_nudge_power
    /// [`bias_reset_bound`]: GeneticConfig::bias_reset_bound
    /// [`bias_bound`]: GeneticConfig::bias_bound
    pub fn mutate_biases<R: Rng>(
        &mut self,
        history: &mut History,
        config: &GeneticConfig,
        rng: &mut R,
    ) {
        for &id in &self.nodes {
            if rng.gen::<f64>() > config.bias_mutation_chance {
                continue;
            }

            let node = history.node_mut(id);
            // Either completely reinitialize, or slightly nudge the bias.
            let bias = if rng.gen::<f64>() > 1.0 - config.bias_reset_chance {
                rng.gen_range(-config.bias_reset_bound..config.bias_reset_bound)
            } else {
                node.bias() + rng.gen_range(-config.bias_nudge_power..config.bias_nudge_power)
            };

            node.set_bias(bias.clamp(-config.bias_bound, config.bias_bound));
        }
    }
}
