use crate::genomics::{Gene, GeneValidityError, GeneticConfig, Genome, Node};
use crate::Innovation;

use ahash::RandomState;
use serde::{Deserialize, Serialize};

use std::collections::hash_map::HashMap;

/// A `History` keeps track of gene and node innovations in a
/// population, in order to make sure identical mutations
/// are assigned the same innovation numbers.
///
/// The `History` owns every node ever created: genomes refer
/// to nodes by id only, so node attributes (in particular the
/// bias) are shared by all genomes holding the node. For each
/// distinct structural endpoint pair the `History` also owns
/// the canonical connection gene, and issues value copies of
/// it on request, so two calls with the same pair return genes
/// with the same id, at any time and from any genome.
///
/// For node innovations the split gene is used to identify
/// identical mutations: splitting the same connection in two
/// different genomes reuses one replacement node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    input_count: usize,
    output_count: usize,
    nodes: Vec<Node>,
    gene_innovations: HashMap<(Innovation, Innovation), Gene, RandomState>,
    replacement_nodes: HashMap<Innovation, Innovation, RandomState>,
}

impl History {
    /// Creates a new `History` using the specified configuration,
    /// seeded with the configured number of input and output nodes.
    ///
    /// Input nodes sit at x = 0.1 and output nodes at x = 0.9
    /// (not exactly 0 and 1, which adds padding if visualized),
    /// spread vertically as `(i + 1) / (count + 1)`.
    ///
    /// # Examples
    /// ```
    /// use topogen::genomics::{GeneticConfig, History};
    /// use std::num::NonZeroUsize;
    ///
    /// let history = History::new(&GeneticConfig {
    ///     input_count: NonZeroUsize::new(3).unwrap(),
    ///     output_count: NonZeroUsize::new(2).unwrap(),
    ///     ..GeneticConfig::zero()
    /// });
    ///
    /// assert_eq!(history.node_count(), 5);
    /// assert!(history.is_input(0) && history.is_input(2));
    /// assert!(history.is_output(3) && history.is_output(4));
    /// ```
    pub fn new(config: &GeneticConfig) -> History {
        let input_count = config.input_count.get();
        let output_count = config.output_count.get();

        let mut history = History {
            input_count,
            output_count,
            nodes: Vec::with_capacity(input_count + output_count),
            gene_innovations: HashMap::default(),
            replacement_nodes: HashMap::default(),
        };

        for i in 0..input_count {
            history.new_node(0.1, (i + 1) as f64 / (input_count + 1) as f64);
        }
        for o in 0..output_count {
            history.new_node(0.9, (o + 1) as f64 / (output_count + 1) as f64);
        }

        history
    }

    /// Allocates a new node at the given position and
    /// returns its innovation number.
    pub fn new_node(&mut self, x: f64, y: f64) -> Innovation {
        let id = self.nodes.len();
        self.nodes.push(Node::new(id, x, y));
        id
    }

    /// Returns the canonical gene for the given endpoint pair,
    /// as a value copy with a weight of 0 and no suppression.
    /// The first request for a pair mints the canonical gene
    /// with the next available connection innovation number;
    /// every subsequent request, from any genome and at any
    /// time, returns a copy bearing the same number.
    ///
    /// # Errors
    /// Fails if `from`'s x position is not strictly lesser than
    /// `to`'s, which would break the left-to-right feed-forward
    /// ordering.
    ///
    /// # Examples
    /// ```
    /// use topogen::genomics::{GeneticConfig, History};
    ///
    /// let mut history = History::new(&GeneticConfig::zero());
    ///
    /// let first = history.new_connection(0, 1).unwrap();
    /// let again = history.new_connection(0, 1).unwrap();
    /// assert_eq!(first.innovation(), again.innovation());
    ///
    /// // Output nodes lie to the right of input nodes.
    /// assert!(history.new_connection(1, 0).is_err());
    /// ```
    pub fn new_connection(
        &mut self,
        from: Innovation,
        to: Innovation,
    ) -> Result<Gene, GeneValidityError> {
        if self.nodes[from].x() >= self.nodes[to].x() {
            return Err(GeneValidityError::NonForwardEndpoints(from, to));
        }

        let next_id = self.gene_innovations.len();
        let canonical = self
            .gene_innovations
            .entry((from, to))
            .or_insert_with(|| Gene::new(next_id, from, to));
        Ok(canonical.clone())
    }

    /// Returns the node to be inserted in the middle of the
    /// given gene when it is split by a node addition mutation.
    ///
    /// If the gene has already been split anywhere in the
    /// population's history the recorded replacement node is
    /// reused, so structurally convergent mutations stay
    /// aligned. Otherwise a new node is allocated at the
    /// midpoint of the gene's endpoints and recorded.
    pub fn replacement_node(&mut self, gene: &Gene) -> Innovation {
        if let Some(&id) = self.replacement_nodes.get(&gene.innovation()) {
            return id;
        }

        let (from, to) = gene.endpoints();
        let x = (self.nodes[from].x() + self.nodes[to].x()) / 2.0;
        let y = (self.nodes[from].y() + self.nodes[to].y()) / 2.0;
        let id = self.new_node(x, y);
        self.replacement_nodes.insert(gene.innovation(), id);
        id
    }

    /// Creates a genome seeded with all current input and
    /// output nodes. Unless `skip_default_topology` is set,
    /// every input is connected to every output; crossover
    /// requests the empty form and builds structure purely
    /// from inheritance.
    ///
    /// # Examples
    /// ```
    /// use topogen::genomics::{GeneticConfig, History};
    /// use std::num::NonZeroUsize;
    ///
    /// let mut history = History::new(&GeneticConfig {
    ///     input_count: NonZeroUsize::new(2).unwrap(),
    ///     output_count: NonZeroUsize::new(1).unwrap(),
    ///     ..GeneticConfig::zero()
    /// });
    ///
    /// let genome = history.new_genome(false);
    /// assert_eq!(genome.node_ids().count(), 3);
    /// assert_eq!(genome.genes().count(), 2);
    ///
    /// let empty = history.new_genome(true);
    /// assert_eq!(empty.genes().count(), 0);
    /// ```
    pub fn new_genome(&mut self, skip_default_topology: bool) -> Genome {
        let mut genome = Genome::empty();
        for id in 0..self.input_count + self.output_count {
            genome
                .insert_node(id)
                .unwrap_or_else(|e| panic!("{} while seeding genome", e));
        }

        if !skip_default_topology {
            for i in 0..self.input_count {
                for o in self.input_count..self.input_count + self.output_count {
                    let gene = self
                        .new_connection(i, o)
                        .unwrap_or_else(|e| panic!("{} while seeding genome", e));
                    genome
                        .insert_gene(gene)
                        .unwrap_or_else(|e| panic!("{} while seeding genome", e));
                }
            }
        }

        genome
    }

    /// Returns a reference to the node with the given id.
    ///
    /// # Panics
    /// Panics if no node with that id has been created.
    pub fn node(&self, id: Innovation) -> &Node {
        &self.nodes[id]
    }

    /// Returns a mutable reference to the node with the given id.
    ///
    /// # Panics
    /// Panics if no node with that id has been created.
    pub fn node_mut(&mut self, id: Innovation) -> &mut Node {
        &mut self.nodes[id]
    }

    /// Returns an iterator over all nodes ever created.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Returns the number of input nodes.
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    /// Returns the number of output nodes.
    pub fn output_count(&self) -> usize {
        self.output_count
    }

    /// Returns the number of nodes ever created.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of distinct structural connections
    /// ever created.
    pub fn connection_count(&self) -> usize {
        self.gene_innovations.len()
    }

    /// Whether the node with the given id is an input node.
    pub fn is_input(&self, id: Innovation) -> bool {
        id < self.input_count
    }

    /// Whether the node with the given id is an output node.
    pub fn is_output(&self, id: Innovation) -> bool {
        id >= self.input_count && id < self.input_count + self.output_count
    }

    /// Whether the node with the given id is a hidden node.
    pub fn is_hidden(&self, id: Innovation) -> bool {
        id >= self.input_count + self.output_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    fn history(inputs: usize, outputs: usize) -> History {
        History::new(&GeneticConfig {
            input_count: NonZeroUsize::new(inputs).unwrap(),
            output_count: NonZeroUsize::new(outputs).unwrap(),
            ..GeneticConfig::zero()
        })
    }

    #[test]
    fn seeds_input_and_output_nodes() {
        let history = history(3, 2);

        assert_eq!(history.node_count(), 5);
        assert!((0..3).all(|id| history.is_input(id)));
        assert!((3..5).all(|id| history.is_output(id)));
        assert!((0..3).all(|id| history.node(id).x() == 0.1));
        assert!((3..5).all(|id| history.node(id).x() == 0.9));
    }

    #[test]
    fn connection_identity_is_stable() {
        let mut history = history(2, 1);

        let a = history.new_connection(0, 2).unwrap();
        let b = history.new_connection(1, 2).unwrap();
        // Re-requesting the first pair later still yields its id.
        let a_again = history.new_connection(0, 2).unwrap();

        assert_eq!(a.innovation(), a_again.innovation());
        assert_ne!(a.innovation(), b.innovation());
        assert_eq!(history.connection_count(), 2);
    }

    #[test]
    fn issued_genes_are_independent_copies() {
        let mut history = history(2, 1);

        let mut a = history.new_connection(0, 2).unwrap();
        a.set_weight(3.0);
        a.set_suppressed(true);

        let b = history.new_connection(0, 2).unwrap();
        assert_eq!(b.weight(), 0.0);
        assert!(!b.suppressed());
    }

    #[test]
    fn non_forward_connection_is_rejected() {
        let mut history = history(2, 1);

        assert_eq!(
            history.new_connection(2, 0),
            Err(GeneValidityError::NonForwardEndpoints(2, 0))
        );
        // Equal x positions are rejected too.
        assert!(history.new_connection(0, 1).is_err());
    }

    #[test]
    fn replacement_node_is_reused_across_splits() {
        let mut history = history(2, 1);

        let gene = history.new_connection(0, 2).unwrap();
        let middle = history.replacement_node(&gene);
        let again = history.replacement_node(&gene);

        assert_eq!(middle, again);
        assert!(history.is_hidden(middle));
        // Midpoint of x = 0.1 and x = 0.9.
        assert!((history.node(middle).x() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn default_topology_is_fully_connected() {
        let mut history = history(3, 2);

        let genome = history.new_genome(false);
        assert_eq!(genome.genes().count(), 6);
        assert_eq!(history.connection_count(), 6);

        // Initial genes are registered: a later request for an
        // initial pair reuses its innovation number.
        let reused = history.new_connection(0, 3).unwrap();
        assert!(genome
            .genes()
            .any(|g| g.innovation() == reused.innovation()));
    }
}
