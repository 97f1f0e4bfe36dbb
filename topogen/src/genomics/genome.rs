use crate::genomics::{Gene, GeneValidityError, GeneticConfig, History, NodeValidityError};
use crate::Innovation;

use rand::Rng;
use serde::{Deserialize, Serialize};

use std::fmt;

/// A mutable collection of node genes and connection genes.
///
/// Both sequences are kept strictly ascending by innovation
/// number, which is what allows two genomes to be aligned by
/// a single merge walk for distance computation and crossover.
///
/// Cloning a genome copies both sequences: the connection
/// genes are owned value copies (already severed from the
/// canonical instances at issuance), while node genes remain
/// shared, since only their ids are stored.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Genome {
    pub(super) nodes: Vec<Innovation>,
    pub(super) genes: Vec<Gene>,
}

impl Genome {
    /// Creates a genome with no nodes or connections.
    /// Genomes are normally created through
    /// [`History::new_genome`], which seeds them with the
    /// population's input and output nodes.
    pub(crate) fn empty() -> Genome {
        Genome {
            nodes: Vec::new(),
            genes: Vec::new(),
        }
    }

    /// Adds a node to the genome, keeping the node sequence
    /// sorted ascending by id.
    ///
    /// # Errors
    /// Fails if a node with the same id is already present.
    ///
    /// # Examples
    /// ```
    /// use topogen::genomics::{GeneticConfig, History};
    ///
    /// let mut history = History::new(&GeneticConfig::zero());
    /// let mut genome = history.new_genome(true);
    ///
    /// let middle = history.new_node(0.5, 0.5);
    /// genome.insert_node(middle).unwrap();
    ///
    /// assert!(genome.insert_node(middle).is_err());
    /// ```
    pub fn insert_node(&mut self, id: Innovation) -> Result<(), NodeValidityError> {
        match self.nodes.binary_search(&id) {
            Ok(_) => Err(NodeValidityError::DuplicateNodeID(id)),
            Err(position) => {
                self.nodes.insert(position, id);
                Ok(())
            }
        }
    }

    /// Adds a connection gene to the genome, keeping the gene
    /// sequence sorted ascending by innovation number.
    ///
    /// # Errors
    /// Fails if a gene with the same innovation number is
    /// already present.
    pub fn insert_gene(&mut self, gene: Gene) -> Result<(), GeneValidityError> {
        match self
            .genes
            .binary_search_by_key(&gene.innovation(), Gene::innovation)
        {
            Ok(_) => Err(GeneValidityError::DuplicateGeneID(gene.innovation())),
            Err(position) => {
                self.genes.insert(position, gene);
                Ok(())
            }
        }
    }

    /// Whether the genome contains the node with the given id.
    pub fn contains_node(&self, id: Innovation) -> bool {
        self.nodes.binary_search(&id).is_ok()
    }

    /// Whether the genome contains a gene between the given
    /// endpoints, regardless of weight or suppression status.
    pub fn contains_endpoints(&self, from: Innovation, to: Innovation) -> bool {
        self.genes.iter().any(|g| g.endpoints() == (from, to))
    }

    /// Returns an iterator over the genome's node ids,
    /// in ascending order.
    pub fn node_ids(&self) -> impl Iterator<Item = Innovation> + '_ {
        self.nodes.iter().copied()
    }

    /// Returns an iterator over the genome's connection genes,
    /// in ascending innovation order.
    pub fn genes(&self) -> impl Iterator<Item = &Gene> {
        self.genes.iter()
    }

    /// Returns a mutating iterator over the genome's connection
    /// genes. Gene ids are immutable, so the sequence stays sorted.
    pub fn genes_mut(&mut self) -> impl Iterator<Item = &mut Gene> {
        self.genes.iter_mut()
    }

    /// Calculates the compatibility distance between two genomes.
    ///
    /// Both gene sequences are walked simultaneously in
    /// innovation order. Genes sharing an innovation number
    /// contribute their absolute weight difference; genes
    /// missing from the other genome while both walks are in
    /// range count as disjoint; everything after one walk runs
    /// out counts as excess. The distance is
    /// `c1·excess/n + c2·disjoint/n + c3·avg_weight_diff`,
    /// where `n` is the larger gene count, except that genomes
    /// under 20 genes are compared unnormalized (`n = 1`) so
    /// early-generation genomes do not cluster too permissively.
    ///
    /// The result depends only on the unordered pair, so the
    /// distance is symmetric.
    ///
    /// # Examples
    /// ```
    /// use topogen::genomics::{GeneticConfig, Genome, History};
    ///
    /// let config = GeneticConfig::default();
    /// let mut history = History::new(&config);
    /// let genome = history.new_genome(false);
    ///
    /// assert_eq!(Genome::genetic_distance(&genome, &genome, &config), 0.0);
    /// ```
    pub fn genetic_distance(a: &Genome, b: &Genome, config: &GeneticConfig) -> f64 {
        let mut index_a = 0;
        let mut index_b = 0;
        let mut disjoint = 0usize;
        let mut matching = 0usize;
        let mut weight_diff = 0.0;

        while index_a < a.genes.len() && index_b < b.genes.len() {
            let gene_a = &a.genes[index_a];
            let gene_b = &b.genes[index_b];

            if gene_a.innovation() == gene_b.innovation() {
                matching += 1;
                weight_diff += (gene_a.weight() - gene_b.weight()).abs();
                index_a += 1;
                index_b += 1;
            } else if gene_a.innovation() < gene_b.innovation() {
                disjoint += 1;
                index_a += 1;
            } else {
                disjoint += 1;
                index_b += 1;
            }
        }

        // The remaining genes only exist in one genome.
        let excess = (a.genes.len() - index_a) + (b.genes.len() - index_b);

        let weight_diff = weight_diff / matching.max(1) as f64;

        let mut n = a.genes.len().max(b.genes.len());
        if n < 20 {
            // Smaller genomes are penalized more for excess genes.
            n = 1;
        }

        config.excess_gene_factor * excess as f64 / n as f64
            + config.disjoint_gene_factor * disjoint as f64 / n as f64
            + config.common_weight_factor * weight_diff
    }

    /// Crosses over two genomes to create a new child genome.
    ///
    /// The child starts out empty (input and output nodes only)
    /// and is built purely from inheritance: genes present in
    /// both parents are taken from a uniformly random one, and
    /// genes present in a single parent are taken
    /// unconditionally. Inherited genes are cloned, and any
    /// endpoint node missing from the child is inserted along
    /// with them.
    ///
    /// Callers pass the higher-scoring parent as `a` by
    /// convention; the choice between matched genes is a fair
    /// coin flip regardless of argument order.
    pub fn crossover<R: Rng>(
        a: &Genome,
        b: &Genome,
        history: &mut History,
        rng: &mut R,
    ) -> Genome {
        let mut child = history.new_genome(true);

        let mut index_a = 0;
        let mut index_b = 0;
        while index_a < a.genes.len() && index_b < b.genes.len() {
            let gene_a = &a.genes[index_a];
            let gene_b = &b.genes[index_b];

            if gene_a.innovation() == gene_b.innovation() {
                child.inherit_gene(if rng.gen_bool(0.5) { gene_a } else { gene_b });
                index_a += 1;
                index_b += 1;
            } else if gene_a.innovation() < gene_b.innovation() {
                child.inherit_gene(gene_a);
                index_a += 1;
            } else {
                child.inherit_gene(gene_b);
                index_b += 1;
            }
        }

        for gene in &a.genes[index_a..] {
            child.inherit_gene(gene);
        }
        for gene in &b.genes[index_b..] {
            child.inherit_gene(gene);
        }

        child
    }

    /// Clones a parent's gene into the genome, inserting any
    /// endpoint node not yet present.
    fn inherit_gene(&mut self, gene: &Gene) {
        let (from, to) = gene.endpoints();
        self.insert_gene(gene.clone())
            .unwrap_or_else(|e| panic!("{} during crossover", e));
        if !self.contains_node(from) {
            self.insert_node(from)
                .unwrap_or_else(|e| panic!("{} during crossover", e));
        }
        if !self.contains_node(to) {
            self.insert_node(to)
                .unwrap_or_else(|e| panic!("{} during crossover", e));
        }
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Genome {{ nodes: {:?}, genes: [", self.nodes)?;
        for (i, gene) in self.genes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", gene)?;
        }
        write!(f, "] }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::num::NonZeroUsize;

    fn history(inputs: usize, outputs: usize) -> History {
        History::new(&GeneticConfig {
            input_count: NonZeroUsize::new(inputs).unwrap(),
            output_count: NonZeroUsize::new(outputs).unwrap(),
            ..GeneticConfig::zero()
        })
    }

    #[test]
    fn sequences_stay_sorted_and_unique() {
        let mut history = history(2, 2);
        let mut genome = history.new_genome(true);

        // Insert genes out of id order.
        let early = history.new_connection(0, 2).unwrap();
        let late = history.new_connection(1, 3).unwrap();
        genome.insert_gene(late).unwrap();
        genome.insert_gene(early).unwrap();

        let ids: Vec<_> = genome.genes().map(Gene::innovation).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));

        let node_ids: Vec<_> = genome.node_ids().collect();
        assert!(node_ids.windows(2).all(|w| w[0] < w[1]));

        // Duplicates are rejected and leave the genome unchanged.
        let duplicate = history.new_connection(0, 2).unwrap();
        assert_eq!(
            genome.insert_gene(duplicate),
            Err(GeneValidityError::DuplicateGeneID(0))
        );
        assert_eq!(genome.genes().count(), 2);
        assert_eq!(
            genome.insert_node(0),
            Err(NodeValidityError::DuplicateNodeID(0))
        );
    }

    #[test]
    fn distance_to_self_is_zero() {
        let config = GeneticConfig {
            input_count: NonZeroUsize::new(3).unwrap(),
            output_count: NonZeroUsize::new(2).unwrap(),
            ..GeneticConfig::default()
        };
        let mut history = History::new(&config);
        let genome = history.new_genome(false);

        assert_eq!(Genome::genetic_distance(&genome, &genome, &config), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let config = GeneticConfig {
            input_count: NonZeroUsize::new(2).unwrap(),
            output_count: NonZeroUsize::new(1).unwrap(),
            ..GeneticConfig::default()
        };
        let mut history = History::new(&config);

        let mut a = history.new_genome(false);
        let b = history.new_genome(false);

        // Give `a` extra structure and diverging weights.
        let gene = a.genes().next().unwrap().clone();
        let middle = history.replacement_node(&gene);
        a.insert_node(middle).unwrap();
        let incoming = history.new_connection(gene.input(), middle).unwrap();
        let outgoing = history.new_connection(middle, gene.output()).unwrap();
        a.insert_gene(incoming).unwrap();
        a.insert_gene(outgoing).unwrap();
        for gene in a.genes_mut() {
            gene.set_weight(0.75);
        }

        let ab = Genome::genetic_distance(&a, &b, &config);
        let ba = Genome::genetic_distance(&b, &a, &config);
        assert_eq!(ab, ba);
        assert!(ab > 0.0);
    }

    #[test]
    fn small_genomes_are_unnormalized() {
        let config = GeneticConfig {
            input_count: NonZeroUsize::new(2).unwrap(),
            output_count: NonZeroUsize::new(1).unwrap(),
            ..GeneticConfig::default()
        };
        let mut history = History::new(&config);

        let a = history.new_genome(false);
        let b = history.new_genome(true);

        // Both genes of `a` are excess with respect to `b`, and
        // n = max(2, 0) < 20 means no normalization at all.
        assert_eq!(
            Genome::genetic_distance(&a, &b, &config),
            config.excess_gene_factor * 2.0
        );
    }

    #[test]
    fn self_crossover_reproduces_connection_set() {
        let config = GeneticConfig {
            input_count: NonZeroUsize::new(2).unwrap(),
            output_count: NonZeroUsize::new(2).unwrap(),
            ..GeneticConfig::default()
        };
        let mut history = History::new(&config);
        let mut rng = StdRng::seed_from_u64(42);

        let mut genome = history.new_genome(false);
        for (i, gene) in genome.genes_mut().enumerate() {
            gene.set_weight(i as f64);
        }

        let child = Genome::crossover(&genome, &genome, &mut history, &mut rng);

        let parent_genes: Vec<_> = genome.genes().cloned().collect();
        let child_genes: Vec<_> = child.genes().cloned().collect();
        assert_eq!(parent_genes, child_genes);
        assert_eq!(
            genome.node_ids().collect::<Vec<_>>(),
            child.node_ids().collect::<Vec<_>>()
        );
    }

    #[test]
    fn serde_round_trip() {
        let mut history = history(2, 2);
        let mut genome = history.new_genome(false);
        for gene in genome.genes_mut() {
            gene.set_weight(0.5);
        }

        let json = serde_json::to_string(&genome).unwrap();
        let restored: Genome = serde_json::from_str(&json).unwrap();
        assert_eq!(genome, restored);
    }

    #[test]
    fn crossover_inherits_unmatched_genes_unconditionally() {
        let config = GeneticConfig {
            input_count: NonZeroUsize::new(2).unwrap(),
            output_count: NonZeroUsize::new(1).unwrap(),
            ..GeneticConfig::default()
        };
        let mut history = History::new(&config);
        let mut rng = StdRng::seed_from_u64(7);

        let mut a = history.new_genome(false);
        let b = history.new_genome(false);

        // Split a gene in `a` only: the replacement node and both
        // split genes exist solely in that lineage.
        let gene = a.genes().next().unwrap().clone();
        let middle = history.replacement_node(&gene);
        a.insert_node(middle).unwrap();
        let incoming = history.new_connection(gene.input(), middle).unwrap();
        let outgoing = history.new_connection(middle, gene.output()).unwrap();
        a.insert_gene(incoming.clone()).unwrap();
        a.insert_gene(outgoing.clone()).unwrap();

        let child = Genome::crossover(&a, &b, &mut history, &mut rng);

        assert!(child
            .genes()
            .any(|g| g.innovation() == incoming.innovation()));
        assert!(child
            .genes()
            .any(|g| g.innovation() == outgoing.innovation()));
        assert!(child.contains_node(middle));
        assert_eq!(child.genes().count(), 4);
    }
}
