use crate::Innovation;

use serde::{Deserialize, Serialize};

use std::fmt;

/// Genes are the principal components of genomes.
/// They are created between two nodes, and become
/// network connections in the genome's phenotype.
///
/// The canonical instance for each structural endpoint
/// pair is owned by the [`History`]; genomes only ever
/// hold value copies issued by it, so mutating one
/// genome's weight or suppression status never affects
/// another's.
///
/// [`History`]: crate::genomics::History
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Gene {
    id: Innovation,
    input: Innovation,
    output: Innovation,
    weight: f64,
    suppressed: bool,
}

impl Gene {
    /// Returns a new _unsuppressed_ gene with the specified
    /// endpoints and a weight of 0.
    pub(crate) fn new(id: Innovation, input: Innovation, output: Innovation) -> Gene {
        Gene {
            id,
            input,
            output,
            weight: 0.0,
            suppressed: false,
        }
    }

    /// Returns the gene's innovation number.
    pub fn innovation(&self) -> Innovation {
        self.id
    }

    /// Returns the gene's input node's innovation number.
    pub fn input(&self) -> Innovation {
        self.input
    }

    /// Returns the gene's output node's innovation number.
    pub fn output(&self) -> Innovation {
        self.output
    }

    /// Returns the gene's weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Sets the gene's weight.
    pub fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }

    /// Returns the gene's suppression status. Suppressed
    /// genes are kept in the genome for historical alignment
    /// but are meant not to influence the phenotype.
    pub fn suppressed(&self) -> bool {
        self.suppressed
    }

    /// Sets the gene's suppression status.
    pub fn set_suppressed(&mut self, suppression: bool) {
        self.suppressed = suppression;
    }

    /// Returns the gene's input and output's innovation numbers.
    pub fn endpoints(&self) -> (Innovation, Innovation) {
        (self.input, self.output)
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:?}[{:?}->{:?}, {:.3}]{}",
            if self.suppressed { "(" } else { "" },
            self.id,
            self.input,
            self.output,
            self.weight,
            if self.suppressed { ")" } else { "" },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_gene_is_unsuppressed_with_zero_weight() {
        let gene = Gene::new(42, 3, 9);

        assert_eq!(gene.innovation(), 42);
        assert_eq!(gene.endpoints(), (3, 9));
        assert_eq!(gene.weight(), 0.0);
        assert!(!gene.suppressed());
    }

    #[test]
    fn set_weight_and_suppression() {
        let mut gene = Gene::new(42, 3, 9);

        gene.set_weight(-2.5);
        gene.set_suppressed(true);

        assert_eq!(gene.weight(), -2.5);
        assert!(gene.suppressed());
    }
}
