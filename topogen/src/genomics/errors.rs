use crate::Innovation;

use std::error::Error;
use std::fmt;

/// An error type indicating the gene being created
/// or added is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneValidityError {
    /// The gene's ID is a duplicate within the genome.
    DuplicateGeneID(Innovation),
    /// The gene's endpoints do not flow left-to-right:
    /// the input node's x position is not strictly lesser
    /// than the output node's.
    NonForwardEndpoints(Innovation, Innovation),
}

/// An error type indicating the node being added
/// is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeValidityError {
    /// The node's ID is a duplicate within the genome.
    DuplicateNodeID(Innovation),
}

impl fmt::Display for GeneValidityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateGeneID(gene_id) => {
                write!(f, "duplicate gene insertion with id {}", gene_id)
            }
            Self::NonForwardEndpoints(input, output) => write!(
                f,
                "gene creation between non-forward endpoints {} -> {}",
                input, output
            ),
        }
    }
}

impl fmt::Display for NodeValidityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateNodeID(id) => write!(f, "duplicate node insertion with id {}", id),
        }
    }
}

impl Error for GeneValidityError {}
impl Error for NodeValidityError {}
