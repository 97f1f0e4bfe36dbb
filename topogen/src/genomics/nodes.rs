use crate::Innovation;

use serde::{Deserialize, Serialize};

use std::fmt;

/// Nodes are the structural elements of genomes
/// between which genes are created.
///
/// A node's position defines the feed-forward ordering:
/// genes may only be created from a lower-x node to a
/// strictly higher-x one, which keeps every genome
/// acyclic. Node roles (input, output, hidden) are not
/// stored; they are derived from the node's id by the
/// owning [`History`].
///
/// Nodes are created once and shared by all genomes that
/// include them, so a bias mutation through one genome is
/// observed by every genome holding the same node.
///
/// [`History`]: crate::genomics::History
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Node {
    id: Innovation,
    bias: f64,
    x: f64,
    y: f64,
}

impl Node {
    /// Returns a new node at the given position, with a bias of 0.
    pub(crate) fn new(id: Innovation, x: f64, y: f64) -> Node {
        Node {
            id,
            bias: 0.0,
            x,
            y,
        }
    }

    /// Returns the node's innovation number.
    pub fn innovation(&self) -> Innovation {
        self.id
    }

    /// Returns the node's horizontal position.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Returns the node's vertical position.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Returns the node's bias.
    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Sets the node's bias.
    pub fn set_bias(&mut self, bias: f64) {
        self.bias = bias;
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}[({:.2}, {:.2}), bias {:.3}]",
            self.id, self.x, self.y, self.bias
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_node_has_zero_bias() {
        let node = Node::new(5, 0.5, 0.25);

        assert_eq!(node.innovation(), 5);
        assert_eq!(node.x(), 0.5);
        assert_eq!(node.y(), 0.25);
        assert_eq!(node.bias(), 0.0);
    }
}
