//! Placement strategy: round-robin over a fixed node list
//!
//! The node for an upload is chosen from the slot reserved in the metadata
//! store, which is the number of files already placed (plus uploads still in
//! flight). All selection policy lives here so it can be swapped without
//! touching the request lifecycle.

use crate::common::{Node, Result};

/// PlacementManager picks the node for each new upload.
#[derive(Debug, Clone)]
pub struct PlacementManager {
    nodes: Vec<Node>,
}

impl PlacementManager {
    pub fn new(nodes: Vec<Node>) -> Result<Self> {
        if nodes.is_empty() {
            return Err(crate::Error::InvalidConfig(
                "at least one storage node is required".into(),
            ));
        }
        Ok(Self { nodes })
    }

    /// Node for the given placement slot: `slot mod node count`
    pub fn next_node(&self, slot: usize) -> &Node {
        &self.nodes[slot % self.nodes.len()]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}
