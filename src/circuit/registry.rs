//! Node name to index resolution.
//!
//! Nodes are resolved through a [`NodeRegistryBuilder`] while elements are
//! being added, then frozen into an immutable [`NodeRegistry`] before any
//! simulation runs.

use std::collections::HashMap;

use super::types::{Node, NodeId};

/// Growing map from node names to sequential indices.
#[derive(Debug, Clone)]
pub struct NodeRegistryBuilder {
    node_map: HashMap<String, NodeId>,
    node_names: Vec<String>,
}

impl Default for NodeRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeRegistryBuilder {
    /// Create a builder with only ground registered.
    pub fn new() -> Self {
        let mut node_map = HashMap::new();
        node_map.insert(NodeId::GROUND_NAME.to_string(), NodeId::GROUND);
        Self {
            node_map,
            node_names: vec![NodeId::GROUND_NAME.to_string()],
        }
    }

    /// Return the node for `name`, allocating the next index on first use.
    pub fn resolve(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.node_map.get(name) {
            return id;
        }
        let id = NodeId(self.node_names.len());
        self.node_map.insert(name.to_string(), id);
        self.node_names.push(name.to_string());
        id
    }

    /// Number of nodes registered so far, ground included.
    pub fn len(&self) -> usize {
        self.node_names.len()
    }

    /// Always false: ground is pre-registered.
    pub fn is_empty(&self) -> bool {
        self.node_names.is_empty()
    }

    /// Freeze into an immutable registry.
    pub fn freeze(self) -> NodeRegistry {
        NodeRegistry {
            node_map: self.node_map,
            node_names: self.node_names,
        }
    }
}

/// Immutable node registry of a built circuit.
#[derive(Debug, Clone)]
pub struct NodeRegistry {
    node_map: HashMap<String, NodeId>,
    node_names: Vec<String>,
}

impl NodeRegistry {
    /// Look up a node by name.
    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.node_map.get(name).copied()
    }

    /// Name of a node.
    pub fn name(&self, id: NodeId) -> &str {
        &self.node_names[id.0]
    }

    /// Number of nodes, ground included.
    pub fn len(&self) -> usize {
        self.node_names.len()
    }

    /// Always false: ground is pre-registered.
    pub fn is_empty(&self) -> bool {
        self.node_names.is_empty()
    }

    /// All nodes in index order.
    pub fn iter(&self) -> impl Iterator<Item = Node> + '_ {
        self.node_names.iter().enumerate().map(|(i, name)| Node {
            id: NodeId(i),
            name: name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_is_preregistered() {
        let mut builder = NodeRegistryBuilder::new();
        assert_eq!(builder.len(), 1);
        assert_eq!(builder.resolve("0"), NodeId::GROUND);
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn test_indices_are_sequential_and_stable() {
        let mut builder = NodeRegistryBuilder::new();
        assert_eq!(builder.resolve("in"), NodeId(1));
        assert_eq!(builder.resolve("out"), NodeId(2));
        assert_eq!(builder.resolve("in"), NodeId(1));
        assert_eq!(builder.resolve("mid"), NodeId(3));

        let registry = builder.freeze();
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.get("out"), Some(NodeId(2)));
        assert_eq!(registry.get("missing"), None);
        assert_eq!(registry.name(NodeId(3)), "mid");

        let indices: Vec<usize> = registry.iter().map(|n| n.id.0).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }
}
