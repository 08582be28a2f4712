//! Topology graph view.
//!
//! `TopologyView` is the read-only query surface the rule engine and the
//! lab checker work against. `Topology` is the owned snapshot that backs it
//! when the graph is loaded from a document or built in tests.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::types::{Connection, ConnectionMetadata, Link, Node, NodeId, NodeType};

/// Errors raised while reading or editing a topology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum TopologyError {
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),
    #[error("Duplicate node id: {0}")]
    DuplicateNode(NodeId),
    #[error("Connection {from} <-> {to} references a missing node")]
    DanglingConnection { from: NodeId, to: NodeId },
    #[error("A {requested} cannot be connected to {anchor} ({anchor_type})")]
    IncompatibleNodeType {
        anchor: NodeId,
        anchor_type: NodeType,
        requested: NodeType,
    },
    #[error("Topology unavailable: {0}")]
    Unavailable(String),
}

/// Read-only query surface over the current nodes and connections
pub trait TopologyView {
    /// Nodes adjacent to `id`, one entry per incident connection
    fn neighbors_of(&self, id: &NodeId) -> Result<Vec<Node>, TopologyError>;

    /// All nodes in the topology
    fn all_nodes(&self) -> Result<Vec<Node>, TopologyError>;

    /// All connections, resolved to their endpoint nodes
    fn all_connections(&self) -> Result<Vec<Link>, TopologyError>;

    /// Number of connections incident to `id`
    fn degree_of(&self, id: &NodeId) -> Result<usize, TopologyError> {
        Ok(self.neighbors_of(id)?.len())
    }
}

/// Owned snapshot of a topology
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a node by id
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Add a node, rejecting duplicate ids
    pub fn add_node(&mut self, node: Node) -> Result<(), TopologyError> {
        if self.contains(&node.id) {
            return Err(TopologyError::DuplicateNode(node.id));
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Connect two existing nodes
    pub fn connect(&mut self, from: &NodeId, to: &NodeId) -> Result<(), TopologyError> {
        self.connect_with(from, to, ConnectionMetadata::default())
    }

    /// Connect two existing nodes, keeping the given link attributes
    pub fn connect_with(
        &mut self,
        from: &NodeId,
        to: &NodeId,
        metadata: ConnectionMetadata,
    ) -> Result<(), TopologyError> {
        for id in [from, to] {
            if !self.contains(id) {
                return Err(TopologyError::UnknownNode(id.clone()));
            }
        }
        self.connections.push(Connection {
            from: from.clone(),
            to: to.clone(),
            metadata,
        });
        Ok(())
    }

    /// Remove every connection between `a` and `b`, returning how many were removed
    pub fn disconnect(&mut self, a: &NodeId, b: &NodeId) -> usize {
        let before = self.connections.len();
        self.connections
            .retain(|c| !(c.touches(a) && c.other_end(a) == Some(b)));
        before - self.connections.len()
    }

    /// Remove a node together with its incident connections
    pub fn remove_node(&mut self, id: &NodeId) -> Result<Node, TopologyError> {
        let index = self
            .nodes
            .iter()
            .position(|n| &n.id == id)
            .ok_or_else(|| TopologyError::UnknownNode(id.clone()))?;
        self.connections.retain(|c| !c.touches(id));
        Ok(self.nodes.remove(index))
    }

    /// Count of nodes per type
    pub fn type_counts(&self) -> HashMap<NodeType, usize> {
        let mut counts = HashMap::new();
        for node in &self.nodes {
            *counts.entry(node.node_type.clone()).or_insert(0) += 1;
        }
        counts
    }

    fn resolve(&self, connection: &Connection) -> Result<Link, TopologyError> {
        match (self.node(&connection.from), self.node(&connection.to)) {
            (Some(from), Some(to)) => Ok(Link {
                from: from.clone(),
                to: to.clone(),
            }),
            _ => Err(TopologyError::DanglingConnection {
                from: connection.from.clone(),
                to: connection.to.clone(),
            }),
        }
    }
}

impl TopologyView for Topology {
    fn neighbors_of(&self, id: &NodeId) -> Result<Vec<Node>, TopologyError> {
        if !self.contains(id) {
            return Err(TopologyError::UnknownNode(id.clone()));
        }

        let mut neighbors = Vec::new();
        for connection in self.connections.iter().filter(|c| c.touches(id)) {
            let link = self.resolve(connection)?;
            // Self loops report the node once
            let other = if &link.from.id == id { link.to } else { link.from };
            neighbors.push(other);
        }
        Ok(neighbors)
    }

    fn all_nodes(&self) -> Result<Vec<Node>, TopologyError> {
        Ok(self.nodes.clone())
    }

    fn all_connections(&self) -> Result<Vec<Link>, TopologyError> {
        self.connections.iter().map(|c| self.resolve(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    fn sample() -> Topology {
        let mut topology = Topology::new();
        topology.add_node(Node::new("h1", NodeType::ClassicalHost)).unwrap();
        topology.add_node(Node::new("r1", NodeType::ClassicalRouter)).unwrap();
        topology.add_node(Node::new("qa1", NodeType::QuantumAdapter)).unwrap();
        topology.connect(&id("h1"), &id("r1")).unwrap();
        topology.connect(&id("h1"), &id("qa1")).unwrap();
        topology
    }

    #[test]
    fn test_neighbors_and_degree() {
        let topology = sample();
        let neighbors: Vec<NodeId> = topology
            .neighbors_of(&id("h1"))
            .unwrap()
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(neighbors, vec![id("r1"), id("qa1")]);
        assert_eq!(topology.degree_of(&id("h1")).unwrap(), 2);
        assert_eq!(topology.degree_of(&id("qa1")).unwrap(), 1);
    }

    #[test]
    fn test_parallel_connections_count_twice() {
        let mut topology = sample();
        topology.connect(&id("h1"), &id("r1")).unwrap();
        assert_eq!(topology.degree_of(&id("r1")).unwrap(), 2);
        assert_eq!(topology.disconnect(&id("r1"), &id("h1")), 2);
        assert_eq!(topology.degree_of(&id("r1")).unwrap(), 0);
    }

    #[test]
    fn test_duplicate_and_unknown_nodes() {
        let mut topology = sample();
        assert_eq!(
            topology.add_node(Node::new("h1", NodeType::QuantumHost)),
            Err(TopologyError::DuplicateNode(id("h1")))
        );
        assert_eq!(
            topology.connect(&id("h1"), &id("missing")),
            Err(TopologyError::UnknownNode(id("missing")))
        );
        assert!(matches!(
            topology.neighbors_of(&id("missing")),
            Err(TopologyError::UnknownNode(_))
        ));
    }

    #[test]
    fn test_dangling_connection_fails_reads() {
        let mut topology = sample();
        topology.connections.push(Connection::new("h1", "ghost"));
        assert!(matches!(
            topology.all_connections(),
            Err(TopologyError::DanglingConnection { .. })
        ));
        assert!(topology.neighbors_of(&id("h1")).is_err());
        // Nodes not touching the bad edge are still readable
        assert_eq!(topology.degree_of(&id("qa1")).unwrap(), 1);
    }

    #[test]
    fn test_remove_node_drops_connections() {
        let mut topology = sample();
        let removed = topology.remove_node(&id("h1")).unwrap();
        assert_eq!(removed.node_type, NodeType::ClassicalHost);
        assert!(topology.connections.is_empty());
        assert_eq!(topology.degree_of(&id("r1")).unwrap(), 0);
        assert!(topology.remove_node(&id("h1")).is_err());
    }

    #[test]
    fn test_type_counts() {
        let counts = sample().type_counts();
        assert_eq!(counts.get(&NodeType::ClassicalHost), Some(&1));
        assert_eq!(counts.get(&NodeType::QuantumHost), None);
    }
}
