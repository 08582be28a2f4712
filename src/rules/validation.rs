//! Static topology validation.
//!
//! Checks a complete topology (typically imported or generated) against the
//! wiring rules of a hybrid quantum/classical network:
//!
//! 1. Component integrity: only the five buildable node types, and adapters
//!    name both networks they bridge.
//! 2. Layer separation: classical nodes never touch the quantum link layer
//!    directly, adapters never touch each other.
//! 3. Port constraints: quantum hosts, adapters and repeaters have exactly
//!    two connections of the right kinds.
//! 4. Termination: every quantum-side node reaches a classical host.
//!
//! Checks 2-4 only run when check 1 passes.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::topology::{Link, Node, NodeId, NodeType, TopologyError, TopologyView};

use super::compatibility::QUANTUM_PORT_LIMIT;

/// A single rule violation found by the static validator
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
pub enum TopologyIssue {
    #[error("Node '{node}' has invalid type '{node_type}'.")]
    InvalidType { node: String, node_type: NodeType },
    #[error("Adapter '{adapter}' is missing network config (needs classical_network & quantum_network).")]
    AdapterMissingNetworks { adapter: String },
    #[error("Physics Violation: Classical '{classical}' connected directly to Quantum '{quantum}'.")]
    LayerViolation { classical: String, quantum: String },
    #[error("Logic Error: Direct Adapter-to-Adapter connection between '{first}' and '{second}'.")]
    AdapterToAdapter { first: String, second: String },
    #[error("Port Error: {} '{node}' has {degree} connections. Must be exactly 2.", .node_type.display_name())]
    PortCount { node: String, node_type: NodeType, degree: usize },
    #[error("Wiring Error: Quantum Host '{node}' must have exactly 1 Adapter connection, but has {count}.")]
    HostAdapterCount { node: String, count: usize },
    #[error("Wiring Error: Quantum Host '{node}' must have exactly 1 quantum link connection (to QuantumHost or QuantumRepeater), but has {count}.")]
    HostQuantumLinkCount { node: String, count: usize },
    #[error("Wiring Error: Adapter '{node}' must connect to 1 Classical and 1 Quantum node.")]
    AdapterWiring { node: String },
    #[error("Termination Error: Node '{node}' is isolated. Cannot reach a Classical Host.")]
    Unterminated { node: String },
    #[error("Topology could not be read: {0}")]
    Unreadable(TopologyError),
}

/// Outcome of validating a whole topology
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub topology_name: String,
    pub is_valid: bool,
    pub issues: Vec<TopologyIssue>,
}

impl ValidationReport {
    /// Issue messages in the order they were found
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(|i| i.to_string()).collect()
    }
}

/// Validate a topology against all static wiring rules
///
/// # Arguments
/// * `view` - The topology to validate
/// * `topology_name` - Name reported back in the result
///
/// # Returns
/// A report; `is_valid` is true only when no issue was found. A view that
/// cannot be read yields a single `Unreadable` issue.
///
/// # Examples
/// ```
/// use quintet::rules::validate_static_topology;
/// use quintet::topology::{Node, NodeType, Topology};
///
/// let mut topology = Topology::new();
/// topology.add_node(Node::new("alice", NodeType::ClassicalHost)).unwrap();
/// assert!(validate_static_topology(&topology, "lab").is_valid);
/// ```
pub fn validate_static_topology<V: TopologyView + ?Sized>(
    view: &V,
    topology_name: &str,
) -> ValidationReport {
    let issues = match collect_issues(view) {
        Ok(issues) => dedup_preserving_order(issues),
        Err(e) => {
            log::warn!("Validation of '{}' aborted: {}", topology_name, e);
            vec![TopologyIssue::Unreadable(e)]
        }
    };

    if issues.is_empty() {
        log::info!("Topology '{}' passed static validation", topology_name);
    } else {
        log::info!("Topology '{}' has {} validation issue(s)", topology_name, issues.len());
    }

    ValidationReport {
        topology_name: topology_name.to_string(),
        is_valid: issues.is_empty(),
        issues,
    }
}

fn collect_issues<V: TopologyView + ?Sized>(view: &V) -> Result<Vec<TopologyIssue>, TopologyError> {
    let nodes = view.all_nodes()?;
    let links = view.all_connections()?;

    let mut issues = check_node_types(&nodes);
    // Graph checks only make sense once every component is known
    if issues.is_empty() {
        let adjacency = Adjacency::build(&links);
        issues.extend(check_layer_separation(&links));
        issues.extend(check_port_constraints(&nodes, &adjacency));
        issues.extend(check_termination(&nodes, &adjacency));
    }
    Ok(issues)
}

/// Neighbor lists resolved once per validation run
struct Adjacency<'a> {
    neighbors: HashMap<&'a NodeId, Vec<&'a Node>>,
}

impl<'a> Adjacency<'a> {
    /// One entry per incident link; a self loop lists the node once
    fn build(links: &'a [Link]) -> Self {
        let mut neighbors: HashMap<&'a NodeId, Vec<&'a Node>> = HashMap::new();
        for link in links {
            neighbors.entry(&link.from.id).or_default().push(&link.to);
            if link.from.id != link.to.id {
                neighbors.entry(&link.to.id).or_default().push(&link.from);
            }
        }
        Self { neighbors }
    }

    fn of(&self, id: &NodeId) -> &[&'a Node] {
        self.neighbors.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every node connected to `start`, `start` included
    fn component_of(&self, start: &'a Node) -> Vec<&'a Node> {
        let mut seen: HashSet<&NodeId> = HashSet::from([&start.id]);
        let mut stack = vec![start];
        let mut members = Vec::new();

        while let Some(node) = stack.pop() {
            members.push(node);
            for &next in self.of(&node.id) {
                if seen.insert(&next.id) {
                    stack.push(next);
                }
            }
        }
        members
    }
}

/// Component integrity: valid types, adapters configured for both networks
pub fn check_node_types(nodes: &[Node]) -> Vec<TopologyIssue> {
    let mut issues = Vec::new();
    for node in nodes {
        if !node.node_type.is_governed() {
            issues.push(TopologyIssue::InvalidType {
                node: node.label().to_string(),
                node_type: node.node_type.clone(),
            });
        }
        if node.node_type == NodeType::QuantumAdapter {
            let configured = |n: &Option<String>| n.as_deref().map_or(false, |s| !s.is_empty());
            if !configured(&node.classical_network) || !configured(&node.quantum_network) {
                issues.push(TopologyIssue::AdapterMissingNetworks {
                    adapter: node.label().to_string(),
                });
            }
        }
    }
    issues
}

/// Layer separation, checked once per connection
pub fn check_layer_separation(links: &[Link]) -> Vec<TopologyIssue> {
    let mut issues = Vec::new();
    for link in links {
        let (a, b) = (&link.from, &link.to);
        for (u, v) in [(a, b), (b, a)] {
            if u.node_type.is_classical() && v.node_type.is_quantum_link_end() {
                issues.push(TopologyIssue::LayerViolation {
                    classical: u.label().to_string(),
                    quantum: v.label().to_string(),
                });
            }
        }
        if a.node_type == NodeType::QuantumAdapter && b.node_type == NodeType::QuantumAdapter {
            issues.push(TopologyIssue::AdapterToAdapter {
                first: a.label().to_string(),
                second: b.label().to_string(),
            });
        }
    }
    issues
}

/// Two-port rules for quantum hosts, adapters and repeaters
fn check_port_constraints(nodes: &[Node], adjacency: &Adjacency<'_>) -> Vec<TopologyIssue> {
    let mut issues = Vec::new();

    for node in nodes {
        let node_type = &node.node_type;
        if !matches!(
            node_type,
            NodeType::QuantumHost | NodeType::QuantumAdapter | NodeType::QuantumRepeater
        ) {
            continue;
        }

        let neighbors = adjacency.of(&node.id);
        let degree = neighbors.len();
        let label = node.label().to_string();

        if degree != QUANTUM_PORT_LIMIT {
            issues.push(TopologyIssue::PortCount {
                node: label,
                node_type: node_type.clone(),
                degree,
            });
            continue;
        }

        match node_type {
            NodeType::QuantumHost => {
                let adapters = neighbors
                    .iter()
                    .filter(|n| n.node_type == NodeType::QuantumAdapter)
                    .count();
                let links = neighbors
                    .iter()
                    .filter(|n| n.node_type.is_quantum_link_end())
                    .count();
                if adapters != 1 {
                    issues.push(TopologyIssue::HostAdapterCount { node: label.clone(), count: adapters });
                }
                if links != 1 {
                    issues.push(TopologyIssue::HostQuantumLinkCount { node: label, count: links });
                }
            }
            NodeType::QuantumAdapter => {
                let has_classical = neighbors.iter().any(|n| n.node_type.is_classical());
                let has_quantum = neighbors.iter().any(|n| n.node_type == NodeType::QuantumHost);
                if !(has_classical && has_quantum) {
                    issues.push(TopologyIssue::AdapterWiring { node: label });
                }
            }
            _ => {}
        }
    }

    issues
}

/// Every quantum-side node must eventually reach a classical host.
/// Each connected component is searched once.
fn check_termination<'a>(nodes: &'a [Node], adjacency: &Adjacency<'a>) -> Vec<TopologyIssue> {
    let mut terminated: HashMap<&'a NodeId, bool> = HashMap::new();
    let mut issues = Vec::new();

    for node in nodes {
        let quantum_side =
            node.node_type.is_quantum_link_end() || node.node_type == NodeType::QuantumAdapter;
        if !quantum_side {
            continue;
        }

        let reaches_host = match terminated.get(&node.id) {
            Some(&known) => known,
            None => {
                let component = adjacency.component_of(node);
                let found = component.iter().any(|n| n.node_type == NodeType::ClassicalHost);
                for member in component {
                    terminated.insert(&member.id, found);
                }
                found
            }
        };

        if !reaches_host {
            issues.push(TopologyIssue::Unterminated {
                node: node.label().to_string(),
            });
        }
    }
    issues
}

fn dedup_preserving_order(issues: Vec<TopologyIssue>) -> Vec<TopologyIssue> {
    let mut unique: Vec<TopologyIssue> = Vec::with_capacity(issues.len());
    for issue in issues {
        if !unique.contains(&issue) {
            unique.push(issue);
        }
    }
    unique
}
