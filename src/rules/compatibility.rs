//! Compatibility rules.
//!
//! Decides which node types may be connected to a node next, given the
//! neighbors it already has. The classical layer (hosts, routers) is open
//! ended; the quantum side has strict two-port semantics and the adapter is
//! the only bridge between the two layers.

use crate::topology::{Node, NodeId, NodeType, Position, Topology, TopologyError, TopologyView};

/// Offer order for the quick-add menu
const OFFER_ORDER: [NodeType; 5] = [
    NodeType::ClassicalHost,
    NodeType::ClassicalRouter,
    NodeType::QuantumAdapter,
    NodeType::QuantumHost,
    NodeType::QuantumRepeater,
];

/// Port limit shared by adapters, quantum hosts and repeaters
pub const QUANTUM_PORT_LIMIT: usize = 2;

/// Node types that may legally be connected to `node` next
///
/// Pure function of the current graph state. An empty result means the
/// quick-add menu should be hidden. Errors raised by `view` are logged and
/// degrade to the empty result.
///
/// # Arguments
/// * `node` - The node the user is hovering or clicking
/// * `view` - Read access to the current topology
pub fn compatible_next_types<V: TopologyView + ?Sized>(node: &Node, view: &V) -> Vec<NodeType> {
    match allowed_next_types(node, view) {
        Ok(allowed) => OFFER_ORDER
            .into_iter()
            .filter(|t| allowed.contains(t))
            .collect(),
        Err(e) => {
            log::warn!("Cannot evaluate next node types for '{}': {}", node.id, e);
            Vec::new()
        }
    }
}

fn allowed_next_types<V: TopologyView + ?Sized>(
    node: &Node,
    view: &V,
) -> Result<Vec<NodeType>, TopologyError> {
    let allowed = match node.node_type {
        NodeType::ClassicalHost | NodeType::ClassicalRouter => vec![
            NodeType::ClassicalHost,
            NodeType::ClassicalRouter,
            NodeType::QuantumAdapter,
        ],
        NodeType::QuantumAdapter => {
            let neighbors = view.neighbors_of(&node.id)?;
            if neighbors.len() >= QUANTUM_PORT_LIMIT {
                return Ok(Vec::new());
            }
            let has_classical = neighbors.iter().any(|n| n.node_type.is_classical());
            let has_quantum = neighbors.iter().any(|n| n.node_type == NodeType::QuantumHost);
            match (has_classical, has_quantum) {
                (true, false) => vec![NodeType::QuantumHost],
                (false, true) => vec![NodeType::ClassicalHost, NodeType::ClassicalRouter],
                _ => vec![
                    NodeType::ClassicalHost,
                    NodeType::ClassicalRouter,
                    NodeType::QuantumHost,
                ],
            }
        }
        NodeType::QuantumHost => {
            let neighbors = view.neighbors_of(&node.id)?;
            if neighbors.len() >= QUANTUM_PORT_LIMIT {
                return Ok(Vec::new());
            }
            let has_adapter = neighbors.iter().any(|n| n.node_type == NodeType::QuantumAdapter);
            let has_quantum_link = neighbors.iter().any(|n| n.node_type.is_quantum_link_end());
            match (has_adapter, has_quantum_link) {
                (true, false) => vec![NodeType::QuantumHost, NodeType::QuantumRepeater],
                (false, true) => vec![NodeType::QuantumAdapter],
                _ => vec![
                    NodeType::QuantumAdapter,
                    NodeType::QuantumHost,
                    NodeType::QuantumRepeater,
                ],
            }
        }
        NodeType::QuantumRepeater => {
            if view.degree_of(&node.id)? >= QUANTUM_PORT_LIMIT {
                return Ok(Vec::new());
            }
            vec![NodeType::QuantumHost, NodeType::QuantumRepeater]
        }
        NodeType::QuantumNetwork
        | NodeType::ClassicalNetwork
        | NodeType::Zone
        | NodeType::InternetExchange
        | NodeType::C2QConverter
        | NodeType::Q2CConverter
        | NodeType::Unrecognized(_) => Vec::new(),
    };
    Ok(allowed)
}

/// Quick add: create a node of `node_type` connected to `anchor`
///
/// The new node is only created when `node_type` is currently offered for
/// the anchor. Its id is `<snake_tag>-<n>` with the smallest free `n`.
///
/// # Returns
/// The id of the created node
pub fn quick_add_node(
    topology: &mut Topology,
    anchor: &NodeId,
    node_type: NodeType,
    position: Position,
) -> Result<NodeId, TopologyError> {
    let anchor_node = topology
        .node(anchor)
        .cloned()
        .ok_or_else(|| TopologyError::UnknownNode(anchor.clone()))?;

    if !compatible_next_types(&anchor_node, &*topology).contains(&node_type) {
        return Err(TopologyError::IncompatibleNodeType {
            anchor: anchor.clone(),
            anchor_type: anchor_node.node_type,
            requested: node_type,
        });
    }

    let id = next_free_id(topology, &node_type);
    log::debug!("Quick-adding {} '{}' connected to '{}'", node_type, id, anchor);
    topology.add_node(Node {
        id: id.clone(),
        ..Node::new("", node_type).with_position(position)
    })?;
    topology.connect(anchor, &id)?;
    Ok(id)
}

fn next_free_id(topology: &Topology, node_type: &NodeType) -> NodeId {
    (1..)
        .map(|n| NodeId(format!("{}-{}", node_type.snake_tag(), n)))
        .find(|candidate| !topology.contains(candidate))
        .unwrap_or_else(|| NodeId(node_type.snake_tag().to_string()))
}
