//! Reachability queries over a topology view.

use std::collections::{HashMap, HashSet, VecDeque};

use super::graph::{TopologyError, TopologyView};
use super::types::{NodeId, NodeType};

/// Breadth-first search for the shortest path between two nodes
///
/// # Returns
/// * `Ok(Some(path))` with both endpoints included; `[from]` when `from == to`
/// * `Ok(None)` if `to` cannot be reached
/// * `Err` if either endpoint is unknown or the view could not be read
pub fn shortest_path<V: TopologyView + ?Sized>(
    view: &V,
    from: &NodeId,
    to: &NodeId,
) -> Result<Option<Vec<NodeId>>, TopologyError> {
    // Both endpoints must exist, even when no search is needed
    view.neighbors_of(from)?;
    view.neighbors_of(to)?;

    if from == to {
        return Ok(Some(vec![from.clone()]));
    }

    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut queue: VecDeque<Vec<NodeId>> = VecDeque::new();
    visited.insert(from.clone());
    queue.push_back(vec![from.clone()]);

    while let Some(path) = queue.pop_front() {
        let current = &path[path.len() - 1];
        for neighbor in view.neighbors_of(current)? {
            if &neighbor.id == to {
                let mut found = path.clone();
                found.push(neighbor.id);
                return Ok(Some(found));
            }
            if visited.insert(neighbor.id.clone()) {
                let mut next = path.clone();
                next.push(neighbor.id);
                queue.push_back(next);
            }
        }
    }

    Ok(None)
}

/// Depth-first search: can `start` reach any node of `target` type?
///
/// The start node itself counts.
pub fn can_reach_type<V: TopologyView + ?Sized>(
    view: &V,
    start: &NodeId,
    target: &NodeType,
) -> Result<bool, TopologyError> {
    let types: HashMap<NodeId, NodeType> = view
        .all_nodes()?
        .into_iter()
        .map(|n| (n.id, n.node_type))
        .collect();

    let mut stack = vec![start.clone()];
    let mut visited: HashSet<NodeId> = HashSet::new();

    while let Some(current) = stack.pop() {
        if !visited.insert(current.clone()) {
            continue;
        }
        match types.get(&current) {
            Some(t) if t == target => return Ok(true),
            Some(_) => {}
            None => return Err(TopologyError::UnknownNode(current)),
        }
        for neighbor in view.neighbors_of(&current)? {
            if !visited.contains(&neighbor.id) {
                stack.push(neighbor.id);
            }
        }
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{Node, Topology};

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    /// alice - qa_alice - q_alice - repeater - q_bob, plus an isolated q_carol
    fn chain() -> Topology {
        let mut topology = Topology::new();
        for (name, node_type) in [
            ("alice", NodeType::ClassicalHost),
            ("qa_alice", NodeType::QuantumAdapter),
            ("q_alice", NodeType::QuantumHost),
            ("repeater", NodeType::QuantumRepeater),
            ("q_bob", NodeType::QuantumHost),
            ("q_carol", NodeType::QuantumHost),
        ] {
            topology.add_node(Node::new(name, node_type)).unwrap();
        }
        for (a, b) in [
            ("alice", "qa_alice"),
            ("qa_alice", "q_alice"),
            ("q_alice", "repeater"),
            ("repeater", "q_bob"),
        ] {
            topology.connect(&id(a), &id(b)).unwrap();
        }
        topology
    }

    #[test]
    fn test_shortest_path() {
        let topology = chain();
        let path = shortest_path(&topology, &id("alice"), &id("q_bob")).unwrap().unwrap();
        assert_eq!(
            path,
            vec![id("alice"), id("qa_alice"), id("q_alice"), id("repeater"), id("q_bob")]
        );
    }

    #[test]
    fn test_shortest_path_prefers_fewer_hops() {
        let mut topology = chain();
        topology.connect(&id("q_alice"), &id("q_bob")).unwrap();
        let path = shortest_path(&topology, &id("alice"), &id("q_bob")).unwrap().unwrap();
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn test_shortest_path_edge_cases() {
        let topology = chain();
        assert_eq!(
            shortest_path(&topology, &id("alice"), &id("alice")).unwrap(),
            Some(vec![id("alice")])
        );
        assert_eq!(shortest_path(&topology, &id("alice"), &id("q_carol")).unwrap(), None);
        assert!(shortest_path(&topology, &id("nobody"), &id("alice")).is_err());
    }

    #[test]
    fn test_shortest_path_unknown_destination() {
        let topology = chain();
        assert_eq!(
            shortest_path(&topology, &id("alice"), &id("typo")),
            Err(TopologyError::UnknownNode(id("typo")))
        );
        // An isolated but existing destination is simply unreachable
        assert_eq!(shortest_path(&topology, &id("q_bob"), &id("q_carol")), Ok(None));
    }

    #[test]
    fn test_can_reach_type() {
        let topology = chain();
        let host = NodeType::ClassicalHost;
        assert!(can_reach_type(&topology, &id("q_bob"), &host).unwrap());
        assert!(can_reach_type(&topology, &id("alice"), &host).unwrap());
        assert!(!can_reach_type(&topology, &id("q_carol"), &host).unwrap());
        assert!(can_reach_type(&topology, &id("ghost"), &host).is_err());
    }
}
