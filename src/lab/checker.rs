//! Lab completion checks.
//!
//! Node requirements draw from a shared, depleting pool of live nodes.
//! Connection requirements do not deplete: one physical connection can
//! satisfy several identical required pairs.

use serde::Serialize;
use std::collections::HashMap;

use crate::topology::{Link, Node, NodeType, TopologyError, TopologyView};

use super::requirement::Requirement;

/// Matched versus required items in one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CategoryProgress {
    pub matched: usize,
    pub required: usize,
}

impl CategoryProgress {
    pub fn is_complete(&self) -> bool {
        self.matched >= self.required
    }

    /// Items this category contributes: all of them, or none
    fn fulfilled(&self) -> usize {
        if self.is_complete() {
            self.required
        } else {
            0
        }
    }
}

/// Message count progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MessageProgress {
    pub required: u64,
    pub sent: u64,
}

impl MessageProgress {
    pub fn is_complete(&self) -> bool {
        self.sent >= self.required
    }
}

/// Result of checking a lab requirement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabProgress {
    pub satisfied: bool,
    pub fulfilled: usize,
    pub total: usize,
    pub nodes: CategoryProgress,
    pub connections: CategoryProgress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<MessageProgress>,
    /// Set when the topology could not be read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<TopologyError>,
}

impl LabProgress {
    /// Progress as a fraction in `[0, 1]`; an empty requirement counts as done
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            if self.satisfied {
                1.0
            } else {
                0.0
            }
        } else {
            self.fulfilled as f64 / self.total as f64
        }
    }
}

/// Check a requirement against the current topology and session
///
/// Never fails: a topology that cannot be read produces an unsatisfied
/// result with `error` set.
///
/// # Arguments
/// * `requirement` - The lab's declarative requirement
/// * `view` - Read access to the current topology
/// * `message_count` - Messages sent so far in the session
pub fn check_completion<V: TopologyView + ?Sized>(
    requirement: &Requirement,
    view: &V,
    message_count: u64,
) -> LabProgress {
    let messages = requirement.messages.map(|required| MessageProgress {
        required,
        sent: message_count,
    });

    let snapshot = view
        .all_nodes()
        .and_then(|nodes| Ok((nodes, view.all_connections()?)));

    let (nodes, links) = match snapshot {
        Ok(snapshot) => snapshot,
        Err(e) => {
            log::warn!("Cannot check lab completion: {}", e);
            return LabProgress {
                satisfied: false,
                fulfilled: 0,
                total: requirement.item_count(),
                nodes: CategoryProgress {
                    matched: 0,
                    required: requirement.nodes.len(),
                },
                connections: CategoryProgress {
                    matched: 0,
                    required: requirement.connections.len(),
                },
                messages,
                error: Some(e),
            };
        }
    };

    let node_progress = match_nodes(&requirement.nodes, &nodes);
    let connection_progress = match_connections(&requirement.connections, &links);
    let messages_done = messages.map_or(true, |m| m.is_complete());

    let fulfilled = node_progress.fulfilled()
        + connection_progress.fulfilled()
        + usize::from(messages.is_some() && messages_done);
    let satisfied = node_progress.is_complete() && connection_progress.is_complete() && messages_done;

    log::debug!(
        "Lab check: nodes {}/{}, connections {}/{}, messages {:?} -> {}",
        node_progress.matched,
        node_progress.required,
        connection_progress.matched,
        connection_progress.required,
        messages,
        if satisfied { "complete" } else { "incomplete" }
    );

    LabProgress {
        satisfied,
        fulfilled,
        total: requirement.item_count(),
        nodes: node_progress,
        connections: connection_progress,
        messages,
        error: None,
    }
}

/// Greedy match of required node types against a depleting pool
fn match_nodes(required: &[NodeType], nodes: &[Node]) -> CategoryProgress {
    let mut pool: HashMap<NodeType, usize> = HashMap::new();
    for node in nodes {
        *pool.entry(node.node_type.clone()).or_insert(0) += 1;
    }

    let mut matched = 0;
    for node_type in required {
        if let Some(count) = pool.get_mut(node_type).filter(|c| **c > 0) {
            *count -= 1;
            matched += 1;
        }
    }

    CategoryProgress {
        matched,
        required: required.len(),
    }
}

/// Each required pair is matched independently against all links
fn match_connections(required: &[(NodeType, NodeType)], links: &[Link]) -> CategoryProgress {
    let matched = required
        .iter()
        .filter(|(a, b)| links.iter().any(|link| link.joins(a, b)))
        .count();

    CategoryProgress {
        matched,
        required: required.len(),
    }
}
