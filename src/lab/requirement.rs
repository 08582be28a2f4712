//! Lab definitions and live session counters.

use serde::{Deserialize, Serialize};

use crate::topology::NodeType;

/// What a topology and session must contain for a lab to be complete
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Requirement {
    /// Required node types; duplicates each need a distinct node
    #[serde(default)]
    pub nodes: Vec<NodeType>,
    /// Required connections by endpoint type, in either orientation
    #[serde(default)]
    pub connections: Vec<(NodeType, NodeType)>,
    /// Minimum number of messages sent in the session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<u64>,
}

impl Requirement {
    /// Number of individually checked items
    pub fn item_count(&self) -> usize {
        self.nodes.len() + self.connections.len() + usize::from(self.messages.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }
}

/// A guided exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lab {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub requirement: Requirement,
}

/// Counters kept for the current session
///
/// Counters only ever grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionCounters {
    #[serde(default)]
    messages_sent: u64,
}

impl SessionCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a previously persisted count
    pub fn resume(messages_sent: u64) -> Self {
        Self { messages_sent }
    }

    pub fn record_message(&mut self) {
        self.record_messages(1);
    }

    pub fn record_messages(&mut self, count: u64) {
        self.messages_sent = self.messages_sent.saturating_add(count);
    }

    pub fn messages_sent(&self) -> u64 {
        self.messages_sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirement_parsing() {
        let yaml = r#"
nodes: [ClassicalHost, ClassicalHost, quantum_host]
connections:
  - [ClassicalHost, Adapter]
messages: 3
"#;
        let requirement: Requirement = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            requirement.nodes,
            vec![NodeType::ClassicalHost, NodeType::ClassicalHost, NodeType::QuantumHost]
        );
        assert_eq!(
            requirement.connections,
            vec![(NodeType::ClassicalHost, NodeType::QuantumAdapter)]
        );
        assert_eq!(requirement.messages, Some(3));
        assert_eq!(requirement.item_count(), 5);
    }

    #[test]
    fn test_empty_requirement() {
        let requirement: Requirement = serde_yaml::from_str("{}").unwrap();
        assert!(requirement.is_empty());
    }

    #[test]
    fn test_session_counters_only_grow() {
        let mut counters = SessionCounters::new();
        counters.record_message();
        counters.record_messages(2);
        assert_eq!(counters.messages_sent(), 3);

        let mut counters = SessionCounters::resume(u64::MAX);
        counters.record_message();
        assert_eq!(counters.messages_sent(), u64::MAX);
    }
}
