//! Topology type definitions.
//!
//! This file contains the node type registry and the plain data types that
//! make up a topology snapshot: nodes, connections and resolved links.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Kinds of node that can be placed on the canvas
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeType {
    ClassicalHost,
    ClassicalRouter,
    QuantumHost,
    QuantumAdapter,
    QuantumRepeater,
    QuantumNetwork,
    ClassicalNetwork,
    Zone,
    InternetExchange,
    /// Classical to quantum converter
    C2QConverter,
    /// Quantum to classical converter
    Q2CConverter,
    /// Any type tag this registry does not know about, kept verbatim
    Unrecognized(String),
}

impl NodeType {
    /// Every known node type, in registry order
    pub const ALL: [NodeType; 11] = [
        NodeType::ClassicalHost,
        NodeType::ClassicalRouter,
        NodeType::QuantumHost,
        NodeType::QuantumAdapter,
        NodeType::QuantumRepeater,
        NodeType::QuantumNetwork,
        NodeType::ClassicalNetwork,
        NodeType::Zone,
        NodeType::InternetExchange,
        NodeType::C2QConverter,
        NodeType::Q2CConverter,
    ];

    /// Canonical tag used in topology documents
    pub fn as_str(&self) -> &str {
        match self {
            NodeType::ClassicalHost => "ClassicalHost",
            NodeType::ClassicalRouter => "ClassicalRouter",
            NodeType::QuantumHost => "QuantumHost",
            NodeType::QuantumAdapter => "QuantumAdapter",
            NodeType::QuantumRepeater => "QuantumRepeater",
            NodeType::QuantumNetwork => "QuantumNetwork",
            NodeType::ClassicalNetwork => "ClassicalNetwork",
            NodeType::Zone => "Zone",
            NodeType::InternetExchange => "InternetExchange",
            NodeType::C2QConverter => "C2QConverter",
            NodeType::Q2CConverter => "Q2CConverter",
            NodeType::Unrecognized(tag) => tag,
        }
    }

    /// Snake case tag, also used as the prefix of generated node ids
    pub fn snake_tag(&self) -> &'static str {
        match self {
            NodeType::ClassicalHost => "classical_host",
            NodeType::ClassicalRouter => "classical_router",
            NodeType::QuantumHost => "quantum_host",
            NodeType::QuantumAdapter => "quantum_adapter",
            NodeType::QuantumRepeater => "quantum_repeater",
            NodeType::QuantumNetwork => "quantum_network",
            NodeType::ClassicalNetwork => "classical_network",
            NodeType::Zone => "zone",
            NodeType::InternetExchange => "internet_exchange",
            NodeType::C2QConverter => "c2q_converter",
            NodeType::Q2CConverter => "q2c_converter",
            NodeType::Unrecognized(_) => "unrecognized",
        }
    }

    /// Human readable name shown in menus
    pub fn display_name(&self) -> &'static str {
        match self {
            NodeType::ClassicalHost => "Classical Host",
            NodeType::ClassicalRouter => "Classical Router",
            NodeType::QuantumHost => "Quantum Host",
            NodeType::QuantumAdapter => "Quantum Adapter",
            NodeType::QuantumRepeater => "Quantum Repeater",
            NodeType::QuantumNetwork => "Quantum Network",
            NodeType::ClassicalNetwork => "Classical Network",
            NodeType::Zone => "Zone",
            NodeType::InternetExchange => "Internet Exchange",
            NodeType::C2QConverter => "Classical-to-Quantum Converter",
            NodeType::Q2CConverter => "Quantum-to-Classical Converter",
            NodeType::Unrecognized(_) => "Unrecognized",
        }
    }

    /// Classical host or router
    pub fn is_classical(&self) -> bool {
        matches!(self, NodeType::ClassicalHost | NodeType::ClassicalRouter)
    }

    /// Quantum host or repeater, the two kinds a quantum link may join
    pub fn is_quantum_link_end(&self) -> bool {
        matches!(self, NodeType::QuantumHost | NodeType::QuantumRepeater)
    }

    /// Returns true for the five types covered by the compatibility rules
    pub fn is_governed(&self) -> bool {
        self.is_classical()
            || self.is_quantum_link_end()
            || matches!(self, NodeType::QuantumAdapter)
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, NodeType::Unrecognized(_))
    }

    /// Accepts PascalCase, snake_case and SCREAMING_SNAKE tags.
    /// Unknown tags are kept verbatim in `Unrecognized`.
    pub fn from_tag(tag: &str) -> Self {
        let normalized: String = tag
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "classicalhost" => NodeType::ClassicalHost,
            "classicalrouter" => NodeType::ClassicalRouter,
            "quantumhost" => NodeType::QuantumHost,
            "quantumadapter" | "adapter" => NodeType::QuantumAdapter,
            "quantumrepeater" => NodeType::QuantumRepeater,
            "quantumnetwork" => NodeType::QuantumNetwork,
            "classicalnetwork" => NodeType::ClassicalNetwork,
            "zone" => NodeType::Zone,
            "internetexchange" => NodeType::InternetExchange,
            "c2qconverter" => NodeType::C2QConverter,
            "q2cconverter" => NodeType::Q2CConverter,
            _ => NodeType::Unrecognized(tag.to_string()),
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(NodeType::from_tag(s))
    }
}

impl Serialize for NodeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        let node_type = NodeType::from_tag(&tag);
        if !node_type.is_recognized() {
            log::warn!("Unrecognized node type '{}'", tag);
        }
        Ok(node_type)
    }
}

/// Opaque node identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Canvas position of a node
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A node in the topology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", alias = "nodeType", alias = "node_type")]
    pub node_type: NodeType,
    #[serde(default)]
    pub position: Position,
    /// Logical network a host, router or repeater belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    /// Adapters only: the classical network they bridge from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classical_network: Option<String>,
    /// Adapters only: the quantum network they bridge to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantum_network: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: NodeId::new(id),
            name: None,
            node_type,
            position: Position::default(),
            network: None,
            classical_network: None,
            quantum_network: None,
        }
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name if one was given, otherwise the id
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.id.as_str())
    }
}

/// Link attributes persisted alongside a connection
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConnectionMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss_per_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise_model: Option<String>,
}

/// An undirected connection between two nodes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connection {
    pub from: NodeId,
    pub to: NodeId,
    #[serde(flatten)]
    pub metadata: ConnectionMetadata,
}

impl Connection {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: NodeId::new(from),
            to: NodeId::new(to),
            metadata: ConnectionMetadata::default(),
        }
    }

    /// Returns true if either endpoint is `id`
    pub fn touches(&self, id: &NodeId) -> bool {
        &self.from == id || &self.to == id
    }

    /// The endpoint opposite `id`, if `id` is an endpoint
    pub fn other_end(&self, id: &NodeId) -> Option<&NodeId> {
        if &self.from == id {
            Some(&self.to)
        } else if &self.to == id {
            Some(&self.from)
        } else {
            None
        }
    }
}

/// Connection as written in documents: a full object or a compact `[from, to]` pair
#[derive(Deserialize)]
#[serde(untagged)]
enum ConnectionRepr {
    Pair(NodeId, NodeId),
    Full {
        #[serde(alias = "from_node")]
        from: NodeId,
        #[serde(alias = "to_node")]
        to: NodeId,
        #[serde(flatten)]
        metadata: ConnectionMetadata,
    },
}

impl<'de> Deserialize<'de> for Connection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match ConnectionRepr::deserialize(deserializer)? {
            ConnectionRepr::Pair(from, to) => Connection {
                from,
                to,
                metadata: ConnectionMetadata::default(),
            },
            ConnectionRepr::Full { from, to, metadata } => Connection { from, to, metadata },
        })
    }
}

/// A connection resolved to its endpoint nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub from: Node,
    pub to: Node,
}

impl Link {
    /// Returns true if the endpoint types are `{a, b}` in either orientation
    pub fn joins(&self, a: &NodeType, b: &NodeType) -> bool {
        (&self.from.node_type == a && &self.to.node_type == b)
            || (&self.from.node_type == b && &self.to.node_type == a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_parsing() {
        assert_eq!("ClassicalHost".parse::<NodeType>().unwrap(), NodeType::ClassicalHost);
        assert_eq!("classical_host".parse::<NodeType>().unwrap(), NodeType::ClassicalHost);
        assert_eq!("QUANTUM_REPEATER".parse::<NodeType>().unwrap(), NodeType::QuantumRepeater);
        assert_eq!("Adapter".parse::<NodeType>().unwrap(), NodeType::QuantumAdapter);
        assert_eq!("c2q_converter".parse::<NodeType>().unwrap(), NodeType::C2QConverter);
        assert_eq!(
            "Teleporter".parse::<NodeType>().unwrap(),
            NodeType::Unrecognized("Teleporter".to_string())
        );
    }

    #[test]
    fn test_tags_parse_back() {
        for node_type in NodeType::ALL {
            assert_eq!(node_type.as_str().parse::<NodeType>().unwrap(), node_type);
            assert_eq!(node_type.snake_tag().parse::<NodeType>().unwrap(), node_type);
            assert!(node_type.is_recognized());
        }
    }

    #[test]
    fn test_governed_types() {
        let governed: Vec<NodeType> = NodeType::ALL.into_iter().filter(|t| t.is_governed()).collect();
        assert_eq!(
            governed,
            vec![
                NodeType::ClassicalHost,
                NodeType::ClassicalRouter,
                NodeType::QuantumHost,
                NodeType::QuantumAdapter,
                NodeType::QuantumRepeater,
            ]
        );
        assert!(!NodeType::Unrecognized("Satellite".to_string()).is_governed());
    }

    #[test]
    fn test_node_deserialization() {
        let yaml = r#"
id: qa1
type: Adapter
position: { x: 10.0, y: 20.0 }
classical_network: lan
quantum_network: qnet
"#;
        let node: Node = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(node.node_type, NodeType::QuantumAdapter);
        assert_eq!(node.position, Position::new(10.0, 20.0));
        assert_eq!(node.label(), "qa1");
        assert_eq!(node.quantum_network.as_deref(), Some("qnet"));
    }

    #[test]
    fn test_unknown_node_type_degrades() {
        let node: Node = serde_json::from_str(r#"{"id": "x", "nodeType": "Satellite"}"#).unwrap();
        assert_eq!(node.node_type, NodeType::Unrecognized("Satellite".to_string()));
        assert!(!node.node_type.is_recognized());
        assert_eq!(node.node_type.to_string(), "Satellite");
        assert_eq!(node.position, Position::default());
    }

    #[test]
    fn test_unknown_node_type_survives_round_trip() {
        let node: Node = serde_json::from_str(r#"{"id": "s", "type": "Satellite"}"#).unwrap();
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "Satellite");

        let reloaded: Node = serde_json::from_value(json).unwrap();
        assert_eq!(reloaded, node);
    }

    #[test]
    fn test_connection_forms() {
        let compact: Connection = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(compact, Connection::new("a", "b"));

        let full: Connection = serde_json::from_str(
            r#"{"from_node": "a", "to_node": "b", "bandwidth": 1000, "noise_model": "none"}"#,
        )
        .unwrap();
        assert_eq!(full.from, NodeId::from("a"));
        assert_eq!(full.metadata.bandwidth, Some(1000));
        assert_eq!(full.metadata.noise_model.as_deref(), Some("none"));
        assert_eq!(full.other_end(&NodeId::from("b")), Some(&NodeId::from("a")));
        assert_eq!(full.other_end(&NodeId::from("c")), None);
    }

    #[test]
    fn test_link_joins_either_orientation() {
        let link = Link {
            from: Node::new("h", NodeType::ClassicalHost),
            to: Node::new("r", NodeType::ClassicalRouter),
        };
        assert!(link.joins(&NodeType::ClassicalHost, &NodeType::ClassicalRouter));
        assert!(link.joins(&NodeType::ClassicalRouter, &NodeType::ClassicalHost));
        assert!(!link.joins(&NodeType::ClassicalHost, &NodeType::ClassicalHost));
    }
}
