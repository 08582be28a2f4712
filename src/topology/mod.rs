//! Network topology module.
//!
//! This module contains the node type registry, the topology snapshot and
//! its read-only query surface, and reachability helpers.

pub mod types;
pub mod graph;
pub mod paths;

// Re-export key types and functions for easier access
pub use types::{Connection, ConnectionMetadata, Link, Node, NodeId, NodeType, Position};
pub use graph::{Topology, TopologyError, TopologyView};
pub use paths::{can_reach_type, shortest_path};
