//! # Quintet - Topology rules for hybrid quantum/classical network labs
//!
//! This library holds the topology validity model behind a visual network
//! lab: which node types may connect to which, how many ports each type
//! exposes, and whether a guided lab's requirements are met.
//!
//! ## Overview
//!
//! Networks are built from a classical layer (hosts and routers) and a
//! quantum layer (quantum hosts and repeaters). A quantum adapter is the only
//! bridge between the two. Quantum-side nodes have exactly two ports.
//!
//! ## Architecture
//!
//! - `topology`: node type registry, topology snapshot, read-only view trait
//! - `rules`: compatibility rule engine and static topology validator
//! - `lab`: lab requirements, session counters and the completion checker
//! - `config` / `config_loader`: workspace documents in YAML or JSON
//! - `report`: JSON and text reports
//!
//! ## Example Usage
//!
//! ```rust
//! use quintet::rules::compatible_next_types;
//! use quintet::topology::{Node, NodeId, NodeType, Topology};
//!
//! let mut topology = Topology::new();
//! topology.add_node(Node::new("alice", NodeType::ClassicalHost))?;
//! topology.add_node(Node::new("qa", NodeType::QuantumAdapter))?;
//! topology.connect(&NodeId::from("alice"), &NodeId::from("qa"))?;
//!
//! let adapter = topology.node(&NodeId::from("qa")).unwrap().clone();
//! assert_eq!(compatible_next_types(&adapter, &topology), vec![NodeType::QuantumHost]);
//! # Ok::<(), quintet::topology::TopologyError>(())
//! ```
//!
//! ## Error Handling
//!
//! Domain errors are `thiserror` enums. The rule engine and the lab checker
//! never fail: unreadable input degrades to "offer nothing" or "not
//! satisfied". Loading and reporting return `color_eyre::Result`.

pub mod config;
pub mod config_loader;
pub mod topology;
pub mod rules;
pub mod lab;
pub mod report;
