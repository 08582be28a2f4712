//! Topology rules.
//!
//! `compatibility` answers "what can be connected here next?" while the user
//! builds a topology; `validation` checks a finished topology as a whole.

pub mod compatibility;
pub mod validation;

pub use compatibility::{compatible_next_types, quick_add_node, QUANTUM_PORT_LIMIT};
pub use validation::{validate_static_topology, TopologyIssue, ValidationReport};
