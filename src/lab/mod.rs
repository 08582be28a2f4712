//! Guided labs.
//!
//! A lab carries a declarative requirement (node types, connection pairs,
//! a minimum message count). The checker evaluates it against the live
//! topology and session counters on every mutation.

pub mod requirement;
pub mod checker;

pub use requirement::{Lab, Requirement, SessionCounters};
pub use checker::{check_completion, CategoryProgress, LabProgress, MessageProgress};
