use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::lab::{Lab, SessionCounters};
use crate::topology::Topology;

/// Log levels accepted in `general.log_level` and on the command line
pub const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Case-insensitive check against `LOG_LEVELS`
pub fn is_valid_log_level(level: &str) -> bool {
    LOG_LEVELS.contains(&level.to_lowercase().as_str())
}

/// Workspace document: one topology, the labs played on it, and session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub topology: Topology,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labs: Vec<Lab>,
    #[serde(default)]
    pub session: SessionCounters,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        // Validate general settings
        if let Some(level) = &self.general.log_level {
            if !is_valid_log_level(level) {
                return Err(ValidationError::InvalidGeneral(format!(
                    "unknown log_level '{}' (expected one of {})",
                    level,
                    LOG_LEVELS.join(", ")
                )));
            }
        }

        self.validate_topology()?;
        self.validate_labs()?;

        Ok(())
    }

    /// Node ids must be unique and every connection must reference existing nodes
    fn validate_topology(&self) -> Result<(), ValidationError> {
        let mut ids = HashSet::new();
        for node in &self.topology.nodes {
            if node.id.as_str().is_empty() {
                return Err(ValidationError::InvalidTopology(
                    "node id cannot be empty".to_string(),
                ));
            }
            if !ids.insert(&node.id) {
                return Err(ValidationError::InvalidTopology(format!(
                    "duplicate node id '{}'",
                    node.id
                )));
            }
        }

        for connection in &self.topology.connections {
            for end in [&connection.from, &connection.to] {
                if !ids.contains(end) {
                    return Err(ValidationError::InvalidTopology(format!(
                        "connection {} <-> {} references unknown node '{}'",
                        connection.from, connection.to, end
                    )));
                }
            }
        }

        Ok(())
    }

    /// Lab ids must be present and unique
    fn validate_labs(&self) -> Result<(), ValidationError> {
        let mut ids = HashSet::new();
        for lab in &self.labs {
            if lab.id.trim().is_empty() {
                return Err(ValidationError::InvalidLab(format!(
                    "lab '{}' has an empty id",
                    lab.title
                )));
            }
            if !ids.insert(lab.id.as_str()) {
                return Err(ValidationError::InvalidLab(format!(
                    "duplicate lab id '{}'",
                    lab.id
                )));
            }
        }
        Ok(())
    }

    /// Get the general configuration
    pub fn general(&self) -> &GeneralConfig {
        &self.general
    }

    /// Find a lab by id
    pub fn lab(&self, id: &str) -> Option<&Lab> {
        self.labs.iter().find(|lab| lab.id == id)
    }
}

/// Shared general configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GeneralConfig {
    #[serde(default = "default_world_name")]
    pub world_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

fn default_world_name() -> String {
    "Untitled World".to_string()
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid topology configuration: {0}")]
    InvalidTopology(String),
    #[error("Invalid lab configuration: {0}")]
    InvalidLab(String),
}

/// Default implementations
impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            world_name: default_world_name(),
            log_level: Some("info".to_string()),
        }
    }
}
