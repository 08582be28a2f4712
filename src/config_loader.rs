use crate::config::Config;
use crate::topology::Topology;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{info, warn};
use std::fs::File;
use std::path::Path;

/// Returns true if the path should be parsed as JSON rather than YAML
fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("json"))
}

/// Load and parse a workspace configuration from a YAML or JSON file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration '{}'", config_path.display()))?;

    let config: Config = if is_json(config_path) {
        serde_json::from_reader(file).wrap_err("Failed to parse JSON configuration")?
    } else {
        serde_yaml::from_reader(file).wrap_err("Failed to parse YAML configuration")?
    };

    info!(
        "Loaded world '{}': {} nodes, {} connections, {} labs",
        config.general.world_name,
        config.topology.nodes.len(),
        config.topology.connections.len(),
        config.labs.len()
    );

    // Validate the configuration
    config.validate()?;

    Ok(config)
}

/// Read `general.log_level` without loading or validating the whole document.
///
/// Logging has to be configured before `load_config` runs, so this is a
/// silent best-effort read: any failure yields `None` and is reported by the
/// full load afterwards.
pub fn peek_log_level(config_path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(config_path).ok()?;
    let value: serde_yaml::Value = serde_yaml::from_str(&content).ok()?;
    value
        .get("general")?
        .get("log_level")?
        .as_str()
        .map(str::to_string)
}

/// Load a bare topology snapshot (as exported by the editor) from YAML or JSON
pub fn load_topology(topology_path: &Path) -> Result<Topology> {
    info!("Loading topology from: {:?}", topology_path);

    let file = File::open(topology_path)
        .wrap_err_with(|| format!("Failed to open topology '{}'", topology_path.display()))?;

    let topology: Topology = if is_json(topology_path) {
        serde_json::from_reader(file).wrap_err("Failed to parse JSON topology")?
    } else {
        serde_yaml::from_reader(file).wrap_err("Failed to parse YAML topology")?
    };

    Ok(topology)
}

/// Warn about document features that still load but are deprecated
pub fn check_config_compatibility(config_path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(config_path)
        .wrap_err_with(|| format!("Failed to read '{}'", config_path.display()))?;

    let value: serde_yaml::Value = serde_yaml::from_str(&content)
        .wrap_err("Failed to parse configuration for compatibility check")?;

    let compact = value
        .get("topology")
        .and_then(|t| t.get("connections"))
        .and_then(|c| c.as_sequence())
        .map_or(0, |connections| connections.iter().filter(|c| c.is_sequence()).count());

    if compact > 0 {
        warn!(
            "Configuration uses {} compact [from, to] connection(s). \
             These carry no link attributes; prefer the {{from, to, ...}} form.",
            compact
        );
    }

    Ok(())
}
