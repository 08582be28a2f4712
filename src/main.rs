use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::collections::BTreeMap;
use std::path::PathBuf;

use quintet::config::{is_valid_log_level, Config, LOG_LEVELS};
use quintet::config_loader;
use quintet::report::{self, LabReport};
use quintet::rules::{compatible_next_types, validate_static_topology};
use quintet::topology::{shortest_path, NodeId, NodeType};

/// Topology rules and lab checks for hybrid quantum/classical networks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Path to the workspace configuration (YAML or JSON)
    #[arg(short, long)]
    config: PathBuf,

    /// Write the result as JSON to this path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace); defaults to the config's
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List node types that may be connected to a node next
    NextTypes {
        /// Node id
        #[arg(long)]
        node: String,
    },

    /// Check lab completion
    CheckLab {
        /// Only check this lab (default: all labs)
        #[arg(long)]
        lab: Option<String>,

        /// Messages sent so far (default: the config's session counter)
        #[arg(long)]
        messages: Option<u64>,
    },

    /// Run the static topology validator
    Validate,

    /// Show the shortest path between two nodes
    Path {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },

    /// Show node and connection counts
    Summary,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging before loading so the loader's own messages are kept.
    // RUST_LOG still overrides the level chosen here.
    let level = resolve_log_level(
        args.log_level.as_deref(),
        config_loader::peek_log_level(&args.config),
    )?;
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    info!("Configuration file: {:?}", args.config);
    let config = config_loader::load_config(&args.config)?;
    config_loader::check_config_compatibility(&args.config)?;
    info!("World: {}", config.general.world_name);

    match &args.command {
        Commands::NextTypes { node } => run_next_types(&config, &args, node),
        Commands::CheckLab { lab, messages } => run_check_lab(&config, &args, lab.as_deref(), *messages),
        Commands::Validate => run_validate(&config, &args),
        Commands::Path { from, to } => run_path(&config, &args, from, to),
        Commands::Summary => run_summary(&config, &args),
    }
}

/// Pick the default log filter: command line first, then the config, then `info`.
/// An unknown command line level is an error; an unknown config level is left
/// for config validation to report.
fn resolve_log_level(cli: Option<&str>, config: Option<String>) -> Result<String> {
    if let Some(level) = cli {
        if !is_valid_log_level(level) {
            return Err(eyre!(
                "Unknown log level '{}' (expected one of {})",
                level,
                LOG_LEVELS.join(", ")
            ));
        }
        return Ok(level.to_lowercase());
    }

    Ok(config
        .filter(|level| is_valid_log_level(level))
        .map(|level| level.to_lowercase())
        .unwrap_or_else(|| "info".to_string()))
}

fn run_next_types(config: &Config, args: &Args, node_id: &str) -> Result<()> {
    let node = config
        .topology
        .node(&NodeId::from(node_id))
        .ok_or_else(|| eyre!("Unknown node '{}'", node_id))?;

    let next = compatible_next_types(node, &config.topology);
    if next.is_empty() {
        println!("{} ({}) accepts no further connections", node.label(), node.node_type.display_name());
    } else {
        println!("{} ({}) can connect to:", node.label(), node.node_type.display_name());
        for node_type in &next {
            println!("  - {}", node_type.display_name());
        }
    }

    if let Some(output) = &args.output {
        report::write_json_report(&next, output)?;
    }
    Ok(())
}

fn run_check_lab(config: &Config, args: &Args, lab_id: Option<&str>, messages: Option<u64>) -> Result<()> {
    let message_count = messages.unwrap_or_else(|| config.session.messages_sent());

    let labs: Vec<_> = match lab_id {
        Some(id) => vec![config.lab(id).ok_or_else(|| eyre!("Unknown lab '{}'", id))?],
        None => config.labs.iter().collect(),
    };

    let reports: Vec<LabReport> = labs
        .into_iter()
        .map(|lab| LabReport::evaluate(lab, &config.topology, message_count))
        .collect();

    let complete = reports.iter().filter(|r| r.progress.satisfied).count();
    info!("{} of {} lab(s) complete", complete, reports.len());

    println!("{}", report::render_lab_reports(&reports));

    if let Some(output) = &args.output {
        report::write_json_report(&reports, output)?;
    }
    Ok(())
}

fn run_validate(config: &Config, args: &Args) -> Result<()> {
    let validation = validate_static_topology(&config.topology, &config.general.world_name);
    println!("{}", report::render_validation_report(&validation));

    if let Some(output) = &args.output {
        report::write_json_report(&validation, output)?;
    }

    if validation.is_valid {
        Ok(())
    } else {
        Err(eyre!(
            "Topology '{}' failed validation with {} issue(s)",
            validation.topology_name,
            validation.issues.len()
        ))
    }
}

fn run_path(config: &Config, args: &Args, from: &str, to: &str) -> Result<()> {
    let path = shortest_path(&config.topology, &NodeId::from(from), &NodeId::from(to))
        .wrap_err("Failed to search for a path")?;

    match &path {
        Some(hops) => {
            let rendered: Vec<&str> = hops.iter().map(|id| id.as_str()).collect();
            println!("Path found: {}", rendered.join(" -> "));
        }
        None => println!("No path exists between '{}' and '{}'", from, to),
    }

    if let Some(output) = &args.output {
        report::write_json_report(&path, output)?;
    }
    Ok(())
}

fn run_summary(config: &Config, args: &Args) -> Result<()> {
    let counts: BTreeMap<NodeType, usize> = config.topology.type_counts().into_iter().collect();

    println!("World: {}", config.general.world_name);
    println!("Nodes: {}", config.topology.nodes.len());
    for (node_type, count) in &counts {
        println!("  {:<32} {}", node_type.display_name(), count);
    }
    println!("Connections: {}", config.topology.connections.len());
    println!("Labs: {}", config.labs.len());
    println!("Messages sent: {}", config.session.messages_sent());

    if let Some(output) = &args.output {
        let by_tag: BTreeMap<&str, usize> = counts.iter().map(|(t, c)| (t.as_str(), *c)).collect();
        report::write_json_report(&by_tag, output)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(&["quintet", "--config", "lab.yaml", "validate"]);

        assert_eq!(args.config, PathBuf::from("lab.yaml"));
        assert!(args.output.is_none());
        assert!(matches!(args.command, Commands::Validate));
    }

    #[test]
    fn test_check_lab_args() {
        let args = Args::parse_from(&[
            "quintet",
            "--config", "lab.yaml",
            "--output", "progress.json",
            "check-lab",
            "--lab", "bb84",
            "--messages", "3",
        ]);

        assert_eq!(args.output, Some(PathBuf::from("progress.json")));
        match args.command {
            Commands::CheckLab { lab, messages } => {
                assert_eq!(lab.as_deref(), Some("bb84"));
                assert_eq!(messages, Some(3));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_log_level_resolution() {
        // Command line wins over the config
        assert_eq!(resolve_log_level(Some("DEBUG"), Some("warn".to_string())).unwrap(), "debug");
        assert_eq!(resolve_log_level(None, Some("warn".to_string())).unwrap(), "warn");
        assert_eq!(resolve_log_level(None, None).unwrap(), "info");

        // Unknown config levels fall back, config validation reports them later
        assert_eq!(resolve_log_level(None, Some("loud".to_string())).unwrap(), "info");
    }

    #[test]
    fn test_unknown_cli_log_level_rejected() {
        let args = Args::parse_from(&["quintet", "-c", "lab.yaml", "--log-level", "loud", "summary"]);
        let err = resolve_log_level(args.log_level.as_deref(), None).unwrap_err();
        assert!(err.to_string().contains("Unknown log level 'loud'"));
        assert!(err.to_string().contains("trace"));
    }

    #[test]
    fn test_next_types_args() {
        let args = Args::parse_from(&["quintet", "-c", "lab.yaml", "next-types", "--node", "qa1"]);
        assert!(matches!(args.command, Commands::NextTypes { ref node } if node == "qa1"));
    }
}
