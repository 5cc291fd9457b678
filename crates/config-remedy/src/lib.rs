//! Config-remedy: network device configuration differencing and remediation.
//!
//! Given a device's *running* configuration and a desired *generated*
//! configuration, the engine computes an ordered remediation command
//! sequence and a rollback that reverses it, honoring per-platform rules
//! for negation, idempotent replacement, sectional overwrites and section
//! exits. It also tags subtrees for selective application and detects
//! definitions nothing references.
//!
//! The library exposes CLI parsing and run for reuse in tests/integration.

pub mod analysis;
pub mod diff;
pub mod driver;
pub mod emit;
pub mod error;
pub mod matcher;
pub mod parser;
pub mod rules;
pub mod tree;
pub mod util;
pub mod workflow;

pub use analysis::{UnusedObjectAnalysis, UnusedObjectAnalyzer};
pub use driver::{Driver, Platform, get_driver, parse_platform};
pub use error::{ConfigRemedyError, Result};
pub use matcher::MatchRule;
pub use rules::{DriverRules, TagRule, UnusedObjectRule};
pub use tree::{Config, Dump, DumpLine, Node, NodeId, ROOT, TextStyle};
pub use workflow::WorkflowRemediation;

use clap::{Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "config-remedy")]
#[command(about = "Network configuration differencing and remediation tool")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the commands that align a device with its generated config
    Remediate {
        /// Platform name (e.g. cisco_ios, juniper_junos)
        platform: String,
        /// Path to the running configuration
        running: PathBuf,
        /// Path to the generated configuration
        generated: PathBuf,
        /// Only emit lines carrying one of these tags
        #[arg(long = "include-tag")]
        include_tags: Vec<String>,
        /// Drop lines carrying one of these tags
        #[arg(long = "exclude-tag")]
        exclude_tags: Vec<String>,
        /// YAML file of tag rules applied to the remediation first
        #[arg(long)]
        tags_file: Option<PathBuf>,
    },
    /// Print the commands that revert a device to its running config
    Rollback {
        /// Platform name
        platform: String,
        /// Path to the running configuration
        running: PathBuf,
        /// Path to the generated configuration
        generated: PathBuf,
    },
    /// Parse a configuration and print its sorted dump as JSON
    Dump {
        /// Platform name
        platform: String,
        /// Path to the configuration
        config: PathBuf,
    },
    /// Report objects that are defined but never referenced
    Unused {
        /// Platform name
        platform: String,
        /// Path to the configuration
        config: PathBuf,
        /// Restrict the analysis to these object types
        #[arg(long = "object-type")]
        object_types: Vec<String>,
    },
}

/// Execute the CLI logic with a parsed `Cli`.
///
/// # Errors
/// Returns an error if loading, parsing or diffing fails.
pub fn run_with(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Command::Remediate {
            platform,
            running,
            generated,
            include_tags,
            exclude_tags,
            tags_file,
        } => {
            let driver = get_driver(parse_platform(platform)?)?;
            let running = Config::parse(driver.clone(), &util::load_device_config(running)?)?;
            let generated = Config::parse(driver, &util::load_device_config(generated)?)?;
            let mut workflow = WorkflowRemediation::new(running, generated)?;
            if let Some(tags_file) = tags_file {
                let tag_rules = util::load_tag_rules(tags_file)?;
                workflow.apply_remediation_tag_rules(&tag_rules)?;
            }
            let include: BTreeSet<String> = include_tags.iter().cloned().collect();
            let exclude: BTreeSet<String> = exclude_tags.iter().cloned().collect();
            let text = workflow.remediation_config_filtered_text(&include, &exclude)?;
            if !text.is_empty() {
                println!("{text}");
            }
        }
        Command::Rollback {
            platform,
            running,
            generated,
        } => {
            let driver = get_driver(parse_platform(platform)?)?;
            let running = Config::parse(driver.clone(), &util::load_device_config(running)?)?;
            let generated = Config::parse(driver, &util::load_device_config(generated)?)?;
            let mut workflow = WorkflowRemediation::new(running, generated)?;
            let text = workflow.rollback_config()?.to_text(false);
            if !text.is_empty() {
                println!("{text}");
            }
        }
        Command::Dump { platform, config } => {
            let driver = get_driver(parse_platform(platform)?)?;
            let parsed = Config::parse(driver, &util::load_device_config(config)?)?;
            println!("{}", serde_json::to_string_pretty(&parsed.dump())?);
        }
        Command::Unused {
            platform,
            config,
            object_types,
        } => {
            let driver = get_driver(parse_platform(platform)?)?;
            let parsed = Config::parse(driver, &util::load_device_config(config)?)?;
            let analyzer = UnusedObjectAnalyzer::new(&parsed);
            let analyzer = if object_types.is_empty() {
                analyzer
            } else {
                analyzer.filtered(object_types)
            };
            println!("{}", serde_json::to_string_pretty(&analyzer.analyze())?);
        }
    }
    Ok(())
}

/// Parse CLI args and run.
///
/// # Errors
/// Returns an error from `run_with` if initialization or execution fails.
pub fn run<I, S>(args: I) -> anyhow::Result<()>
where
    I: IntoIterator<Item = S>,
    S: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("config_remedy=debug")
            .init();
    } else {
        tracing_subscriber::fmt::init();
    }
    run_with(&cli)
}
