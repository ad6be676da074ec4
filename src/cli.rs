use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::sbom_generation::domain::{CommandKind, TargetId};

/// Host command to simulate
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Command {
    Build,
    Pack,
    Publish,
    Clean,
}

impl From<Command> for CommandKind {
    fn from(command: Command) -> Self {
        match command {
            Command::Build => CommandKind::Build,
            Command::Pack => CommandKind::Pack,
            Command::Publish => CommandKind::Publish,
            Command::Clean => CommandKind::Clean,
        }
    }
}

/// Generate CycloneDX SBOMs as part of a project build
#[derive(Parser, Debug)]
#[command(name = "build-sbom")]
#[command(version)]
#[command(
    about = "Generate CycloneDX SBOMs as part of a project build",
    long_about = "Runs one host build pass for the project described by sbom-project.toml. \
                  Multi-target projects run one inner pass per target and produce a single \
                  consolidated SBOM."
)]
pub struct Args {
    /// Build command to run
    #[arg(value_enum)]
    pub command: Command,

    /// Path to the project directory (defaults to current directory)
    #[arg(long, value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    /// Build configuration
    #[arg(short, long, default_value = "Debug")]
    pub configuration: String,

    /// Target to publish (required for publish on multi-target projects)
    #[arg(short, long, value_name = "TARGET", value_parser = parse_target)]
    pub framework: Option<TargetId>,

    /// Orchestration property, e.g. -p OutputFormat=xml
    /// Can be specified multiple times; overrides the config file
    #[arg(short = 'p', long = "property", value_name = "NAME=VALUE", value_parser = parse_property)]
    pub properties: Vec<(String, String)>,

    /// Path to a config file (defaults to build-sbom.config.yml in the project directory)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

fn parse_property(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("Invalid property '{}'. Expected NAME=VALUE", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("Invalid property '{}'. Property name is empty", raw));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

fn parse_target(raw: &str) -> Result<TargetId, String> {
    TargetId::new(raw).map_err(|e| e.to_string())
}
