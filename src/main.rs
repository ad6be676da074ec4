mod adapters;
mod application;
mod cli;
mod config;
mod ports;
mod sbom_generation;
mod shared;

use adapters::outbound::console::StderrProgressReporter;
use adapters::outbound::cyclonedx::CycloneDxBomBuilder;
use adapters::outbound::filesystem::{
    FileSystemArtifactWriter, ManifestDependencyResolver, SidecarFingerprintStore,
};
use application::dto::{OrchestrationConfig, PropertyBag};
use application::services::TargetCoordinator;
use application::use_cases::{publish_directory, BomOrchestrator};
use clap::Parser;
use cli::Args;
use config::{discover_config, load_config_from_path, override_property};
use futures::future::join_all;
use ports::inbound::SbomOrchestrationPort;
use ports::outbound::ProgressReporter;
use sbom_generation::domain::{BuildInvocation, CommandKind, OrchestrationOutcome};
use sbom_generation::policies::FailurePolicy;
use shared::error::{ExitCode, OrchestrationError, SbomError};
use shared::Result;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() {
                ExitCode::InvalidArguments
            } else {
                ExitCode::Success
            };
            let _ = e.print();
            process::exit(code.as_i32());
        }
    };

    let code = match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Orchestration errors already render their cause inline
            let orchestration_error = e.downcast_ref::<OrchestrationError>();
            if orchestration_error.is_none() {
                let mut source = e.source();
                while let Some(err) = source {
                    eprintln!("\nCaused by: {}", err);
                    source = err.source();
                }
            }

            eprintln!();
            orchestration_error
                .map(OrchestrationError::exit_code)
                .unwrap_or(ExitCode::ApplicationError)
        }
    };

    process::exit(code.as_i32());
}

async fn run(args: Args) -> Result<ExitCode> {
    // Validate project directory
    let project_path = args
        .project_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    validate_project_path(&project_path)?;

    let progress_reporter = StderrProgressReporter::new();
    let properties = collect_properties(&args, &project_path, &progress_reporter)?;
    for name in OrchestrationConfig::unknown_properties(&properties) {
        progress_reporter.report_error(&FailurePolicy::warning_line(&format!(
            "Unknown property '{}' will be ignored.",
            name
        )));
    }
    let config = OrchestrationConfig::from_properties(&properties)?;
    if !config.generate_sbom {
        return Ok(ExitCode::Success);
    }

    // The manifest stands in for the host's evaluated project
    let dependency_resolver = ManifestDependencyResolver::new();
    let manifest = dependency_resolver.read_manifest(&project_path)?;
    let targets = manifest.target_ids()?;
    let project = manifest.project_ref(&project_path);

    let command = CommandKind::from(args.command);
    let outer = BuildInvocation::outer(project, args.configuration.as_str(), targets, command);
    if let Some(framework) = &args.framework {
        TargetCoordinator::ensure_declared(
            &outer.build_key(),
            outer.declared_targets(),
            framework,
        )?;
    }

    // Create adapters (Dependency Injection); one coordinator per host session
    let orchestrator = BomOrchestrator::new(
        dependency_resolver,
        CycloneDxBomBuilder::new(),
        FileSystemArtifactWriter::new(),
        SidecarFingerprintStore::new(),
        progress_reporter,
        Arc::new(TargetCoordinator::new()),
    );

    match command {
        CommandKind::Clean => {
            orchestrator.clean(&outer, &config)?;
        }
        CommandKind::Publish => {
            // Ambiguous publish targets are rejected before anything is generated
            let publish_dir = publish_directory(&outer, args.framework.as_ref())?;
            let outcome = run_session(&orchestrator, &outer, &config).await?;
            orchestrator.publish(&outcome, &publish_dir, &config)?;
        }
        CommandKind::Build | CommandKind::Pack => {
            run_session(&orchestrator, &outer, &config).await?;
        }
    }

    Ok(ExitCode::Success)
}

/// Runs the outer invocation and, for multi-target projects, one inner
/// invocation per declared target, all concurrently.
async fn run_session<O: SbomOrchestrationPort>(
    orchestrator: &O,
    outer: &BuildInvocation,
    config: &OrchestrationConfig,
) -> std::result::Result<OrchestrationOutcome, OrchestrationError> {
    if !outer.is_multi_target() {
        return orchestrator.run(outer, config).await;
    }

    let inners: Vec<BuildInvocation> = outer
        .declared_targets()
        .iter()
        .map(|target| {
            BuildInvocation::inner(
                outer.project().clone(),
                outer.configuration(),
                outer.declared_targets().to_vec(),
                target.clone(),
                outer.command(),
            )
        })
        .collect();

    let (outcome, inner_results) = futures::join!(
        orchestrator.run(outer, config),
        join_all(inners.iter().map(|inner| orchestrator.run(inner, config)))
    );

    for inner_result in inner_results {
        inner_result?;
    }
    outcome
}

/// Config file first, then `-p` properties on top
fn collect_properties(
    args: &Args,
    project_dir: &Path,
    reporter: &impl ProgressReporter,
) -> Result<PropertyBag> {
    let config_file = match &args.config {
        Some(path) => Some(load_config_from_path(path)?),
        None => discover_config(project_dir)?,
    };

    let mut properties = PropertyBag::new();
    if let Some(config_file) = &config_file {
        for key in config_file.unknown_field_names() {
            reporter.report_error(&FailurePolicy::warning_line(&format!(
                "Unknown config field '{}' will be ignored.",
                key
            )));
        }
        properties = config_file.to_properties();
    }

    for (name, value) in &args.properties {
        override_property(&mut properties, name, value);
    }
    Ok(properties)
}

fn validate_project_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(SbomError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Directory does not exist".to_string(),
        }
        .into());
    }

    // Security check: Reject symbolic links for project paths
    let metadata = std::fs::symlink_metadata(path).map_err(|e| SbomError::InvalidProjectPath {
        path: path.to_path_buf(),
        reason: format!("Failed to read path metadata: {}", e),
    })?;

    if metadata.is_symlink() {
        return Err(SbomError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Security: Project path is a symbolic link. For security reasons, symbolic links are not allowed.".to_string(),
        }
        .into());
    }

    if !path.is_dir() {
        return Err(SbomError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Not a directory".to_string(),
        }
        .into());
    }

    Ok(())
}
