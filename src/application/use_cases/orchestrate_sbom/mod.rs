use crate::application::dto::OrchestrationConfig;
use crate::application::services::{MergeAttempt, TargetCoordinator};
use crate::ports::inbound::SbomOrchestrationPort;
use crate::ports::outbound::{
    ArtifactWriter, BomBuilder, BomOptions, DependencyResolver, FingerprintStore,
    ProgressReporter,
};
use crate::sbom_generation::domain::{
    ArtifactLocation, BuildInvocation, DependencySet, FingerprintRecord, InvocationRole,
    OrchestrationOutcome, SbomArtifact, TargetId,
};
use crate::sbom_generation::policies::FailurePolicy;
use crate::sbom_generation::services::{ComponentFilter, FingerprintCalculator, FingerprintInputs};
use crate::shared::OrchestrationError;
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// BomOrchestrator - Drives SBOM generation for one host build pass
///
/// Decides whether to generate at all, collapses multi-target builds into a
/// single artifact through the shared [`TargetCoordinator`], skips
/// regeneration when the recorded fingerprint still matches, and otherwise
/// builds and writes the document.
///
/// # Type Parameters
/// * `DR` - DependencyResolver implementation
/// * `BB` - BomBuilder implementation
/// * `AW` - ArtifactWriter implementation
/// * `FS` - FingerprintStore implementation
/// * `PR` - ProgressReporter implementation
pub struct BomOrchestrator<DR, BB, AW, FS, PR> {
    dependency_resolver: DR,
    bom_builder: BB,
    artifact_writer: AW,
    fingerprint_store: FS,
    progress_reporter: PR,
    coordinator: Arc<TargetCoordinator>,
}

impl<DR, BB, AW, FS, PR> BomOrchestrator<DR, BB, AW, FS, PR>
where
    DR: DependencyResolver,
    BB: BomBuilder,
    AW: ArtifactWriter,
    FS: FingerprintStore,
    PR: ProgressReporter,
{
    /// Creates a new BomOrchestrator with injected dependencies
    ///
    /// Every invocation of one host build session must share `coordinator`.
    pub fn new(
        dependency_resolver: DR,
        bom_builder: BB,
        artifact_writer: AW,
        fingerprint_store: FS,
        progress_reporter: PR,
        coordinator: Arc<TargetCoordinator>,
    ) -> Self {
        Self {
            dependency_resolver,
            bom_builder,
            artifact_writer,
            fingerprint_store,
            progress_reporter,
            coordinator,
        }
    }

    /// Runs one pass without applying the failure policy
    pub async fn execute(
        &self,
        invocation: &BuildInvocation,
        config: &OrchestrationConfig,
    ) -> Result<OrchestrationOutcome, OrchestrationError> {
        // Step 1: Disabled generation has no side effects at all
        if !config.generate_sbom {
            return Ok(OrchestrationOutcome::disabled());
        }

        // Step 2: Inner invocations of a multi-target project only contribute
        let role = TargetCoordinator::classify(invocation);
        if role == InvocationRole::Inner && invocation.is_multi_target() {
            return self.contribute_inner(invocation).await;
        }

        // Step 3: Obtain the dependency set (merged or directly resolved)
        let mut components = match self.collect_components(invocation, config).await? {
            Some(components) => components,
            None => return self.reuse_recorded_artifact(invocation, config),
        };

        ComponentFilter::new(
            config.exclude_dev_dependencies,
            config.exclude_test_projects,
        )
        .apply(&mut components);

        // Steps 4-6: fingerprint, incremental skip, build and write
        self.generate(invocation, config, components)
    }

    /// Runs one pass with the continue-on-error policy applied
    pub async fn run_guarded(
        &self,
        invocation: &BuildInvocation,
        config: &OrchestrationConfig,
    ) -> Result<OrchestrationOutcome, OrchestrationError> {
        let result = self.execute(invocation, config).await;
        FailurePolicy::new(config.continue_on_error)
            .apply(result, |warning| self.progress_reporter.report_error(warning))
    }

    async fn contribute_inner(
        &self,
        invocation: &BuildInvocation,
    ) -> Result<OrchestrationOutcome, OrchestrationError> {
        let key = invocation.build_key();
        let declared = invocation.declared_targets();
        let Some(target) = invocation.target() else {
            return Ok(OrchestrationOutcome::inner_deferred());
        };
        TargetCoordinator::ensure_declared(&key, declared, target)?;

        match self
            .dependency_resolver
            .resolve(invocation.project(), invocation.configuration(), target)
            .await
        {
            Ok(components) => {
                self.coordinator
                    .register_inner_result(&key, declared, target.clone(), components)?;
            }
            // The outer invocation reports the failure once for the whole build
            Err(error) => {
                self.coordinator.register_inner_failure(
                    &key,
                    declared,
                    target.clone(),
                    format!("{:#}", error),
                )?;
            }
        }

        Ok(OrchestrationOutcome::inner_deferred())
    }

    /// Returns None when a multi-target outer pass has nothing new to merge
    async fn collect_components(
        &self,
        invocation: &BuildInvocation,
        config: &OrchestrationConfig,
    ) -> Result<Option<DependencySet>, OrchestrationError> {
        let key = invocation.build_key();

        if invocation.is_multi_target() {
            let expected = invocation.declared_targets().len();
            self.progress_reporter.report_progress(
                self.coordinator.registered_count(&key),
                expected,
                Some("target builds reported"),
            );

            let attempt = self
                .coordinator
                .wait_for_merge(&key, expected, config.merge_timeout)
                .await?;

            return Ok(match attempt {
                MergeAttempt::Ready(merged) => {
                    self.progress_reporter.report_progress(
                        expected,
                        expected,
                        Some("target builds reported"),
                    );
                    Some(merged.into_dependency_set())
                }
                MergeAttempt::NotReady => None,
            });
        }

        let target = match invocation.single_target() {
            Some(target) => target,
            None => {
                return Err(OrchestrationError::invalid_configuration(format!(
                    "Project '{}' declares no targets",
                    invocation.project().name
                )))
            }
        };
        TargetCoordinator::ensure_declared(&key, invocation.declared_targets(), target)?;

        self.dependency_resolver
            .resolve(invocation.project(), invocation.configuration(), target)
            .await
            .map(Some)
            .map_err(OrchestrationError::generation)
    }

    fn reuse_recorded_artifact(
        &self,
        invocation: &BuildInvocation,
        config: &OrchestrationConfig,
    ) -> Result<OrchestrationOutcome, OrchestrationError> {
        let location = artifact_location(invocation, config);
        let artifact = self
            .fingerprint_store
            .load(location.directory(), &invocation.build_key())
            .map_err(OrchestrationError::io)?
            .map(|record| record.artifact)
            .filter(SbomArtifact::exists);

        if let Some(artifact) = &artifact {
            self.report_up_to_date(artifact);
        }
        Ok(OrchestrationOutcome::up_to_date(artifact))
    }

    fn generate(
        &self,
        invocation: &BuildInvocation,
        config: &OrchestrationConfig,
        components: DependencySet,
    ) -> Result<OrchestrationOutcome, OrchestrationError> {
        let key = invocation.build_key();
        let location = artifact_location(invocation, config);
        let tool_version = self
            .bom_builder
            .effective_tool_version(config.tool_version.as_deref());
        let input_stamps = self.dependency_resolver.input_stamps(invocation.project());
        let file_name = location.file_name();

        let fingerprint = FingerprintCalculator::compute(&FingerprintInputs {
            tool_version: &tool_version,
            format: config.output_format,
            filename: &file_name,
            output_directory: location.directory(),
            include_serial_number: config.include_serial_number(),
            exclude_dev: config.exclude_dev_dependencies,
            exclude_test_projects: config.exclude_test_projects,
            components: &components,
            input_stamps: &input_stamps,
        });

        if config.enable_incremental_build {
            let recorded = self
                .fingerprint_store
                .load(location.directory(), &key)
                .map_err(OrchestrationError::io)?;
            if let Some(record) = recorded {
                if record.matches(&fingerprint) && record.artifact.exists() {
                    self.report_up_to_date(&record.artifact);
                    return Ok(OrchestrationOutcome::up_to_date(Some(record.artifact)));
                }
            }
        }

        self.progress_reporter.report(&format!(
            "📝 Generating CycloneDX SBOM for {} ({} component(s))...",
            key,
            components.len()
        ));

        let options = BomOptions {
            project: invocation.project().clone(),
            include_serial_number: config.include_serial_number(),
            tool_version: config.tool_version.clone(),
        };
        let document = self
            .bom_builder
            .build(&components, &options)
            .map_err(OrchestrationError::generation)?;

        let artifact = self
            .artifact_writer
            .write(&document, &location, config.include_serial_number())
            .map_err(OrchestrationError::io)?
            .with_fingerprint(fingerprint.clone());

        let record = FingerprintRecord {
            fingerprint,
            artifact: artifact.clone(),
            written_at: Utc::now().to_rfc3339(),
        };
        self.fingerprint_store
            .save(location.directory(), &key, &record)
            .map_err(OrchestrationError::io)?;

        self.progress_reporter.report_completion(&format!(
            "✅ SBOM written: {} ({} bytes)",
            artifact.path.display(),
            artifact.byte_length
        ));

        Ok(OrchestrationOutcome::generated(artifact))
    }

    fn report_up_to_date(&self, artifact: &SbomArtifact) {
        self.progress_reporter.report(&format!(
            "⏭️  SBOM is up to date: {}",
            artifact.path.display()
        ));
    }
}

/// Publish directory for a publish pass.
///
/// A multi-target project must name the target explicitly.
///
/// # Errors
/// * `InvalidConfiguration` - multi-target publish without a target
/// * `ConfigurationMismatch` - the requested target is not declared
pub fn publish_directory(
    invocation: &BuildInvocation,
    requested: Option<&TargetId>,
) -> Result<PathBuf, OrchestrationError> {
    let declared = invocation.declared_targets();
    let target = match requested.or(invocation.target()) {
        Some(target) => {
            TargetCoordinator::ensure_declared(&invocation.build_key(), declared, target)?;
            target
        }
        None if invocation.is_multi_target() => {
            return Err(OrchestrationError::invalid_configuration(format!(
                "Project '{}' declares multiple targets ({}); publish requires an explicit target",
                invocation.project().name,
                declared
                    .iter()
                    .map(TargetId::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            )))
        }
        None => invocation.single_target().ok_or_else(|| {
            OrchestrationError::invalid_configuration(format!(
                "Project '{}' declares no targets",
                invocation.project().name
            ))
        })?,
    };
    Ok(invocation.layout().publish_dir(target))
}

/// Where the artifact of this invocation lives
pub fn artifact_location(
    invocation: &BuildInvocation,
    config: &OrchestrationConfig,
) -> ArtifactLocation {
    let layout = invocation.layout();
    let directory = match &config.output_directory {
        Some(configured) => layout.resolve(configured),
        None => layout.primary_output_dir(),
    };
    ArtifactLocation::new(
        directory,
        config.output_filename.as_deref(),
        config.output_format,
    )
}

#[async_trait]
impl<DR, BB, AW, FS, PR> SbomOrchestrationPort for BomOrchestrator<DR, BB, AW, FS, PR>
where
    DR: DependencyResolver,
    BB: BomBuilder,
    AW: ArtifactWriter,
    FS: FingerprintStore,
    PR: ProgressReporter,
{
    async fn run(
        &self,
        invocation: &BuildInvocation,
        config: &OrchestrationConfig,
    ) -> Result<OrchestrationOutcome, OrchestrationError> {
        self.run_guarded(invocation, config).await
    }

    fn publish(
        &self,
        outcome: &OrchestrationOutcome,
        publish_dir: &Path,
        config: &OrchestrationConfig,
    ) -> Result<Option<PathBuf>, OrchestrationError> {
        let Some(artifact) = outcome.publishable_artifact() else {
            return Ok(None);
        };

        let copied = FailurePolicy::new(config.continue_on_error).recover(
            self.artifact_writer
                .copy_to_publish(artifact, publish_dir)
                .map_err(OrchestrationError::io),
            |warning| {
                self.progress_reporter
                    .report_error(&FailurePolicy::warning_line(warning))
            },
        )?;

        let copied = copied.flatten();
        if let Some(path) = &copied {
            self.progress_reporter
                .report(&format!("📦 SBOM copied to publish output: {}", path.display()));
        }
        Ok(copied)
    }

    fn clean(
        &self,
        invocation: &BuildInvocation,
        config: &OrchestrationConfig,
    ) -> Result<bool, OrchestrationError> {
        let location = artifact_location(invocation, config);
        let removed_artifact = self
            .artifact_writer
            .remove(&location)
            .map_err(OrchestrationError::io)?;
        let removed_record = self
            .fingerprint_store
            .remove(location.directory(), &invocation.build_key())
            .map_err(OrchestrationError::io)?;

        if removed_artifact {
            self.progress_reporter.report(&format!(
                "🧹 Removed SBOM: {}",
                location.path().display()
            ));
        }
        Ok(removed_artifact || removed_record)
    }
}
