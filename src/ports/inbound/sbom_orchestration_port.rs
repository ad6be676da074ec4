use crate::application::dto::OrchestrationConfig;
use crate::sbom_generation::domain::{BuildInvocation, OrchestrationOutcome};
use crate::shared::OrchestrationError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// SbomOrchestrationPort - Inbound port the host build drives
///
/// The host calls `run` once per build pass per project instance (outer and
/// inner invocations alike), `publish` after a publish pass, and `clean`
/// for a clean command.
#[async_trait]
pub trait SbomOrchestrationPort: Send + Sync {
    /// Runs the orchestrator with the continue-on-error policy applied
    ///
    /// # Errors
    /// Returns only failures the policy does not suppress
    async fn run(
        &self,
        invocation: &BuildInvocation,
        config: &OrchestrationConfig,
    ) -> Result<OrchestrationOutcome, OrchestrationError>;

    /// Copies the artifact of `outcome` into `publish_dir`
    ///
    /// Returns the copied path, or None when there was nothing to publish.
    fn publish(
        &self,
        outcome: &OrchestrationOutcome,
        publish_dir: &Path,
        config: &OrchestrationConfig,
    ) -> Result<Option<PathBuf>, OrchestrationError>;

    /// Removes the artifact and its fingerprint record
    fn clean(
        &self,
        invocation: &BuildInvocation,
        config: &OrchestrationConfig,
    ) -> Result<bool, OrchestrationError>;
}
