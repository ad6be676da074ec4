use crate::sbom_generation::domain::{DependencySet, ProjectRef, TargetId};
use crate::sbom_generation::services::InputStamp;
use crate::shared::Result;
use async_trait::async_trait;

/// DependencyResolver port for obtaining resolved package metadata
///
/// This port abstracts the package-resolution step of the host build
/// (restore, lockfile, assets file) that knows which components a target
/// pulls in.
///
/// # Async Support
/// Inner invocations resolve concurrently, so implementations must be
/// `Send + Sync`.
#[async_trait]
pub trait DependencyResolver: Send + Sync {
    /// Resolves the components of one target of a project
    ///
    /// # Arguments
    /// * `project` - The project being built
    /// * `configuration` - Build configuration (e.g. Debug, Release)
    /// * `target` - The concrete target to resolve
    ///
    /// # Errors
    /// Returns an error if resolution data is missing or malformed
    async fn resolve(
        &self,
        project: &ProjectRef,
        configuration: &str,
        target: &TargetId,
    ) -> Result<DependencySet>;

    /// Files whose modification times should invalidate incremental skips
    fn input_stamps(&self, _project: &ProjectRef) -> Vec<InputStamp> {
        Vec::new()
    }
}
