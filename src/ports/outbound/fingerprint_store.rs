use crate::sbom_generation::domain::{BuildKey, FingerprintRecord};
use crate::shared::Result;
use std::path::Path;

/// FingerprintStore port for persisting the last successful fingerprint
///
/// Records must survive across separate host invocations. They live in
/// the artifact directory and are keyed by project + configuration.
pub trait FingerprintStore: Send + Sync {
    /// Loads the record; a missing record is `Ok(None)`, never an error
    fn load(&self, directory: &Path, key: &BuildKey) -> Result<Option<FingerprintRecord>>;

    /// Saves the record after a successful write
    fn save(&self, directory: &Path, key: &BuildKey, record: &FingerprintRecord) -> Result<()>;

    /// Deletes the record; returns whether one existed
    fn remove(&self, directory: &Path, key: &BuildKey) -> Result<bool>;
}
