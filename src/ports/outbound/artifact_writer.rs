use crate::sbom_generation::domain::{ArtifactLocation, BomDocument, SbomArtifact};
use crate::shared::Result;
use std::path::{Path, PathBuf};

/// ArtifactWriter port for putting SBOM bytes on disk
pub trait ArtifactWriter: Send + Sync {
    /// Serializes and writes the document atomically at the location
    ///
    /// Readers never observe a partially written file.
    fn write(
        &self,
        document: &BomDocument,
        location: &ArtifactLocation,
        include_serial_number: bool,
    ) -> Result<SbomArtifact>;

    /// Copies an existing artifact verbatim into the publish directory
    ///
    /// Returns None (not an error) when the artifact file does not exist.
    fn copy_to_publish(&self, artifact: &SbomArtifact, publish_dir: &Path)
        -> Result<Option<PathBuf>>;

    /// Removes the artifact at the location; returns whether a file was removed
    fn remove(&self, location: &ArtifactLocation) -> Result<bool>;
}
