use crate::application::factories::FormatterFactory;
use crate::ports::outbound::ArtifactWriter;
use crate::sbom_generation::domain::{ArtifactLocation, BomDocument, SbomArtifact};
use crate::shared::error::SbomError;
use crate::shared::security::{validate_regular_file, validate_write_destination};
use crate::shared::Result;
use std::borrow::Cow;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Writes `bytes` to `path` through a temporary file in the same directory.
///
/// The temporary file is renamed over the destination, so readers see either
/// the previous content or the complete new content.
pub(super) fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let write_error = |details: String| SbomError::FileWriteError {
        path: path.to_path_buf(),
        details,
    };

    let directory = path
        .parent()
        .ok_or_else(|| write_error("Output path has no parent directory".to_string()))?;
    fs::create_dir_all(directory)
        .map_err(|e| write_error(format!("Failed to create output directory: {}", e)))?;
    validate_write_destination(path)?;

    let mut temp = NamedTempFile::new_in(directory)
        .map_err(|e| write_error(format!("Failed to create temporary file: {}", e)))?;
    temp.write_all(bytes)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| write_error(e.to_string()))?;
    temp.persist(path)
        .map_err(|e| write_error(format!("Failed to replace output file: {}", e.error)))?;
    Ok(())
}

/// FileSystemArtifactWriter adapter for writing SBOM artifacts to disk
///
/// This adapter implements the ArtifactWriter port. Both the artifact and its
/// publish copy are written atomically; destinations that are symbolic links
/// are refused.
pub struct FileSystemArtifactWriter;

impl FileSystemArtifactWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemArtifactWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactWriter for FileSystemArtifactWriter {
    fn write(
        &self,
        document: &BomDocument,
        location: &ArtifactLocation,
        include_serial_number: bool,
    ) -> Result<SbomArtifact> {
        let document = if include_serial_number {
            Cow::Borrowed(document)
        } else {
            Cow::Owned(document.clone().without_serial_number())
        };

        let content = FormatterFactory::create(location.format()).format(&document)?;
        let path = location.path();
        write_atomically(&path, content.as_bytes())?;

        Ok(SbomArtifact::new(
            path,
            location.format(),
            content.len() as u64,
        ))
    }

    fn copy_to_publish(
        &self,
        artifact: &SbomArtifact,
        publish_dir: &Path,
    ) -> Result<Option<PathBuf>> {
        if !artifact.path.exists() {
            return Ok(None);
        }
        validate_regular_file(&artifact.path, "SBOM artifact")?;

        let file_name = artifact.path.file_name().ok_or_else(|| {
            anyhow::anyhow!("SBOM artifact path has no file name: {}", artifact.path.display())
        })?;
        let destination = publish_dir.join(file_name);

        let bytes = fs::read(&artifact.path).map_err(|e| SbomError::FileReadError {
            path: artifact.path.clone(),
            details: e.to_string(),
        })?;
        write_atomically(&destination, &bytes)?;

        Ok(Some(destination))
    }

    fn remove(&self, location: &ArtifactLocation) -> Result<bool> {
        let path = location.path();
        match fs::symlink_metadata(&path) {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(SbomError::FileWriteError {
                path,
                details: e.to_string(),
            }
            .into()),
            Ok(metadata) if metadata.is_dir() => Err(SbomError::FileWriteError {
                path,
                details: "A directory exists at the SBOM path; refusing to remove it".to_string(),
            }
            .into()),
            Ok(_) => {
                fs::remove_file(&path).map_err(|e| SbomError::FileWriteError {
                    path: path.clone(),
                    details: e.to_string(),
                })?;
                Ok(true)
            }
        }
    }
}
