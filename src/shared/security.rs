use crate::shared::error::SbomError;
use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Maximum size of a project manifest (10 MB)
pub const MAX_MANIFEST_SIZE: u64 = 10 * 1024 * 1024;

/// Validates that a path exists and is a regular file (not a directory or symlink)
///
/// # Errors
/// Returns an error if:
/// - The path doesn't exist
/// - The path is a symbolic link
/// - The path is not a regular file
pub fn validate_regular_file(path: &Path, file_description: &str) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to read {} metadata: {}",
            file_description,
            e
        )
    })?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. For security reasons, symbolic links are not allowed.",
            path.display()
        );
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    if metadata.len() > MAX_MANIFEST_SIZE {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            path.display(),
            metadata.len(),
            MAX_MANIFEST_SIZE
        );
    }

    Ok(())
}

/// Validates a destination about to be replaced by a write or copy.
///
/// A missing destination is fine. An existing one must not be a symlink,
/// otherwise the rename would clobber whatever the link points at.
pub fn validate_write_destination(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_symlink() => Err(SbomError::SecurityError {
            path: path.to_path_buf(),
            reason: "Output path is a symbolic link".to_string(),
            hint: "Remove the link or choose a different OutputDirectory".to_string(),
        }
        .into()),
        Ok(metadata) if metadata.is_dir() => Err(SbomError::FileWriteError {
            path: path.to_path_buf(),
            details: "A directory already exists at the output path".to_string(),
        }
        .into()),
        _ => Ok(()),
    }
}
