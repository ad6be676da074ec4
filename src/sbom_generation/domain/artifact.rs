use super::fingerprint::Fingerprint;
use super::output_format::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Filename used when `OutputFilename` is not configured
pub const DEFAULT_FILENAME: &str = "sbom";

/// Where the artifact for one invocation goes and in which format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLocation {
    directory: PathBuf,
    filename: String,
    format: OutputFormat,
}

impl ArtifactLocation {
    pub fn new(directory: PathBuf, filename: Option<&str>, format: OutputFormat) -> Self {
        let filename = filename
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_FILENAME)
            .to_string();
        Self {
            directory,
            filename,
            format,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// `{filename}.{json|xml}`
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.filename, self.format.extension())
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(self.file_name())
    }
}

/// A written SBOM file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SbomArtifact {
    pub path: PathBuf,
    pub format: OutputFormat,
    pub byte_length: u64,
    /// Fingerprint the artifact was built from, once it is known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<Fingerprint>,
}

impl SbomArtifact {
    pub fn new(path: PathBuf, format: OutputFormat, byte_length: u64) -> Self {
        Self {
            path,
            format,
            byte_length,
            fingerprint: None,
        }
    }

    pub fn with_fingerprint(mut self, fingerprint: Fingerprint) -> Self {
        self.fingerprint = Some(fingerprint);
        self
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}
