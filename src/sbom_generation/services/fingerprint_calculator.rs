use crate::sbom_generation::domain::{DependencySet, Fingerprint, OutputFormat};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Modification time of one input file the resolver read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputStamp {
    pub path: PathBuf,
    pub modified_nanos: u128,
}

impl InputStamp {
    pub fn new(path: PathBuf, modified: SystemTime) -> Self {
        let modified_nanos = modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        Self {
            path,
            modified_nanos,
        }
    }

    /// Reads the stamp from disk; None when the file cannot be inspected
    pub fn of(path: &Path) -> Option<Self> {
        let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok()?;
        Some(Self::new(path.to_path_buf(), modified))
    }
}

/// Everything that influences the bytes of the artifact
#[derive(Debug, Clone)]
pub struct FingerprintInputs<'a> {
    pub tool_version: &'a str,
    pub format: OutputFormat,
    pub filename: &'a str,
    pub output_directory: &'a Path,
    pub include_serial_number: bool,
    pub exclude_dev: bool,
    pub exclude_test_projects: bool,
    pub components: &'a DependencySet,
    pub input_stamps: &'a [InputStamp],
}

/// Canonical form hashed by the calculator. Field order is fixed and maps
/// are BTreeMaps, so equal inputs always serialize to equal bytes.
#[derive(Serialize)]
struct CanonicalInputs<'a> {
    schema: u32,
    tool_version: &'a str,
    format: &'a str,
    filename: &'a str,
    output_directory: String,
    include_serial_number: bool,
    exclude_dev: bool,
    exclude_test_projects: bool,
    components: Vec<(&'a str, &'a str, &'a str)>,
    input_stamps: BTreeMap<String, u128>,
}

/// Bumped whenever the canonical shape changes, so old side-cars never match
const FINGERPRINT_SCHEMA: u32 = 1;

pub struct FingerprintCalculator;

impl FingerprintCalculator {
    pub fn compute(inputs: &FingerprintInputs<'_>) -> Fingerprint {
        let canonical = CanonicalInputs {
            schema: FINGERPRINT_SCHEMA,
            tool_version: inputs.tool_version,
            format: inputs.format.extension(),
            filename: inputs.filename,
            output_directory: inputs.output_directory.display().to_string(),
            include_serial_number: inputs.include_serial_number,
            exclude_dev: inputs.exclude_dev,
            exclude_test_projects: inputs.exclude_test_projects,
            components: inputs
                .components
                .iter()
                .map(|c| (c.name(), c.version(), c.origin()))
                .collect(),
            input_stamps: inputs
                .input_stamps
                .iter()
                .map(|s| (s.path.display().to_string(), s.modified_nanos))
                .collect(),
        };

        let mut hasher = Sha256::new();
        // Serializing plain strings, bools and integers cannot fail
        let bytes = serde_json::to_vec(&canonical).unwrap_or_default();
        hasher.update(&bytes);
        Fingerprint::from_hex(format!("{:x}", hasher.finalize()))
    }
}
