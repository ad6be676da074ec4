use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to tell an SBOM failure apart from a
/// misconfigured invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - the SBOM was generated, reused, or generation was skipped
    Success = 0,
    /// SBOM generation failed and ContinueOnError was disabled
    SbomGenerationFailed = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (invalid configuration, missing manifest, target mismatch, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::SbomGenerationFailed => write!(f, "SBOM Generation Failed (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Adapter-level errors.
///
/// Uses thiserror to derive Display and Error traits automatically,
/// reducing boilerplate while maintaining user-friendly error messages.
#[derive(Debug, Error)]
pub enum SbomError {
    #[error("Project manifest not found: {path}\n\n💡 Hint: {suggestion}")]
    ManifestNotFound { path: PathBuf, suggestion: String },

    #[error("Failed to parse project manifest: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the manifest is valid TOML with a [project] table")]
    ManifestParseError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that you have write permissions for the output directory")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Invalid project path: {path}\nReason: {reason}\n\n💡 Hint: Please specify a valid project directory")]
    InvalidProjectPath { path: PathBuf, reason: String },

    /// Validation error for value objects
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },
}

/// Failures raised while orchestrating SBOM generation.
///
/// `GenerationFailure`, `IoFailure` and `MergeTimeout` are recoverable under
/// ContinueOnError. `ConfigurationMismatch` and `InvalidConfiguration` are
/// always fatal.
#[derive(Debug, Error)]
pub enum OrchestrationError {
    #[error("SBOM generation failed: {source:#}")]
    GenerationFailure {
        #[source]
        source: anyhow::Error,
    },

    #[error("Inner build for project '{project}' reported target '{target}', which is not one of the declared targets [{expected}]")]
    ConfigurationMismatch {
        project: String,
        target: String,
        expected: String,
    },

    #[error("Timed out after {waited:?} waiting for inner builds of {key}: {received} of {expected} target(s) reported")]
    MergeTimeout {
        key: String,
        received: usize,
        expected: usize,
        waited: Duration,
    },

    #[error("SBOM artifact I/O failed: {source:#}")]
    IoFailure {
        #[source]
        source: anyhow::Error,
    },

    #[error("Invalid SBOM configuration: {reason}")]
    InvalidConfiguration { reason: String },
}

impl OrchestrationError {
    pub fn generation(source: impl Into<anyhow::Error>) -> Self {
        OrchestrationError::GenerationFailure {
            source: source.into(),
        }
    }

    pub fn io(source: impl Into<anyhow::Error>) -> Self {
        OrchestrationError::IoFailure {
            source: source.into(),
        }
    }

    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        OrchestrationError::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Whether ContinueOnError may downgrade this failure to a warning
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            OrchestrationError::GenerationFailure { .. }
                | OrchestrationError::IoFailure { .. }
                | OrchestrationError::MergeTimeout { .. }
        )
    }

    /// Exit code reported to the host when this error is fatal
    pub fn exit_code(&self) -> ExitCode {
        if self.is_recoverable() {
            ExitCode::SbomGenerationFailed
        } else {
            ExitCode::ApplicationError
        }
    }
}
