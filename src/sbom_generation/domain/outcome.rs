use super::artifact::SbomArtifact;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Generated,
    SkippedUpToDate,
    SkippedDisabled,
    SkippedInnerDeferred,
    Failed,
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OutcomeStatus::Generated => "generated",
            OutcomeStatus::SkippedUpToDate => "up to date",
            OutcomeStatus::SkippedDisabled => "disabled",
            OutcomeStatus::SkippedInnerDeferred => "deferred to outer build",
            OutcomeStatus::Failed => "failed",
        };
        write!(f, "{}", label)
    }
}

/// Result of one orchestrator run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestrationOutcome {
    pub status: OutcomeStatus,
    pub artifact: Option<SbomArtifact>,
    pub error: Option<String>,
}

impl OrchestrationOutcome {
    pub fn generated(artifact: SbomArtifact) -> Self {
        Self {
            status: OutcomeStatus::Generated,
            artifact: Some(artifact),
            error: None,
        }
    }

    pub fn up_to_date(artifact: Option<SbomArtifact>) -> Self {
        Self {
            status: OutcomeStatus::SkippedUpToDate,
            artifact,
            error: None,
        }
    }

    pub fn disabled() -> Self {
        Self {
            status: OutcomeStatus::SkippedDisabled,
            artifact: None,
            error: None,
        }
    }

    pub fn inner_deferred() -> Self {
        Self {
            status: OutcomeStatus::SkippedInnerDeferred,
            artifact: None,
            error: None,
        }
    }

    /// A swallowed failure: behaves like a disabled run but keeps the detail
    pub fn suppressed_failure(detail: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::SkippedDisabled,
            artifact: None,
            error: Some(detail.into()),
        }
    }

    /// Artifact to copy on publish, if this run left one behind
    pub fn publishable_artifact(&self) -> Option<&SbomArtifact> {
        match self.status {
            OutcomeStatus::Generated | OutcomeStatus::SkippedUpToDate => self.artifact.as_ref(),
            _ => None,
        }
    }
}
