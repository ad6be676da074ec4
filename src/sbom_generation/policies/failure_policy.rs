use crate::sbom_generation::domain::OrchestrationOutcome;
use crate::shared::OrchestrationError;

/// What to do with a failed orchestrator run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureDecision {
    /// Log one warning line and let the host build carry on
    Suppress { warning: String },
    /// Fail the host command
    Propagate,
}

/// FailurePolicy - ContinueOnError handling around the orchestrator
///
/// Recoverable failures (generation, I/O, merge timeout) are downgraded to a
/// single warning when continue-on-error is set. Configuration mismatches
/// and invalid configuration always propagate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailurePolicy {
    continue_on_error: bool,
}

impl FailurePolicy {
    pub fn new(continue_on_error: bool) -> Self {
        Self { continue_on_error }
    }

    pub fn decide(&self, error: &OrchestrationError) -> FailureDecision {
        if self.continue_on_error && error.is_recoverable() {
            FailureDecision::Suppress {
                warning: Self::single_line(&error.to_string()),
            }
        } else {
            FailureDecision::Propagate
        }
    }

    /// Applies the policy to a run result, calling `warn` at most once
    pub fn apply(
        &self,
        result: Result<OrchestrationOutcome, OrchestrationError>,
        warn: impl FnOnce(&str),
    ) -> Result<OrchestrationOutcome, OrchestrationError> {
        let mut detail = None;
        let recovered = self.recover(result, |warning| {
            detail = Some(warning.to_string());
            warn(&Self::warning_line(warning));
        })?;
        Ok(recovered.unwrap_or_else(|| {
            OrchestrationOutcome::suppressed_failure(detail.unwrap_or_default())
        }))
    }

    /// Like [`FailurePolicy::apply`] for any step; a suppressed failure
    /// becomes `Ok(None)`
    pub fn recover<T>(
        &self,
        result: Result<T, OrchestrationError>,
        warn: impl FnOnce(&str),
    ) -> Result<Option<T>, OrchestrationError> {
        let error = match result {
            Ok(value) => return Ok(Some(value)),
            Err(error) => error,
        };

        match self.decide(&error) {
            FailureDecision::Suppress { warning } => {
                warn(&warning);
                Ok(None)
            }
            FailureDecision::Propagate => Err(error),
        }
    }

    /// The single line shown to the user for a suppressed failure
    pub fn warning_line(detail: &str) -> String {
        format!("⚠️  Warning: {}", detail)
    }

    fn single_line(message: &str) -> String {
        message
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self::new(true)
    }
}
