/// Type alias for Result with anyhow::Error as the error type.
/// Adapters return this; the orchestration core maps it into `OrchestrationError`.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
