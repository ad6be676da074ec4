/// Shared utilities used across every layer
pub mod error;
pub mod result;
pub mod security;

pub use error::{ExitCode, OrchestrationError, SbomError};
pub use result::Result;
