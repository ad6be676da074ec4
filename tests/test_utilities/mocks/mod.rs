/// Mock implementations for testing
mod mock_dependency_resolver;
mod mock_progress_reporter;

pub use mock_dependency_resolver::MockDependencyResolver;
pub use mock_progress_reporter::MockProgressReporter;
