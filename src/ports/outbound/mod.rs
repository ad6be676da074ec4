/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the orchestration core uses
/// to interact with external systems (resolution, BOM construction,
/// file system, console).
pub mod artifact_writer;
pub mod bom_builder;
pub mod dependency_resolver;
pub mod fingerprint_store;
pub mod formatter;
pub mod progress_reporter;

pub use artifact_writer::ArtifactWriter;
pub use bom_builder::{BomBuilder, BomOptions};
pub use dependency_resolver::DependencyResolver;
pub use fingerprint_store::FingerprintStore;
pub use formatter::SbomFormatter;
pub use progress_reporter::ProgressReporter;
