/// Domain layer - SBOM orchestration business logic
///
/// Pure value objects, services and policies with no I/O beyond
/// reading file timestamps for fingerprints.
pub mod domain;
pub mod policies;
pub mod services;
