/// Use cases module containing application business logic orchestration
mod orchestrate_sbom;

pub use orchestrate_sbom::{artifact_location, publish_directory, BomOrchestrator};
