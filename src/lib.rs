//! build-sbom - build-integrated CycloneDX SBOM generation
//!
//! This library hooks SBOM generation into a host build pass. It decides
//! whether to generate at all, consolidates multi-target builds into a single
//! SBOM, skips regeneration when nothing relevant changed, and writes the
//! artifact atomically, following hexagonal architecture and Domain-Driven
//! Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`sbom_generation`): Pure business logic and domain models
//! - **Application Layer** (`application`): Use cases and application services
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use build_sbom::prelude::*;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<()> {
//! // Read the project description
//! let resolver = ManifestDependencyResolver::new();
//! let manifest = resolver.read_manifest(Path::new("."))?;
//! let invocation = BuildInvocation::outer(
//!     manifest.project_ref(Path::new(".")),
//!     "Release",
//!     manifest.target_ids()?,
//!     CommandKind::Build,
//! );
//!
//! // Create use case; every invocation of one build session shares the coordinator
//! let orchestrator = BomOrchestrator::new(
//!     resolver,
//!     CycloneDxBomBuilder::new(),
//!     FileSystemArtifactWriter::new(),
//!     SidecarFingerprintStore::new(),
//!     StderrProgressReporter::new(),
//!     Arc::new(TargetCoordinator::new()),
//! );
//!
//! // Execute
//! let config = OrchestrationConfig::from_properties(&PropertyBag::new())?;
//! let outcome = orchestrator.run(&invocation, &config).await?;
//! println!("{}", outcome.status);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod ports;
pub mod sbom_generation;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::cyclonedx::CycloneDxBomBuilder;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemArtifactWriter, ManifestDependencyResolver, ProjectManifest,
        SidecarFingerprintStore,
    };
    pub use crate::adapters::outbound::formatters::{CycloneDxJsonFormatter, CycloneDxXmlFormatter};
    pub use crate::application::dto::{OrchestrationConfig, OutputFormat, PropertyBag};
    pub use crate::application::factories::FormatterFactory;
    pub use crate::application::services::{MergeAttempt, TargetCoordinator};
    pub use crate::application::use_cases::{artifact_location, publish_directory, BomOrchestrator};
    pub use crate::ports::inbound::SbomOrchestrationPort;
    pub use crate::ports::outbound::{
        ArtifactWriter, BomBuilder, BomOptions, DependencyResolver, FingerprintStore,
        ProgressReporter, SbomFormatter,
    };
    pub use crate::sbom_generation::domain::{
        ArtifactLocation, BomDocument, BuildInvocation, BuildKey, CommandKind, Component,
        DependencySet, FingerprintRecord, OrchestrationOutcome, OutcomeStatus, ProjectRef,
        SbomArtifact, TargetId,
    };
    pub use crate::sbom_generation::policies::FailurePolicy;
    pub use crate::sbom_generation::services::{
        ComponentFilter, FingerprintCalculator, InputStamp, SbomGenerator,
    };
    pub use crate::shared::{ExitCode, OrchestrationError, Result};
}
