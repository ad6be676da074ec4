pub mod artifact;
pub mod bom_document;
pub mod component;
pub mod dependency_set;
pub mod fingerprint;
pub mod invocation;
pub mod outcome;
pub mod output_format;
pub mod sbom_metadata;

pub use artifact::{ArtifactLocation, SbomArtifact, DEFAULT_FILENAME};
pub use bom_document::{BomComponent, BomDocument};
pub use component::{Component, ComponentKey, PackageName, Version, DEFAULT_ORIGIN};
pub use dependency_set::{DependencySet, MergedDependencySet};
pub use fingerprint::{Fingerprint, FingerprintRecord};
pub use invocation::{
    BuildInvocation, BuildKey, CommandKind, InvocationRole, ProjectLayout, ProjectRef, TargetId,
};
pub use outcome::{OrchestrationOutcome, OutcomeStatus};
pub use output_format::OutputFormat;
pub use sbom_metadata::{MetadataComponent, SbomMetadata};
