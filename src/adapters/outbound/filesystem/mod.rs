/// Filesystem adapters for the project manifest, SBOM artifacts and fingerprints
mod artifact_writer;
mod fingerprint_store;
mod manifest_reader;

pub use artifact_writer::FileSystemArtifactWriter;
pub use fingerprint_store::SidecarFingerprintStore;
pub use manifest_reader::{
    ManifestDependencyResolver, PackageEntry, ProjectManifest, ProjectSection, MANIFEST_FILE,
};
