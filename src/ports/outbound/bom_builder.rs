use crate::sbom_generation::domain::{BomDocument, DependencySet, ProjectRef};
use crate::shared::Result;

/// Options passed to the BOM builder alongside the components
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BomOptions {
    /// Project described by `metadata.component`
    pub project: ProjectRef,
    /// Emit a `urn:uuid:` serial number
    pub include_serial_number: bool,
    /// Pinned tool version; None uses the running tool
    pub tool_version: Option<String>,
}

/// BomBuilder port for turning a dependency set into a CycloneDX document
pub trait BomBuilder: Send + Sync {
    /// Version recorded in `metadata.tools` for the given pin
    fn effective_tool_version(&self, pinned: Option<&str>) -> String;

    /// Builds the document
    ///
    /// # Errors
    /// Returns an error if the pinned tool version cannot be used or
    /// the component data is unusable
    fn build(&self, components: &DependencySet, options: &BomOptions) -> Result<BomDocument>;
}
