use crate::ports::outbound::{BomBuilder, BomOptions};
use crate::sbom_generation::domain::{BomComponent, BomDocument, DependencySet, MetadataComponent};
use crate::sbom_generation::services::{SbomGenerator, TOOL_NAME};
use crate::shared::Result;

/// CycloneDxBomBuilder assembles a CycloneDX document from a dependency set.
///
/// A pinned tool version must be valid semver and must not be newer than the
/// running tool, since the document claims to come from that version.
pub struct CycloneDxBomBuilder {
    running_version: String,
}

impl CycloneDxBomBuilder {
    pub fn new() -> Self {
        Self {
            running_version: SbomGenerator::current_tool_version().to_string(),
        }
    }

    /// Builder that reports `version` as the running tool version
    pub fn with_running_version(version: impl Into<String>) -> Self {
        Self {
            running_version: version.into(),
        }
    }

    fn check_pinned_version(&self, pinned: &str) -> Result<()> {
        let requested = semver::Version::parse(pinned)
            .map_err(|e| anyhow::anyhow!("ToolVersion '{}' is not a valid semantic version: {}", pinned, e))?;
        let running = semver::Version::parse(&self.running_version).map_err(|e| {
            anyhow::anyhow!(
                "Running tool version '{}' is not a valid semantic version: {}",
                self.running_version,
                e
            )
        })?;
        if requested > running {
            anyhow::bail!(
                "ToolVersion {} is newer than the installed {} {}",
                requested,
                TOOL_NAME,
                running
            );
        }
        Ok(())
    }
}

impl Default for CycloneDxBomBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BomBuilder for CycloneDxBomBuilder {
    fn effective_tool_version(&self, pinned: Option<&str>) -> String {
        pinned
            .map(str::to_string)
            .unwrap_or_else(|| self.running_version.clone())
    }

    fn build(&self, components: &DependencySet, options: &BomOptions) -> Result<BomDocument> {
        if let Some(pinned) = options.tool_version.as_deref() {
            self.check_pinned_version(pinned)?;
        }

        let tool_version = self.effective_tool_version(options.tool_version.as_deref());
        let metadata = SbomGenerator::generate_metadata(
            TOOL_NAME,
            &tool_version,
            MetadataComponent::application(
                options.project.name.clone(),
                options.project.version.clone(),
            ),
        );
        let serial_number = options
            .include_serial_number
            .then(SbomGenerator::generate_serial_number);

        Ok(BomDocument::new(
            serial_number,
            metadata,
            components.iter().map(BomComponent::from).collect(),
        ))
    }
}
