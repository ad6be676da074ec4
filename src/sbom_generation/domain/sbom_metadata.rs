/// The component the SBOM describes (the project being built)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataComponent {
    pub bom_ref: String,
    pub component_type: String,
    pub name: String,
    pub version: String,
}

impl MetadataComponent {
    pub fn application(name: impl Into<String>, version: impl Into<String>) -> Self {
        let name = name.into();
        let version = version.into();
        Self {
            bom_ref: format!("{}@{}", name, version),
            component_type: "application".to_string(),
            name,
            version,
        }
    }
}

/// SbomMetadata value object representing SBOM metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SbomMetadata {
    timestamp: String,
    tool_name: String,
    tool_version: String,
    component: MetadataComponent,
}

impl SbomMetadata {
    pub fn new(
        timestamp: String,
        tool_name: String,
        tool_version: String,
        component: MetadataComponent,
    ) -> Self {
        Self {
            timestamp,
            tool_name,
            tool_version,
            component,
        }
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn tool_version(&self) -> &str {
        &self.tool_version
    }

    pub fn component(&self) -> &MetadataComponent {
        &self.component
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sbom_metadata_new() {
        let metadata = SbomMetadata::new(
            "2024-01-01T00:00:00Z".to_string(),
            "build-sbom".to_string(),
            "0.1.0".to_string(),
            MetadataComponent::application("App", "1.0.0"),
        );

        assert_eq!(metadata.timestamp(), "2024-01-01T00:00:00Z");
        assert_eq!(metadata.tool_name(), "build-sbom");
        assert_eq!(metadata.tool_version(), "0.1.0");
        assert_eq!(metadata.component().name, "App");
        assert_eq!(metadata.component().bom_ref, "App@1.0.0");
        assert_eq!(metadata.component().component_type, "application");
    }
}
