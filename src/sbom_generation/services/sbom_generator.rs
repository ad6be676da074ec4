use crate::sbom_generation::domain::{MetadataComponent, SbomMetadata};
use chrono::Utc;
use uuid::Uuid;

/// Name written to `metadata.tools`
pub const TOOL_NAME: &str = "build-sbom";

/// SbomGenerator service for generating SBOM metadata
///
/// This service contains pure business logic for SBOM metadata generation.
/// It creates metadata conforming to CycloneDX specification.
pub struct SbomGenerator;

impl SbomGenerator {
    /// Generates SBOM metadata with the current timestamp
    pub fn generate_metadata(
        tool_name: &str,
        tool_version: &str,
        component: MetadataComponent,
    ) -> SbomMetadata {
        SbomMetadata::new(
            Utc::now().to_rfc3339(),
            tool_name.to_string(),
            tool_version.to_string(),
            component,
        )
    }

    /// Generates a fresh `urn:uuid:` serial number
    pub fn generate_serial_number() -> String {
        format!("urn:uuid:{}", Uuid::new_v4())
    }

    /// The version of this tool, taken from Cargo.toml at compile time
    pub fn current_tool_version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_metadata() {
        let metadata = SbomGenerator::generate_metadata(
            "test-tool",
            "1.0.0",
            MetadataComponent::application("App", "2.0.0"),
        );

        assert_eq!(metadata.tool_name(), "test-tool");
        assert_eq!(metadata.tool_version(), "1.0.0");
        assert_eq!(metadata.component().name, "App");
        assert!(!metadata.timestamp().is_empty());
    }

    #[test]
    fn test_generate_metadata_timestamp_format() {
        let metadata = SbomGenerator::generate_metadata(
            "test-tool",
            "1.0.0",
            MetadataComponent::application("App", "2.0.0"),
        );
        let timestamp = metadata.timestamp();

        // RFC3339 format should contain 'T' and timezone info
        assert!(timestamp.contains('T'));
        assert!(timestamp.contains('+') || timestamp.contains('Z'));
    }

    #[test]
    fn test_serial_numbers_are_unique() {
        assert_ne!(
            SbomGenerator::generate_serial_number(),
            SbomGenerator::generate_serial_number()
        );
    }

    #[test]
    fn test_serial_number_uuid_format() {
        let serial = SbomGenerator::generate_serial_number();

        // Verify UUID format: urn:uuid:xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx
        let uuid_part = serial.strip_prefix("urn:uuid:").unwrap();
        assert_eq!(uuid_part.len(), 36);
        assert_eq!(uuid_part.matches('-').count(), 4);
    }

    #[test]
    fn test_current_tool_version() {
        assert_eq!(
            SbomGenerator::current_tool_version(),
            env!("CARGO_PKG_VERSION")
        );
    }
}
