use crate::ports::outbound::SbomFormatter;
use crate::sbom_generation::domain::{BomComponent, BomDocument, MetadataComponent};
use crate::shared::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Bom<'a> {
    #[serde(rename = "bomFormat")]
    bom_format: &'a str,
    #[serde(rename = "specVersion")]
    spec_version: &'a str,
    #[serde(rename = "serialNumber", skip_serializing_if = "Option::is_none")]
    serial_number: Option<&'a str>,
    version: u32,
    metadata: Metadata<'a>,
    components: Vec<Component<'a>>,
}

#[derive(Debug, Serialize)]
struct Metadata<'a> {
    timestamp: &'a str,
    tools: Vec<Tool<'a>>,
    component: Component<'a>,
}

#[derive(Debug, Serialize)]
struct Tool<'a> {
    name: &'a str,
    version: &'a str,
}

#[derive(Debug, Serialize)]
struct Component<'a> {
    #[serde(rename = "type")]
    component_type: &'a str,
    #[serde(rename = "bom-ref")]
    bom_ref: &'a str,
    name: &'a str,
    version: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    purl: Option<&'a str>,
}

impl<'a> From<&'a BomComponent> for Component<'a> {
    fn from(component: &'a BomComponent) -> Self {
        Self {
            component_type: &component.component_type,
            bom_ref: &component.bom_ref,
            name: &component.name,
            version: &component.version,
            purl: Some(&component.purl),
        }
    }
}

impl<'a> From<&'a MetadataComponent> for Component<'a> {
    fn from(component: &'a MetadataComponent) -> Self {
        Self {
            component_type: &component.component_type,
            bom_ref: &component.bom_ref,
            name: &component.name,
            version: &component.version,
            purl: None,
        }
    }
}

/// CycloneDxJsonFormatter adapter for generating CycloneDX 1.6 JSON format
///
/// This adapter implements the SbomFormatter port for CycloneDX JSON.
pub struct CycloneDxJsonFormatter;

impl CycloneDxJsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CycloneDxJsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl SbomFormatter for CycloneDxJsonFormatter {
    fn format(&self, document: &BomDocument) -> Result<String> {
        let metadata = &document.metadata;
        let bom = Bom {
            bom_format: &document.bom_format,
            spec_version: &document.spec_version,
            serial_number: document.serial_number.as_deref(),
            version: document.version,
            metadata: Metadata {
                timestamp: metadata.timestamp(),
                tools: vec![Tool {
                    name: metadata.tool_name(),
                    version: metadata.tool_version(),
                }],
                component: Component::from(metadata.component()),
            },
            components: document.components.iter().map(Component::from).collect(),
        };

        serde_json::to_string_pretty(&bom)
            .map_err(|e| anyhow::anyhow!("Failed to serialize CycloneDX JSON: {}", e))
    }
}
