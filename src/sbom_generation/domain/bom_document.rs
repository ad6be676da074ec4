use super::component::Component;
use super::sbom_metadata::SbomMetadata;

pub const BOM_FORMAT: &str = "CycloneDX";
pub const SPEC_VERSION: &str = "1.6";

/// One `components[]` entry of the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BomComponent {
    pub bom_ref: String,
    pub component_type: String,
    pub name: String,
    pub version: String,
    pub purl: String,
}

impl From<&Component> for BomComponent {
    fn from(component: &Component) -> Self {
        let purl = component.purl();
        Self {
            bom_ref: purl.clone(),
            component_type: "library".to_string(),
            name: component.name().to_string(),
            version: component.version().to_string(),
            purl,
        }
    }
}

/// Structured BOM returned by the BOM-construction collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BomDocument {
    pub bom_format: String,
    pub spec_version: String,
    pub version: u32,
    pub serial_number: Option<String>,
    pub metadata: SbomMetadata,
    pub components: Vec<BomComponent>,
}

impl BomDocument {
    pub fn new(
        serial_number: Option<String>,
        metadata: SbomMetadata,
        components: Vec<BomComponent>,
    ) -> Self {
        Self {
            bom_format: BOM_FORMAT.to_string(),
            spec_version: SPEC_VERSION.to_string(),
            version: 1,
            serial_number,
            metadata,
            components,
        }
    }

    pub fn without_serial_number(mut self) -> Self {
        self.serial_number = None;
        self
    }
}
