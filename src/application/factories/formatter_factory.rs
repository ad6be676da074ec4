use crate::adapters::outbound::formatters::{CycloneDxJsonFormatter, CycloneDxXmlFormatter};
use crate::application::dto::OutputFormat;
use crate::ports::outbound::SbomFormatter;

/// Factory for creating SBOM formatters
///
/// This factory encapsulates the creation logic for different formatter implementations,
/// following the Factory Pattern. It belongs in the application layer as it orchestrates
/// the selection of infrastructure adapters based on application needs.
pub struct FormatterFactory;

impl FormatterFactory {
    /// Creates a formatter instance for the specified output format
    ///
    /// # Examples
    /// ```
    /// use build_sbom::application::dto::OutputFormat;
    /// use build_sbom::application::factories::FormatterFactory;
    ///
    /// let formatter = FormatterFactory::create(OutputFormat::Xml);
    /// ```
    pub fn create(format: OutputFormat) -> Box<dyn SbomFormatter> {
        match format {
            OutputFormat::Json => Box::new(CycloneDxJsonFormatter::new()),
            OutputFormat::Xml => Box::new(CycloneDxXmlFormatter::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbom_generation::domain::{BomDocument, MetadataComponent, SbomMetadata};

    fn empty_document() -> BomDocument {
        BomDocument::new(
            None,
            SbomMetadata::new(
                "2024-01-01T00:00:00Z".to_string(),
                "build-sbom".to_string(),
                "0.1.0".to_string(),
                MetadataComponent::application("App", "1.0.0"),
            ),
            vec![],
        )
    }

    #[test]
    fn test_create_json_formatter() {
        let output = FormatterFactory::create(OutputFormat::Json)
            .format(&empty_document())
            .unwrap();
        assert!(output.trim_start().starts_with('{'));
    }

    #[test]
    fn test_create_xml_formatter() {
        let output = FormatterFactory::create(OutputFormat::Xml)
            .format(&empty_document())
            .unwrap();
        assert!(output.starts_with("<?xml"));
    }
}
