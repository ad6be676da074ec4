use crate::sbom_generation::domain::BomDocument;
use crate::shared::Result;

/// SbomFormatter port for serializing a BOM document
///
/// This port abstracts the serialization of the document into the
/// configured CycloneDX representation (JSON, XML).
pub trait SbomFormatter {
    /// Serializes the document
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn format(&self, document: &BomDocument) -> Result<String>;
}
