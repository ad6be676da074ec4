pub mod component_filter;
pub mod fingerprint_calculator;
pub mod sbom_generator;

pub use component_filter::ComponentFilter;
pub use fingerprint_calculator::{FingerprintCalculator, FingerprintInputs, InputStamp};
pub use sbom_generator::{SbomGenerator, TOOL_NAME};
