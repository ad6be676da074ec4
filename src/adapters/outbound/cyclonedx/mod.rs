/// CycloneDX document assembly
mod bom_builder;

pub use bom_builder::CycloneDxBomBuilder;
