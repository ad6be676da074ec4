use crate::ports::outbound::SbomFormatter;
use crate::sbom_generation::domain::{BomComponent, BomDocument, MetadataComponent};
use crate::shared::Result;
use std::fmt::Write;

const CYCLONEDX_NAMESPACE: &str = "http://cyclonedx.org/schema/bom/1.6";

/// CycloneDxXmlFormatter adapter for generating CycloneDX 1.6 XML format
///
/// The document shape is small and fixed, so it is rendered directly with
/// entity escaping rather than through a generic XML serializer.
pub struct CycloneDxXmlFormatter;

impl CycloneDxXmlFormatter {
    pub fn new() -> Self {
        Self
    }

    fn render(document: &BomDocument, out: &mut String) -> std::fmt::Result {
        let metadata = &document.metadata;

        writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        write!(out, r#"<bom xmlns="{}""#, CYCLONEDX_NAMESPACE)?;
        if let Some(serial) = &document.serial_number {
            write!(out, r#" serialNumber="{}""#, escape(serial))?;
        }
        writeln!(out, r#" version="{}">"#, document.version)?;

        writeln!(out, "  <metadata>")?;
        writeln!(
            out,
            "    <timestamp>{}</timestamp>",
            escape(metadata.timestamp())
        )?;
        writeln!(out, "    <tools>")?;
        writeln!(out, "      <tool>")?;
        writeln!(out, "        <name>{}</name>", escape(metadata.tool_name()))?;
        writeln!(
            out,
            "        <version>{}</version>",
            escape(metadata.tool_version())
        )?;
        writeln!(out, "      </tool>")?;
        writeln!(out, "    </tools>")?;
        write_metadata_component(out, metadata.component())?;
        writeln!(out, "  </metadata>")?;

        if document.components.is_empty() {
            writeln!(out, "  <components />")?;
        } else {
            writeln!(out, "  <components>")?;
            for component in &document.components {
                write_component(out, component)?;
            }
            writeln!(out, "  </components>")?;
        }

        writeln!(out, "</bom>")
    }
}

impl Default for CycloneDxXmlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl SbomFormatter for CycloneDxXmlFormatter {
    fn format(&self, document: &BomDocument) -> Result<String> {
        let mut out = String::new();
        Self::render(document, &mut out)
            .map_err(|e| anyhow::anyhow!("Failed to render CycloneDX XML: {}", e))?;
        Ok(out)
    }
}

fn write_metadata_component(out: &mut String, component: &MetadataComponent) -> std::fmt::Result {
    writeln!(
        out,
        r#"    <component type="{}" bom-ref="{}">"#,
        escape(&component.component_type),
        escape(&component.bom_ref)
    )?;
    writeln!(out, "      <name>{}</name>", escape(&component.name))?;
    writeln!(out, "      <version>{}</version>", escape(&component.version))?;
    writeln!(out, "    </component>")
}

fn write_component(out: &mut String, component: &BomComponent) -> std::fmt::Result {
    writeln!(
        out,
        r#"    <component type="{}" bom-ref="{}">"#,
        escape(&component.component_type),
        escape(&component.bom_ref)
    )?;
    writeln!(out, "      <name>{}</name>", escape(&component.name))?;
    writeln!(out, "      <version>{}</version>", escape(&component.version))?;
    writeln!(out, "      <purl>{}</purl>", escape(&component.purl))?;
    writeln!(out, "    </component>")
}

/// Escapes the five predefined XML entities
fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
