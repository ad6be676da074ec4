//! Configuration file support for build-sbom.
//!
//! Provides YAML-based configuration through `build-sbom.config.yml` files.
//! Keys are the snake_case forms of the orchestration property names; the
//! loaded file is flattened into a property bag that `-p Name=Value`
//! arguments then override.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::application::dto::{
    PropertyBag, PROP_CONTINUE_ON_ERROR, PROP_DISABLE_SERIAL_NUMBER, PROP_ENABLE_INCREMENTAL_BUILD,
    PROP_EXCLUDE_DEV_DEPENDENCIES, PROP_EXCLUDE_TEST_PROJECTS, PROP_GENERATE_SBOM,
    PROP_MERGE_TIMEOUT_SECONDS, PROP_OUTPUT_DIRECTORY, PROP_OUTPUT_FILENAME, PROP_OUTPUT_FORMAT,
    PROP_TOOL_VERSION,
};
use crate::shared::security::validate_regular_file;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "build-sbom.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub generate_sbom: Option<bool>,
    pub output_directory: Option<String>,
    pub output_format: Option<String>,
    pub output_filename: Option<String>,
    pub disable_serial_number: Option<bool>,
    pub exclude_dev_dependencies: Option<bool>,
    pub exclude_test_projects: Option<bool>,
    pub continue_on_error: Option<bool>,
    pub tool_version: Option<String>,
    pub enable_incremental_build: Option<bool>,
    pub merge_timeout_seconds: Option<u64>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: BTreeMap<String, serde_yaml_ng::Value>,
}

impl ConfigFile {
    /// Flattens the file into property-bag form
    pub fn to_properties(&self) -> PropertyBag {
        let mut properties = PropertyBag::new();
        let mut put = |name: &str, value: Option<String>| {
            if let Some(value) = value {
                properties.insert(name.to_string(), value);
            }
        };

        put(PROP_GENERATE_SBOM, self.generate_sbom.map(|v| v.to_string()));
        put(PROP_OUTPUT_DIRECTORY, self.output_directory.clone());
        put(PROP_OUTPUT_FORMAT, self.output_format.clone());
        put(PROP_OUTPUT_FILENAME, self.output_filename.clone());
        put(
            PROP_DISABLE_SERIAL_NUMBER,
            self.disable_serial_number.map(|v| v.to_string()),
        );
        put(
            PROP_EXCLUDE_DEV_DEPENDENCIES,
            self.exclude_dev_dependencies.map(|v| v.to_string()),
        );
        put(
            PROP_EXCLUDE_TEST_PROJECTS,
            self.exclude_test_projects.map(|v| v.to_string()),
        );
        put(
            PROP_CONTINUE_ON_ERROR,
            self.continue_on_error.map(|v| v.to_string()),
        );
        put(PROP_TOOL_VERSION, self.tool_version.clone());
        put(
            PROP_ENABLE_INCREMENTAL_BUILD,
            self.enable_incremental_build.map(|v| v.to_string()),
        );
        put(
            PROP_MERGE_TIMEOUT_SECONDS,
            self.merge_timeout_seconds.map(|v| v.to_string()),
        );
        properties
    }

    pub fn unknown_field_names(&self) -> impl Iterator<Item = &str> {
        self.unknown_fields.keys().map(String::as_str)
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    validate_regular_file(path, "config file").with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Sets `name` in `properties`, replacing any entry whose name differs only in case.
pub fn override_property(properties: &mut PropertyBag, name: &str, value: &str) {
    properties.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
    properties.insert(name.to_string(), value.to_string());
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(ref filename) = config.output_filename {
        if filename.trim().is_empty() {
            bail!(
                "Invalid config: output_filename must not be empty.\n\n\
                 💡 Hint: Remove the key to use the default file name 'sbom'."
            );
        }
    }
    if config.merge_timeout_seconds == Some(0) {
        bail!(
            "Invalid config: merge_timeout_seconds must be greater than zero.\n\n\
             💡 Hint: Remove the key to use the default of 120 seconds."
        );
    }
    Ok(())
}
