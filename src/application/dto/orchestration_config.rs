use crate::sbom_generation::domain::OutputFormat;
use crate::shared::OrchestrationError;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Raw host properties, name -> value
pub type PropertyBag = BTreeMap<String, String>;

pub const PROP_GENERATE_SBOM: &str = "GenerateSbom";
pub const PROP_OUTPUT_DIRECTORY: &str = "OutputDirectory";
pub const PROP_OUTPUT_FORMAT: &str = "OutputFormat";
pub const PROP_OUTPUT_FILENAME: &str = "OutputFilename";
pub const PROP_DISABLE_SERIAL_NUMBER: &str = "DisableSerialNumber";
pub const PROP_EXCLUDE_DEV_DEPENDENCIES: &str = "ExcludeDevDependencies";
pub const PROP_EXCLUDE_TEST_PROJECTS: &str = "ExcludeTestProjects";
pub const PROP_CONTINUE_ON_ERROR: &str = "ContinueOnError";
pub const PROP_TOOL_VERSION: &str = "ToolVersion";
pub const PROP_ENABLE_INCREMENTAL_BUILD: &str = "EnableIncrementalBuild";
pub const PROP_MERGE_TIMEOUT_SECONDS: &str = "MergeTimeoutSeconds";

/// Every property name the orchestrator recognizes
pub const KNOWN_PROPERTIES: &[&str] = &[
    PROP_GENERATE_SBOM,
    PROP_OUTPUT_DIRECTORY,
    PROP_OUTPUT_FORMAT,
    PROP_OUTPUT_FILENAME,
    PROP_DISABLE_SERIAL_NUMBER,
    PROP_EXCLUDE_DEV_DEPENDENCIES,
    PROP_EXCLUDE_TEST_PROJECTS,
    PROP_CONTINUE_ON_ERROR,
    PROP_TOOL_VERSION,
    PROP_ENABLE_INCREMENTAL_BUILD,
    PROP_MERGE_TIMEOUT_SECONDS,
];

pub const DEFAULT_MERGE_TIMEOUT: Duration = Duration::from_secs(120);

/// Resolved configuration for one invocation
///
/// Built once from the host's properties and read-only afterwards.
/// `Default` yields the documented defaults for every option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestrationConfig {
    pub generate_sbom: bool,
    /// None means the project's primary build output directory
    pub output_directory: Option<PathBuf>,
    pub output_format: OutputFormat,
    /// Filename without extension; None means `sbom`
    pub output_filename: Option<String>,
    pub disable_serial_number: bool,
    pub exclude_dev_dependencies: bool,
    pub exclude_test_projects: bool,
    pub continue_on_error: bool,
    pub tool_version: Option<String>,
    pub enable_incremental_build: bool,
    /// Bound on how long an outer build waits for its inner builds
    pub merge_timeout: Duration,
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        Self {
            generate_sbom: true,
            output_directory: None,
            output_format: OutputFormat::Json,
            output_filename: None,
            disable_serial_number: false,
            exclude_dev_dependencies: false,
            exclude_test_projects: false,
            continue_on_error: true,
            tool_version: None,
            enable_incremental_build: false,
            merge_timeout: DEFAULT_MERGE_TIMEOUT,
        }
    }
}

impl OrchestrationConfig {
    /// Builds the configuration from host properties.
    ///
    /// Names match case-insensitively. Empty values mean "unset". Unknown
    /// names are ignored here; see [`OrchestrationConfig::unknown_properties`].
    ///
    /// `GenerateSbom` is resolved first. When it is false the remaining
    /// properties are not validated and the defaults are returned with
    /// generation disabled.
    pub fn from_properties(properties: &PropertyBag) -> Result<Self, OrchestrationError> {
        let lookup = |name: &str| -> Option<&str> {
            properties
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.trim())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        let flag = |name: &str, default: bool| -> Result<bool, OrchestrationError> {
            lookup(name).map_or(Ok(default), |value| parse_bool(name, value))
        };

        if !flag(PROP_GENERATE_SBOM, defaults.generate_sbom)? {
            return Ok(Self::disabled());
        }

        let output_format = match lookup(PROP_OUTPUT_FORMAT) {
            Some(value) => OutputFormat::from_str(value).map_err(|e| {
                OrchestrationError::invalid_configuration(format!("{}: {}", PROP_OUTPUT_FORMAT, e))
            })?,
            None => defaults.output_format,
        };

        let merge_timeout = match lookup(PROP_MERGE_TIMEOUT_SECONDS) {
            Some(value) => {
                let seconds: u64 = value.parse().map_err(|_| {
                    OrchestrationError::invalid_configuration(format!(
                        "{} must be a whole number of seconds, got '{}'",
                        PROP_MERGE_TIMEOUT_SECONDS, value
                    ))
                })?;
                if seconds == 0 {
                    return Err(OrchestrationError::invalid_configuration(format!(
                        "{} must be greater than zero",
                        PROP_MERGE_TIMEOUT_SECONDS
                    )));
                }
                Duration::from_secs(seconds)
            }
            None => defaults.merge_timeout,
        };

        Ok(Self {
            generate_sbom: true,
            output_directory: lookup(PROP_OUTPUT_DIRECTORY).map(PathBuf::from),
            output_format,
            output_filename: lookup(PROP_OUTPUT_FILENAME).map(validate_filename).transpose()?,
            disable_serial_number: flag(
                PROP_DISABLE_SERIAL_NUMBER,
                defaults.disable_serial_number,
            )?,
            exclude_dev_dependencies: flag(
                PROP_EXCLUDE_DEV_DEPENDENCIES,
                defaults.exclude_dev_dependencies,
            )?,
            exclude_test_projects: flag(
                PROP_EXCLUDE_TEST_PROJECTS,
                defaults.exclude_test_projects,
            )?,
            continue_on_error: flag(PROP_CONTINUE_ON_ERROR, defaults.continue_on_error)?,
            tool_version: lookup(PROP_TOOL_VERSION).map(str::to_string),
            enable_incremental_build: flag(
                PROP_ENABLE_INCREMENTAL_BUILD,
                defaults.enable_incremental_build,
            )?,
            merge_timeout,
        })
    }

    /// Defaults with generation switched off
    pub fn disabled() -> Self {
        Self {
            generate_sbom: false,
            ..Self::default()
        }
    }

    /// Property names in the bag that the orchestrator does not recognize
    pub fn unknown_properties(properties: &PropertyBag) -> Vec<&str> {
        properties
            .keys()
            .filter(|key| {
                !KNOWN_PROPERTIES
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(key))
            })
            .map(String::as_str)
            .collect()
    }

    pub fn include_serial_number(&self) -> bool {
        !self.disable_serial_number
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, OrchestrationError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(OrchestrationError::invalid_configuration(format!(
            "{} must be true or false, got '{}'",
            name, value
        ))),
    }
}

fn validate_filename(value: &str) -> Result<String, OrchestrationError> {
    if value.contains(['/', '\\']) || value == "." || value == ".." {
        return Err(OrchestrationError::invalid_configuration(format!(
            "{} must be a plain file name without directories, got '{}'",
            PROP_OUTPUT_FILENAME, value
        )));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bag(entries: &[(&str, &str)]) -> PropertyBag {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = OrchestrationConfig::from_properties(&PropertyBag::new()).unwrap();
        assert_eq!(config, OrchestrationConfig::default());
        assert!(config.generate_sbom);
        assert!(config.continue_on_error);
        assert!(!config.enable_incremental_build);
        assert!(config.include_serial_number());
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.merge_timeout, DEFAULT_MERGE_TIMEOUT);
    }

    #[test]
    fn test_all_properties() {
        let config = OrchestrationConfig::from_properties(&bag(&[
            ("GenerateSbom", "true"),
            ("OutputDirectory", "bin/sbom"),
            ("OutputFormat", "xml"),
            ("OutputFilename", "custom-sbom"),
            ("DisableSerialNumber", "true"),
            ("ExcludeDevDependencies", "true"),
            ("ExcludeTestProjects", "true"),
            ("ContinueOnError", "false"),
            ("ToolVersion", "0.1.0"),
            ("EnableIncrementalBuild", "true"),
            ("MergeTimeoutSeconds", "5"),
        ]))
        .unwrap();

        assert_eq!(config.output_directory, Some(PathBuf::from("bin/sbom")));
        assert_eq!(config.output_format, OutputFormat::Xml);
        assert_eq!(config.output_filename.as_deref(), Some("custom-sbom"));
        assert!(!config.include_serial_number());
        assert!(config.exclude_dev_dependencies);
        assert!(config.exclude_test_projects);
        assert!(!config.continue_on_error);
        assert_eq!(config.tool_version.as_deref(), Some("0.1.0"));
        assert!(config.enable_incremental_build);
        assert_eq!(config.merge_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_names_are_case_insensitive() {
        let config =
            OrchestrationConfig::from_properties(&bag(&[("generatesbom", "FALSE")])).unwrap();
        assert!(!config.generate_sbom);
    }

    #[test]
    fn test_empty_value_means_unset() {
        let config = OrchestrationConfig::from_properties(&bag(&[
            ("OutputDirectory", ""),
            ("ContinueOnError", "  "),
        ]))
        .unwrap();
        assert!(config.output_directory.is_none());
        assert!(config.continue_on_error);
    }

    #[test]
    fn test_invalid_bool() {
        let error =
            OrchestrationConfig::from_properties(&bag(&[("GenerateSbom", "maybe")])).unwrap_err();
        assert!(matches!(
            error,
            OrchestrationError::InvalidConfiguration { .. }
        ));
        assert!(error.to_string().contains("GenerateSbom"));
    }

    #[test]
    fn test_disabled_generation_skips_validation_of_other_properties() {
        let config = OrchestrationConfig::from_properties(&bag(&[
            ("GenerateSbom", "false"),
            ("OutputFormat", "spdx"),
            ("MergeTimeoutSeconds", "0"),
            ("OutputFilename", "../sbom"),
        ]))
        .unwrap();
        assert_eq!(config, OrchestrationConfig::disabled());
        assert!(!config.generate_sbom);
    }

    #[test]
    fn test_invalid_format() {
        let error =
            OrchestrationConfig::from_properties(&bag(&[("OutputFormat", "yaml")])).unwrap_err();
        assert!(error.to_string().contains("yaml"));
    }

    #[test]
    fn test_invalid_merge_timeout() {
        assert!(
            OrchestrationConfig::from_properties(&bag(&[("MergeTimeoutSeconds", "soon")]))
                .is_err()
        );
        assert!(
            OrchestrationConfig::from_properties(&bag(&[("MergeTimeoutSeconds", "0")])).is_err()
        );
    }

    #[test]
    fn test_filename_with_directory_rejected() {
        assert!(
            OrchestrationConfig::from_properties(&bag(&[("OutputFilename", "../sbom")])).is_err()
        );
    }

    #[test]
    fn test_unknown_properties() {
        let properties = bag(&[("GenerateSbom", "true"), ("GenerateSbm", "true")]);
        assert_eq!(
            OrchestrationConfig::unknown_properties(&properties),
            vec!["GenerateSbm"]
        );
    }
}
