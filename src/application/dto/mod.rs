/// Data Transfer Objects for application layer
///
/// DTOs are used to transfer data between the application layer
/// and adapters, keeping the domain layer isolated.
mod orchestration_config;

pub use crate::sbom_generation::domain::OutputFormat;
pub use orchestration_config::{
    OrchestrationConfig, PropertyBag, DEFAULT_MERGE_TIMEOUT, KNOWN_PROPERTIES,
    PROP_CONTINUE_ON_ERROR, PROP_DISABLE_SERIAL_NUMBER, PROP_ENABLE_INCREMENTAL_BUILD,
    PROP_EXCLUDE_DEV_DEPENDENCIES, PROP_EXCLUDE_TEST_PROJECTS, PROP_GENERATE_SBOM,
    PROP_MERGE_TIMEOUT_SECONDS, PROP_OUTPUT_DIRECTORY, PROP_OUTPUT_FILENAME,
    PROP_OUTPUT_FORMAT, PROP_TOOL_VERSION,
};
