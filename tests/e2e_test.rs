/// End-to-end tests for the CLI
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const MULTI_TARGET_MANIFEST: &str = r#"
[project]
name = "App"
version = "1.2.0"
targets = ["net6.0", "net8.0"]

[[package]]
name = "X"
version = "1.0.0"
targets = ["net6.0"]

[[package]]
name = "Y"
version = "2.0.0"

[[package]]
name = "Z"
version = "3.0.0"
targets = ["net8.0"]

[[package]]
name = "StyleCop.Analyzers"
version = "1.1.118"
dev = true
"#;

const SINGLE_TARGET_MANIFEST: &str = r#"
[project]
name = "Lib"
targets = ["net8.0"]

[[package]]
name = "Serilog"
version = "3.1.1"
"#;

fn project_with(manifest: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("sbom-project.toml"), manifest).unwrap();
    dir
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn component_names(path: &Path) -> Vec<String> {
    read_json(path)["components"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect()
}

// Exit code tests for CLI
mod exit_code_tests {
    use super::*;

    /// Exit code 0: Success - normal execution
    #[test]
    fn test_exit_code_success() {
        let dir = project_with(SINGLE_TARGET_MANIFEST);
        cargo_bin_cmd!("build-sbom")
            .arg("build")
            .arg("--project-dir")
            .arg(dir.path())
            .assert()
            .code(0);
    }

    /// Exit code 0: --help should return success
    #[test]
    fn test_exit_code_help() {
        cargo_bin_cmd!("build-sbom").arg("--help").assert().code(0);
    }

    /// Exit code 0: --version should return success
    #[test]
    fn test_exit_code_version() {
        cargo_bin_cmd!("build-sbom").arg("--version").assert().code(0);
    }

    /// Exit code 2: Invalid arguments
    #[test]
    fn test_exit_code_invalid_argument() {
        cargo_bin_cmd!("build-sbom")
            .args(["build", "--invalid-option"])
            .assert()
            .code(2);
    }

    /// Exit code 2: Unknown command
    #[test]
    fn test_exit_code_unknown_command() {
        cargo_bin_cmd!("build-sbom").arg("restore").assert().code(2);
    }

    /// Exit code 2: Malformed property
    #[test]
    fn test_exit_code_malformed_property() {
        cargo_bin_cmd!("build-sbom")
            .args(["build", "-p", "OutputFormat"])
            .assert()
            .code(2);
    }

    /// Exit code 3: Application error - non-existent project path
    #[test]
    fn test_exit_code_application_error_nonexistent_path() {
        cargo_bin_cmd!("build-sbom")
            .args([
                "build",
                "--project-dir",
                "/nonexistent/path/that/does/not/exist",
            ])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Directory does not exist"));
    }

    /// Exit code 3: Application error - missing manifest
    #[test]
    fn test_exit_code_application_error_missing_manifest() {
        let dir = TempDir::new().unwrap();
        cargo_bin_cmd!("build-sbom")
            .arg("build")
            .arg("--project-dir")
            .arg(dir.path())
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Project manifest not found"));
    }

    /// Exit code 3: Application error - invalid property value
    #[test]
    fn test_exit_code_application_error_invalid_property() {
        let dir = project_with(SINGLE_TARGET_MANIFEST);
        cargo_bin_cmd!("build-sbom")
            .arg("build")
            .arg("--project-dir")
            .arg(dir.path())
            .args(["-p", "OutputFormat=yaml"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Invalid SBOM configuration"));
    }
}

mod build_tests {
    use super::*;

    #[test]
    fn test_multi_target_build_writes_single_consolidated_sbom() {
        let dir = project_with(MULTI_TARGET_MANIFEST);

        cargo_bin_cmd!("build-sbom")
            .arg("build")
            .arg("--project-dir")
            .arg(dir.path())
            .assert()
            .success()
            .stderr(predicate::str::contains("SBOM written"));

        let sbom = dir.path().join("bin/Debug/sbom.json");
        assert_eq!(
            component_names(&sbom),
            vec!["StyleCop.Analyzers", "X", "Y", "Z"]
        );
        assert!(!dir.path().join("bin/Debug/net6.0/sbom.json").exists());
        assert!(!dir.path().join("bin/Debug/net8.0/sbom.json").exists());
    }

    #[test]
    fn test_exclude_dev_dependencies() {
        let dir = project_with(MULTI_TARGET_MANIFEST);

        cargo_bin_cmd!("build-sbom")
            .arg("pack")
            .arg("--project-dir")
            .arg(dir.path())
            .args(["-c", "Release", "-p", "ExcludeDevDependencies=true"])
            .assert()
            .success();

        assert_eq!(
            component_names(&dir.path().join("bin/Release/sbom.json")),
            vec!["X", "Y", "Z"]
        );
    }

    #[test]
    fn test_exclude_dev_keeps_package_used_at_runtime_by_another_target() {
        let dir = project_with(
            r#"
[project]
name = "App"
targets = ["net6.0", "net8.0"]

[[package]]
name = "X"
version = "1.0.0"
targets = ["net6.0"]
dev = true

[[package]]
name = "X"
version = "1.0.0"
targets = ["net8.0"]
"#,
        );

        cargo_bin_cmd!("build-sbom")
            .arg("build")
            .arg("--project-dir")
            .arg(dir.path())
            .args(["-p", "ExcludeDevDependencies=true"])
            .assert()
            .success();

        assert_eq!(
            component_names(&dir.path().join("bin/Debug/sbom.json")),
            vec!["X"]
        );
    }

    #[test]
    fn test_custom_location_and_xml_format() {
        let dir = project_with(SINGLE_TARGET_MANIFEST);

        cargo_bin_cmd!("build-sbom")
            .arg("build")
            .arg("--project-dir")
            .arg(dir.path())
            .args([
                "-p",
                "OutputDirectory=out/sbom",
                "-p",
                "OutputFilename=bom",
                "-p",
                "OutputFormat=xml",
            ])
            .assert()
            .success();

        let content = fs::read_to_string(dir.path().join("out/sbom/bom.xml")).unwrap();
        assert!(content.contains("xmlns=\"http://cyclonedx.org/schema/bom/1.6\""));
        assert!(content.contains("<purl>pkg:nuget/Serilog@3.1.1</purl>"));
        assert!(!dir.path().join("bin/Debug/net8.0/sbom.json").exists());
    }

    #[test]
    fn test_disable_serial_number() {
        let dir = project_with(SINGLE_TARGET_MANIFEST);

        cargo_bin_cmd!("build-sbom")
            .arg("build")
            .arg("--project-dir")
            .arg(dir.path())
            .args(["-p", "DisableSerialNumber=true"])
            .assert()
            .success();

        let document = read_json(&dir.path().join("bin/Debug/net8.0/sbom.json"));
        assert!(document.get("serialNumber").is_none());
    }

    #[test]
    fn test_generation_disabled_writes_nothing() {
        let dir = project_with(MULTI_TARGET_MANIFEST);

        cargo_bin_cmd!("build-sbom")
            .arg("build")
            .arg("--project-dir")
            .arg(dir.path())
            .args(["-p", "GenerateSbom=false"])
            .assert()
            .success()
            .stderr(predicate::str::is_empty());

        assert!(!dir.path().join("bin").exists());
    }

    #[test]
    fn test_generation_disabled_ignores_invalid_settings() {
        let dir = project_with(MULTI_TARGET_MANIFEST);

        cargo_bin_cmd!("build-sbom")
            .arg("publish")
            .arg("--project-dir")
            .arg(dir.path())
            .args([
                "-p",
                "GenerateSbom=false",
                "-p",
                "OutputFormat=spdx",
                "-p",
                "MergeTimeoutSeconds=0",
            ])
            .assert()
            .code(0)
            .stderr(predicate::str::is_empty());

        assert!(!dir.path().join("bin").exists());
    }

    #[test]
    fn test_generation_disabled_without_manifest_succeeds() {
        let dir = TempDir::new().unwrap();

        cargo_bin_cmd!("build-sbom")
            .arg("build")
            .arg("--project-dir")
            .arg(dir.path())
            .args(["-p", "GenerateSbom=false"])
            .assert()
            .code(0);
    }

    #[test]
    fn test_newer_tool_version_warns_and_succeeds() {
        let dir = project_with(SINGLE_TARGET_MANIFEST);

        cargo_bin_cmd!("build-sbom")
            .arg("build")
            .arg("--project-dir")
            .arg(dir.path())
            .args(["-p", "ToolVersion=999.999.999"])
            .assert()
            .code(0)
            .stderr(predicate::str::contains("Warning"));

        assert!(!dir.path().join("bin/Debug/net8.0/sbom.json").exists());
    }

    #[test]
    fn test_newer_tool_version_fails_without_continue_on_error() {
        let dir = project_with(SINGLE_TARGET_MANIFEST);

        cargo_bin_cmd!("build-sbom")
            .arg("build")
            .arg("--project-dir")
            .arg(dir.path())
            .args(["-p", "ToolVersion=999.999.999", "-p", "ContinueOnError=false"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("SBOM generation failed"));
    }

    #[test]
    fn test_unknown_property_warns() {
        let dir = project_with(SINGLE_TARGET_MANIFEST);

        cargo_bin_cmd!("build-sbom")
            .arg("build")
            .arg("--project-dir")
            .arg(dir.path())
            .args(["-p", "SbomFlavor=spicy"])
            .assert()
            .success()
            .stderr(predicate::str::contains("Unknown property 'SbomFlavor'"));
    }

    #[test]
    fn test_incremental_build_reports_up_to_date() {
        let dir = project_with(SINGLE_TARGET_MANIFEST);
        let run = || {
            cargo_bin_cmd!("build-sbom")
                .arg("build")
                .arg("--project-dir")
                .arg(dir.path())
                .args(["-p", "EnableIncrementalBuild=true"])
                .assert()
                .success()
        };

        run();
        let sbom = dir.path().join("bin/Debug/net8.0/sbom.json");
        let first = fs::read(&sbom).unwrap();

        run().stderr(predicate::str::contains("SBOM is up to date"));
        assert_eq!(fs::read(&sbom).unwrap(), first);
    }
}

mod publish_and_clean_tests {
    use super::*;

    #[test]
    fn test_publish_copies_sbom() {
        let dir = project_with(MULTI_TARGET_MANIFEST);

        cargo_bin_cmd!("build-sbom")
            .arg("publish")
            .arg("--project-dir")
            .arg(dir.path())
            .args(["-c", "Release", "-f", "net8.0"])
            .assert()
            .success()
            .stderr(predicate::str::contains("SBOM copied to publish output"));

        let built = dir.path().join("bin/Release/sbom.json");
        let published = dir.path().join("bin/Release/net8.0/publish/sbom.json");
        assert_eq!(fs::read(&published).unwrap(), fs::read(&built).unwrap());
    }

    #[test]
    fn test_publish_single_target_without_framework() {
        let dir = project_with(SINGLE_TARGET_MANIFEST);

        cargo_bin_cmd!("build-sbom")
            .arg("publish")
            .arg("--project-dir")
            .arg(dir.path())
            .assert()
            .success();

        assert!(dir
            .path()
            .join("bin/Debug/net8.0/publish/sbom.json")
            .exists());
    }

    #[test]
    fn test_ambiguous_multi_target_publish_is_rejected() {
        let dir = project_with(MULTI_TARGET_MANIFEST);

        cargo_bin_cmd!("build-sbom")
            .arg("publish")
            .arg("--project-dir")
            .arg(dir.path())
            .assert()
            .code(3)
            .stderr(predicate::str::contains("net6.0, net8.0"));

        assert!(!dir.path().join("bin").exists());
    }

    #[test]
    fn test_undeclared_framework_is_rejected() {
        let dir = project_with(MULTI_TARGET_MANIFEST);

        cargo_bin_cmd!("build-sbom")
            .arg("publish")
            .arg("--project-dir")
            .arg(dir.path())
            .args(["-f", "net9.0"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("net9.0"));
    }

    #[test]
    fn test_clean_removes_sbom() {
        let dir = project_with(SINGLE_TARGET_MANIFEST);
        let sbom = dir.path().join("bin/Debug/net8.0/sbom.json");

        cargo_bin_cmd!("build-sbom")
            .arg("build")
            .arg("--project-dir")
            .arg(dir.path())
            .assert()
            .success();
        assert!(sbom.exists());

        cargo_bin_cmd!("build-sbom")
            .arg("clean")
            .arg("--project-dir")
            .arg(dir.path())
            .assert()
            .success()
            .stderr(predicate::str::contains("Removed SBOM"));
        assert!(!sbom.exists());

        // Cleaning again is not an error
        cargo_bin_cmd!("build-sbom")
            .arg("clean")
            .arg("--project-dir")
            .arg(dir.path())
            .assert()
            .success();
    }
}
