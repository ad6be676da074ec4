use crate::ports::outbound::DependencyResolver;
use crate::sbom_generation::domain::{
    Component, DependencySet, ProjectRef, TargetId, DEFAULT_ORIGIN,
};
use crate::sbom_generation::services::InputStamp;
use crate::shared::error::SbomError;
use crate::shared::security::validate_regular_file;
use crate::shared::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name of the project manifest in the project directory
pub const MANIFEST_FILE: &str = "sbom-project.toml";

/// Parsed `sbom-project.toml`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectManifest {
    pub project: ProjectSection,
    #[serde(default, rename = "package")]
    pub packages: Vec<PackageEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectSection {
    pub name: String,
    #[serde(default = "default_project_version")]
    pub version: String,
    pub targets: Vec<String>,
}

/// One resolved package
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageEntry {
    pub name: String,
    pub version: String,
    #[serde(default = "default_origin")]
    pub origin: String,
    /// Targets that pull the package in; None means every target
    #[serde(default)]
    pub targets: Option<Vec<String>>,
    #[serde(default)]
    pub dev: bool,
    #[serde(default)]
    pub test_project: bool,
}

fn default_project_version() -> String {
    "1.0.0".to_string()
}

fn default_origin() -> String {
    DEFAULT_ORIGIN.to_string()
}

impl ProjectManifest {
    /// Declared targets in manifest order, without duplicates
    pub fn target_ids(&self) -> Result<Vec<TargetId>> {
        let mut ids: Vec<TargetId> = Vec::with_capacity(self.project.targets.len());
        for raw in &self.project.targets {
            let id = TargetId::new(raw.as_str())?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        if ids.is_empty() {
            anyhow::bail!("[project].targets must declare at least one target");
        }
        Ok(ids)
    }

    pub fn project_ref(&self, directory: &Path) -> ProjectRef {
        ProjectRef::new(
            self.project.name.clone(),
            self.project.version.clone(),
            directory.to_path_buf(),
        )
    }

    /// Components the given target pulls in
    pub fn dependencies_for(&self, target: &TargetId) -> Result<DependencySet> {
        let mut set = DependencySet::new();
        for package in &self.packages {
            let applies = match &package.targets {
                Some(targets) => targets.iter().any(|t| t.trim() == target.as_str()),
                None => true,
            };
            if !applies {
                continue;
            }
            let component = Component::new(package.name.clone(), package.version.clone())?
                .with_origin(package.origin.clone())
                .as_dev(package.dev)
                .as_test_project(package.test_project);
            set.insert(component);
        }
        Ok(set)
    }

    /// Package entries may only name declared targets
    fn validate(&self) -> Result<()> {
        let declared = self.target_ids()?;
        for package in &self.packages {
            for raw in package.targets.iter().flatten() {
                let target = TargetId::new(raw.as_str())?;
                if !declared.contains(&target) {
                    anyhow::bail!(
                        "package '{}' names target '{}', which is not declared in [project].targets",
                        package.name,
                        target
                    );
                }
            }
        }
        Ok(())
    }
}

/// ManifestDependencyResolver adapter reading resolved packages from
/// `sbom-project.toml`
///
/// Stands in for the host's package-resolution step.
pub struct ManifestDependencyResolver;

impl ManifestDependencyResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn manifest_path(project_dir: &Path) -> PathBuf {
        project_dir.join(MANIFEST_FILE)
    }

    /// Reads and validates the manifest of the project in `project_dir`
    pub fn read_manifest(&self, project_dir: &Path) -> Result<ProjectManifest> {
        let manifest_path = Self::manifest_path(project_dir);

        if !manifest_path.exists() {
            return Err(SbomError::ManifestNotFound {
                path: manifest_path,
                suggestion: format!(
                    "{} does not exist in project directory \"{}\".\n   \
                     Please run in the root directory of a project, or specify the correct path with the --project-dir option.",
                    MANIFEST_FILE,
                    project_dir.display()
                ),
            }
            .into());
        }

        let content = self.safe_read_file(&manifest_path)?;
        let manifest: ProjectManifest =
            toml::from_str(&content).map_err(|e| SbomError::ManifestParseError {
                path: manifest_path.clone(),
                details: e.to_string(),
            })?;
        manifest
            .validate()
            .map_err(|e| SbomError::ManifestParseError {
                path: manifest_path,
                details: e.to_string(),
            })?;
        Ok(manifest)
    }

    fn safe_read_file(&self, path: &Path) -> Result<String> {
        validate_regular_file(path, MANIFEST_FILE)?;
        std::fs::read_to_string(path).map_err(|e| {
            SbomError::FileReadError {
                path: path.to_path_buf(),
                details: e.to_string(),
            }
            .into()
        })
    }
}

impl Default for ManifestDependencyResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DependencyResolver for ManifestDependencyResolver {
    async fn resolve(
        &self,
        project: &ProjectRef,
        _configuration: &str,
        target: &TargetId,
    ) -> Result<DependencySet> {
        let manifest = self.read_manifest(&project.directory)?;
        manifest.dependencies_for(target)
    }

    fn input_stamps(&self, project: &ProjectRef) -> Vec<InputStamp> {
        InputStamp::of(&Self::manifest_path(&project.directory))
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"
[project]
name = "App"
version = "2.1.0"
targets = ["net6.0", "net8.0"]

[[package]]
name = "Newtonsoft.Json"
version = "13.0.3"

[[package]]
name = "System.Text.Json"
version = "8.0.0"
targets = ["net6.0"]

[[package]]
name = "StyleCop.Analyzers"
version = "1.1.118"
dev = true

[[package]]
name = "left-pad"
version = "1.3.0"
origin = "npm"
targets = ["net8.0"]
"#;

    fn project_with(content: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), content).unwrap();
        dir
    }

    fn target(id: &str) -> TargetId {
        TargetId::new(id).unwrap()
    }

    #[test]
    fn test_read_manifest() {
        let dir = project_with(MANIFEST);
        let manifest = ManifestDependencyResolver::new()
            .read_manifest(dir.path())
            .unwrap();

        assert_eq!(manifest.project.name, "App");
        assert_eq!(manifest.project.version, "2.1.0");
        assert_eq!(
            manifest.target_ids().unwrap(),
            vec![target("net6.0"), target("net8.0")]
        );
        assert_eq!(manifest.packages.len(), 4);
        assert_eq!(manifest.packages[0].origin, "nuget");
    }

    #[test]
    fn test_dependencies_per_target() {
        let dir = project_with(MANIFEST);
        let manifest = ManifestDependencyResolver::new()
            .read_manifest(dir.path())
            .unwrap();

        let net6 = manifest.dependencies_for(&target("net6.0")).unwrap();
        assert_eq!(net6.len(), 3);
        assert!(net6.contains("System.Text.Json", "8.0.0"));
        assert!(!net6.contains("left-pad", "1.3.0"));

        let net8 = manifest.dependencies_for(&target("net8.0")).unwrap();
        let left_pad = net8.iter().find(|c| c.name() == "left-pad").unwrap();
        assert_eq!(left_pad.purl(), "pkg:npm/left-pad@1.3.0");
        let stylecop = net8
            .iter()
            .find(|c| c.name() == "StyleCop.Analyzers")
            .unwrap();
        assert!(stylecop.is_dev());
    }

    #[test]
    fn test_missing_manifest() {
        let dir = TempDir::new().unwrap();
        let error = ManifestDependencyResolver::new()
            .read_manifest(dir.path())
            .unwrap_err();
        let message = error.to_string();
        assert!(message.contains("Project manifest not found"));
        assert!(message.contains("💡 Hint:"));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = project_with("[project\nname = ");
        let error = ManifestDependencyResolver::new()
            .read_manifest(dir.path())
            .unwrap_err();
        assert!(error
            .to_string()
            .contains("Failed to parse project manifest"));
    }

    #[test]
    fn test_undeclared_package_target_rejected() {
        let dir = project_with(
            r#"
[project]
name = "App"
targets = ["net8.0"]

[[package]]
name = "Serilog"
version = "3.1.1"
targets = ["net9.0"]
"#,
        );
        let error = ManifestDependencyResolver::new()
            .read_manifest(dir.path())
            .unwrap_err();
        assert!(error.to_string().contains("net9.0"));
    }

    #[test]
    fn test_empty_targets_rejected() {
        let dir = project_with("[project]\nname = \"App\"\ntargets = []\n");
        assert!(ManifestDependencyResolver::new()
            .read_manifest(dir.path())
            .is_err());
    }

    #[tokio::test]
    async fn test_resolve_and_input_stamps() {
        let dir = project_with(MANIFEST);
        let resolver = ManifestDependencyResolver::new();
        let project = ProjectRef::new("App", "2.1.0", dir.path().to_path_buf());

        let set = resolver
            .resolve(&project, "Debug", &target("net8.0"))
            .await
            .unwrap();
        assert_eq!(set.len(), 3);

        let stamps = resolver.input_stamps(&project);
        assert_eq!(stamps.len(), 1);
        assert_eq!(stamps[0].path, dir.path().join(MANIFEST_FILE));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_manifest_rejected() {
        let dir = TempDir::new().unwrap();
        let real = dir.path().join("real.toml");
        std::fs::write(&real, MANIFEST).unwrap();
        std::os::unix::fs::symlink(&real, dir.path().join(MANIFEST_FILE)).unwrap();

        assert!(ManifestDependencyResolver::new()
            .read_manifest(dir.path())
            .is_err());
    }
}
