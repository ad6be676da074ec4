use crate::shared::Result;
use std::fmt;
use std::path::{Path, PathBuf};

/// A concrete build target (e.g. a target framework such as `net8.0`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(String);

impl TargetId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            anyhow::bail!("Target identifier cannot be empty");
        }
        // Target ids become directory names under bin/<Configuration>/
        if !trimmed
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == '_')
        {
            anyhow::bail!(
                "Target identifier '{}' contains invalid characters",
                trimmed
            );
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key of one outer build: project + configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BuildKey {
    pub project: String,
    pub configuration: String,
}

impl BuildKey {
    pub fn new(project: impl Into<String>, configuration: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            configuration: configuration.into(),
        }
    }
}

impl fmt::Display for BuildKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.project, self.configuration)
    }
}

/// Which host command triggered the invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Build,
    Pack,
    Publish,
    Clean,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandKind::Build => write!(f, "build"),
            CommandKind::Pack => write!(f, "pack"),
            CommandKind::Publish => write!(f, "publish"),
            CommandKind::Clean => write!(f, "clean"),
        }
    }
}

/// Outer (aggregate) or inner (one concrete target) invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationRole {
    Outer,
    Inner,
}

/// Identity and on-disk location of the project being built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRef {
    pub name: String,
    pub version: String,
    pub directory: PathBuf,
}

impl ProjectRef {
    pub fn new(name: impl Into<String>, version: impl Into<String>, directory: PathBuf) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            directory,
        }
    }
}

/// One host build-system call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInvocation {
    project: ProjectRef,
    configuration: String,
    target: Option<TargetId>,
    declared_targets: Vec<TargetId>,
    command: CommandKind,
}

impl BuildInvocation {
    /// Outer invocation: no target bound
    pub fn outer(
        project: ProjectRef,
        configuration: impl Into<String>,
        declared_targets: Vec<TargetId>,
        command: CommandKind,
    ) -> Self {
        Self {
            project,
            configuration: configuration.into(),
            target: None,
            declared_targets,
            command,
        }
    }

    /// Inner invocation bound to one concrete target
    pub fn inner(
        project: ProjectRef,
        configuration: impl Into<String>,
        declared_targets: Vec<TargetId>,
        target: TargetId,
        command: CommandKind,
    ) -> Self {
        Self {
            project,
            configuration: configuration.into(),
            target: Some(target),
            declared_targets,
            command,
        }
    }

    pub fn project(&self) -> &ProjectRef {
        &self.project
    }

    pub fn configuration(&self) -> &str {
        &self.configuration
    }

    pub fn target(&self) -> Option<&TargetId> {
        self.target.as_ref()
    }

    pub fn declared_targets(&self) -> &[TargetId] {
        &self.declared_targets
    }

    pub fn command(&self) -> CommandKind {
        self.command
    }

    pub fn is_multi_target(&self) -> bool {
        self.declared_targets.len() > 1
    }

    pub fn build_key(&self) -> BuildKey {
        BuildKey::new(self.project.name.clone(), self.configuration.clone())
    }

    /// The target whose dependencies a single-target build resolves
    pub fn single_target(&self) -> Option<&TargetId> {
        self.target.as_ref().or_else(|| {
            if self.declared_targets.len() == 1 {
                self.declared_targets.first()
            } else {
                None
            }
        })
    }

    pub fn layout(&self) -> ProjectLayout<'_> {
        ProjectLayout { invocation: self }
    }
}

/// Host directory conventions for build and publish output
pub struct ProjectLayout<'a> {
    invocation: &'a BuildInvocation,
}

impl ProjectLayout<'_> {
    /// `<project>/bin/<Configuration>`
    pub fn configuration_dir(&self) -> PathBuf {
        self.invocation
            .project
            .directory
            .join("bin")
            .join(&self.invocation.configuration)
    }

    /// Primary build output directory of this invocation.
    ///
    /// A multi-target outer build has no single output directory, so it uses
    /// the configuration directory shared by all targets.
    pub fn primary_output_dir(&self) -> PathBuf {
        if self.invocation.is_multi_target() && self.invocation.target.is_none() {
            return self.configuration_dir();
        }
        match self.invocation.single_target() {
            Some(target) => self.target_output_dir(target),
            None => self.configuration_dir(),
        }
    }

    pub fn target_output_dir(&self, target: &TargetId) -> PathBuf {
        self.configuration_dir().join(target.as_str())
    }

    pub fn publish_dir(&self, target: &TargetId) -> PathBuf {
        self.target_output_dir(target).join("publish")
    }

    /// Resolves a configured directory against the project directory
    pub fn resolve(&self, configured: &Path) -> PathBuf {
        if configured.is_absolute() {
            configured.to_path_buf()
        } else {
            self.invocation.project.directory.join(configured)
        }
    }
}
