use async_trait::async_trait;
use build_sbom::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Mock DependencyResolver serving fixed per-target component lists
#[derive(Default, Clone)]
pub struct MockDependencyResolver {
    sets: Arc<Mutex<HashMap<String, DependencySet>>>,
    failing_target: Option<String>,
    stamp_file: Option<PathBuf>,
}

impl MockDependencyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(self, target: &str, components: &[(&str, &str)]) -> Self {
        self.set_target(target, components);
        self
    }

    /// Replaces the components of `target`; visible to clones
    pub fn set_target(&self, target: &str, components: &[(&str, &str)]) {
        let set = components
            .iter()
            .map(|(name, version)| {
                Component::new(name.to_string(), version.to_string()).unwrap()
            })
            .collect();
        self.sets.lock().unwrap().insert(target.to_string(), set);
    }

    pub fn failing_on(mut self, target: &str) -> Self {
        self.failing_target = Some(target.to_string());
        self
    }

    /// Reports the modification time of `path` as a fingerprint input
    pub fn with_stamp_file(mut self, path: PathBuf) -> Self {
        self.stamp_file = Some(path);
        self
    }
}

#[async_trait]
impl DependencyResolver for MockDependencyResolver {
    async fn resolve(
        &self,
        _project: &ProjectRef,
        _configuration: &str,
        target: &TargetId,
    ) -> Result<DependencySet> {
        if self.failing_target.as_deref() == Some(target.as_str()) {
            anyhow::bail!("restore failed for {}", target);
        }
        Ok(self
            .sets
            .lock()
            .unwrap()
            .get(target.as_str())
            .cloned()
            .unwrap_or_default())
    }

    fn input_stamps(&self, _project: &ProjectRef) -> Vec<InputStamp> {
        self.stamp_file
            .as_deref()
            .and_then(InputStamp::of)
            .into_iter()
            .collect()
    }
}
