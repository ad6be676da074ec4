use super::component::{Component, ComponentKey};
use super::invocation::TargetId;
use std::collections::BTreeMap;

/// Deduplicated set of components resolved for one build target.
///
/// Iteration is ordered by name, then version. Inserting a component whose
/// (name, version) is already present keeps the first entry, except that the
/// dev and test-project flags survive only when both entries carry them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    components: BTreeMap<ComponentKey, Component>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a component; returns false when the (name, version) was already present
    pub fn insert(&mut self, component: Component) -> bool {
        let key = component.key();
        if let Some(existing) = self.components.get_mut(&key) {
            existing.absorb_flags(&component);
            return false;
        }
        self.components.insert(key, component);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn contains(&self, name: &str, version: &str) -> bool {
        self.iter()
            .any(|c| c.name() == name && c.version() == version)
    }

    /// Keeps only the components matching `keep`, preserving order
    pub fn retain(&mut self, mut keep: impl FnMut(&Component) -> bool) {
        self.components.retain(|_, component| keep(component));
    }
}

impl FromIterator<Component> for DependencySet {
    fn from_iter<I: IntoIterator<Item = Component>>(iter: I) -> Self {
        let mut set = DependencySet::new();
        for component in iter {
            set.insert(component);
        }
        set
    }
}

/// Union of the dependency sets contributed by every target of one outer build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedDependencySet {
    components: DependencySet,
    targets: Vec<TargetId>,
}

impl MergedDependencySet {
    /// Merges contributions by (name, version); conflicting versions of the
    /// same name are kept as separate components.
    pub fn merge<'a, I>(contributions: I) -> Self
    where
        I: IntoIterator<Item = (&'a TargetId, &'a DependencySet)>,
    {
        let mut merged = MergedDependencySet::default();
        for (target, set) in contributions {
            merged.targets.push(target.clone());
            for component in set.iter() {
                merged.components.insert(component.clone());
            }
        }
        merged.targets.sort();
        merged
    }

    pub fn targets(&self) -> &[TargetId] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn into_dependency_set(self) -> DependencySet {
        self.components
    }
}
