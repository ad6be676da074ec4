use crate::sbom_generation::domain::{Component, DependencySet};

/// ComponentFilter - Removes excluded dependency categories from a set
///
/// Filtering is deterministic and keeps the set's name ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComponentFilter {
    exclude_dev: bool,
    exclude_test_projects: bool,
}

impl ComponentFilter {
    pub fn new(exclude_dev: bool, exclude_test_projects: bool) -> Self {
        Self {
            exclude_dev,
            exclude_test_projects,
        }
    }

    /// True when no category is excluded
    pub fn is_noop(&self) -> bool {
        !self.exclude_dev && !self.exclude_test_projects
    }

    /// Returns whether the component falls into an excluded category
    pub fn excludes(&self, component: &Component) -> bool {
        (self.exclude_dev && component.is_dev())
            || (self.exclude_test_projects && component.is_test_project())
    }

    /// Filters the set in place and returns how many components were removed
    pub fn apply(&self, set: &mut DependencySet) -> usize {
        if self.is_noop() {
            return 0;
        }
        let before = set.len();
        set.retain(|component| !self.excludes(component));
        before - set.len()
    }
}
