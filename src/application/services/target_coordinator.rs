use crate::sbom_generation::domain::{
    BuildInvocation, BuildKey, DependencySet, InvocationRole, MergedDependencySet, TargetId,
};
use crate::shared::OrchestrationError;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;

/// Outcome of asking for the merged dependency set of an outer build
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeAttempt {
    Ready(MergedDependencySet),
    /// Not every target has reported yet, or the merge already happened
    NotReady,
}

#[derive(Debug)]
enum Contribution {
    Resolved(DependencySet),
    Failed(String),
}

#[derive(Debug, Default)]
struct SlotState {
    contributions: BTreeMap<TargetId, Contribution>,
    merged: bool,
}

/// Registration progress broadcast to waiting outer builds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Progress {
    registered: usize,
    failed: bool,
}

/// Per outer-key slot. `state` is the single mutual-exclusion boundary for
/// the key; it is never held across an await point or any I/O.
#[derive(Debug)]
struct Slot {
    state: Mutex<SlotState>,
    progress: watch::Sender<Progress>,
}

impl Default for Slot {
    fn default() -> Self {
        let (progress, _) = watch::channel(Progress::default());
        Self {
            state: Mutex::new(SlotState::default()),
            progress,
        }
    }
}

impl Slot {
    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &SlotState) {
        self.progress.send_replace(Progress {
            registered: state.contributions.len(),
            failed: state
                .contributions
                .values()
                .any(|c| matches!(c, Contribution::Failed(_))),
        });
    }
}

/// TargetCoordinator - collapses a multi-target build into one generation event
///
/// Inner invocations register the dependency set of their target; the outer
/// invocation of the same project + configuration merges them exactly once.
/// The registry lives as long as the coordinator, which the host creates
/// per build session and shares between its invocations through an `Arc`.
#[derive(Debug, Default)]
pub struct TargetCoordinator {
    slots: DashMap<BuildKey, Arc<Slot>>,
}

impl TargetCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// An invocation bound to a concrete target is Inner; everything else,
    /// including a single-target project, is Outer.
    pub fn classify(invocation: &BuildInvocation) -> InvocationRole {
        if invocation.target().is_some() {
            InvocationRole::Inner
        } else {
            InvocationRole::Outer
        }
    }

    /// `ConfigurationMismatch` unless `target` is one of `declared`
    pub fn ensure_declared(
        key: &BuildKey,
        declared: &[TargetId],
        target: &TargetId,
    ) -> Result<(), OrchestrationError> {
        if declared.contains(target) {
            return Ok(());
        }
        Err(OrchestrationError::ConfigurationMismatch {
            project: key.project.clone(),
            target: target.to_string(),
            expected: declared
                .iter()
                .map(TargetId::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    fn slot(&self, key: &BuildKey) -> Arc<Slot> {
        self.slots.entry(key.clone()).or_default().clone()
    }

    /// Stores the dependency set contributed by one inner invocation.
    ///
    /// # Errors
    /// `ConfigurationMismatch` if `target` is not one of `declared`
    pub fn register_inner_result(
        &self,
        key: &BuildKey,
        declared: &[TargetId],
        target: TargetId,
        dependencies: DependencySet,
    ) -> Result<(), OrchestrationError> {
        self.register(key, declared, target, Contribution::Resolved(dependencies))
    }

    /// Records that an inner invocation could not resolve its dependencies,
    /// so a waiting outer build fails instead of timing out.
    pub fn register_inner_failure(
        &self,
        key: &BuildKey,
        declared: &[TargetId],
        target: TargetId,
        detail: impl Into<String>,
    ) -> Result<(), OrchestrationError> {
        self.register(key, declared, target, Contribution::Failed(detail.into()))
    }

    fn register(
        &self,
        key: &BuildKey,
        declared: &[TargetId],
        target: TargetId,
        contribution: Contribution,
    ) -> Result<(), OrchestrationError> {
        Self::ensure_declared(key, declared, &target)?;

        let slot = self.slot(key);
        let mut state = slot.lock();
        // A registration after a completed merge starts the next build pass
        if state.merged {
            state.merged = false;
            state.contributions.clear();
        }
        state.contributions.insert(target, contribution);
        slot.publish(&state);
        Ok(())
    }

    /// Number of inner contributions currently registered for the key
    pub fn registered_count(&self, key: &BuildKey) -> usize {
        self.slots
            .get(key)
            .map(|slot| slot.lock().contributions.len())
            .unwrap_or(0)
    }

    /// Merges the contributions for `key` if all `expected` targets reported.
    ///
    /// Never blocks. A failed contribution completes the pass early. The
    /// merge happens exactly once: the entry is cleared and later calls
    /// return `NotReady` until a new pass registers.
    ///
    /// # Errors
    /// `GenerationFailure` if any target registered a failure
    pub fn try_merge_for_outer(
        &self,
        key: &BuildKey,
        expected: usize,
    ) -> Result<MergeAttempt, OrchestrationError> {
        let Some(slot) = self.slots.get(key).map(|entry| Arc::clone(&entry)) else {
            return Ok(MergeAttempt::NotReady);
        };

        let contributions = {
            let mut state = slot.lock();
            let any_failed = state
                .contributions
                .values()
                .any(|c| matches!(c, Contribution::Failed(_)));
            if state.merged || (state.contributions.len() < expected && !any_failed) {
                return Ok(MergeAttempt::NotReady);
            }
            state.merged = true;
            let taken = std::mem::take(&mut state.contributions);
            slot.publish(&state);
            taken
        };

        let mut failures = Vec::new();
        let mut resolved = Vec::with_capacity(contributions.len());
        for (target, contribution) in &contributions {
            match contribution {
                Contribution::Resolved(set) => resolved.push((target, set)),
                Contribution::Failed(detail) => failures.push(format!("{}: {}", target, detail)),
            }
        }

        if !failures.is_empty() {
            return Err(OrchestrationError::generation(anyhow::anyhow!(
                "Dependency resolution failed for {}",
                failures.join("; ")
            )));
        }

        Ok(MergeAttempt::Ready(MergedDependencySet::merge(resolved)))
    }

    /// Waits until all `expected` targets of `key` registered, then merges.
    ///
    /// Returns `NotReady` immediately when the merge for this pass already
    /// happened. A registered failure ends the wait early.
    ///
    /// # Errors
    /// `MergeTimeout` when fewer than `expected` targets reported in time
    pub async fn wait_for_merge(
        &self,
        key: &BuildKey,
        expected: usize,
        timeout: Duration,
    ) -> Result<MergeAttempt, OrchestrationError> {
        let slot = self.slot(key);
        let mut progress = slot.progress.subscribe();
        if slot.lock().merged {
            return Ok(MergeAttempt::NotReady);
        }

        let complete = async {
            progress
                .wait_for(|p| p.failed || p.registered >= expected)
                .await
                .map(|_| ())
        };

        match tokio::time::timeout(timeout, complete).await {
            Ok(_) => self.try_merge_for_outer(key, expected),
            Err(_) => Err(OrchestrationError::MergeTimeout {
                key: key.to_string(),
                received: slot.lock().contributions.len(),
                expected,
                waited: timeout,
            }),
        }
    }
}
