/// Application services shared by the use cases
mod target_coordinator;

pub use target_coordinator::{MergeAttempt, TargetCoordinator};
