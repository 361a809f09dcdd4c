//! Task registry.
//!
//! Maps unique task ids to their composed train and play configurations
//! plus the runner hyperparameters. The external training CLI looks tasks
//! up here by id; registration happens exactly once, at startup.

use std::collections::BTreeMap;

use tracing::{debug, info};

use rl_env::EnvConfig;

use crate::error::TaskError;
use crate::getup::getup_env;
use crate::runner::{getup_runner_config, velocity_runner_config, RunnerConfig};
use crate::velocity::{velocity_flat_env, velocity_rough_env};
use crate::Result;

/// Task id of the stand-up recovery task.
pub const GETUP_TASK_ID: &str = "Quadruped-Getup";

/// Task id of the rough-terrain velocity task.
pub const VELOCITY_ROUGH_TASK_ID: &str = "Quadruped-Velocity-Rough";

/// Task id of the flat-terrain velocity task.
pub const VELOCITY_FLAT_TASK_ID: &str = "Quadruped-Velocity-Flat";

/// One registered task: train and play configurations plus runner.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskEntry {
    /// Training configuration.
    pub env: EnvConfig,

    /// Fixed-evaluation configuration.
    pub play_env: EnvConfig,

    /// Runner hyperparameters.
    pub runner: RunnerConfig,
}

/// Registry of composed tasks, keyed by unique id.
///
/// # Example
///
/// ```
/// use rl_tasks::{register_builtin_tasks, TaskRegistry, GETUP_TASK_ID};
///
/// let mut registry = TaskRegistry::new();
/// register_builtin_tasks(&mut registry).unwrap();
///
/// let entry = registry.get(GETUP_TASK_ID).unwrap();
/// assert!(entry.env.scene.has_sensor("nonfoot_ground_touch"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    tasks: BTreeMap<String, TaskEntry>,
}

impl TaskRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task under a unique id.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::DuplicateTask`] if the id is already taken, and
    /// [`TaskError::InvalidRunner`] if the entry's runner fails validation.
    pub fn register(&mut self, id: impl Into<String>, entry: TaskEntry) -> Result<()> {
        let id = id.into();
        if self.tasks.contains_key(&id) {
            return Err(TaskError::duplicate_task(id));
        }
        entry.runner.validate()?;
        debug!(task = %id, "registered task");
        self.tasks.insert(id, entry);
        Ok(())
    }

    /// Look up a task by id.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::UnknownTask`] if the id was never registered.
    pub fn get(&self, id: &str) -> Result<&TaskEntry> {
        self.tasks.get(id).ok_or_else(|| TaskError::unknown_task(id))
    }

    /// Check whether an id is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.tasks.contains_key(id)
    }

    /// Registered ids in sorted order.
    #[must_use]
    pub fn task_ids(&self) -> Vec<&str> {
        self.tasks.keys().map(String::as_str).collect()
    }

    /// Number of registered tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Register the builtin quadruped tasks.
///
/// Composes train and play variants for the getup task and both velocity
/// variants, registering each under its id.
///
/// # Errors
///
/// Returns the first [`TaskError`] raised by composition or registration;
/// on error the registry may hold a subset of the builtin tasks.
pub fn register_builtin_tasks(registry: &mut TaskRegistry) -> Result<()> {
    registry.register(
        GETUP_TASK_ID,
        TaskEntry {
            env: getup_env(false)?,
            play_env: getup_env(true)?,
            runner: getup_runner_config(),
        },
    )?;
    registry.register(
        VELOCITY_ROUGH_TASK_ID,
        TaskEntry {
            env: velocity_rough_env(false)?,
            play_env: velocity_rough_env(true)?,
            runner: velocity_runner_config(),
        },
    )?;
    registry.register(
        VELOCITY_FLAT_TASK_ID,
        TaskEntry {
            env: velocity_flat_env(false)?,
            play_env: velocity_flat_env(true)?,
            runner: velocity_runner_config(),
        },
    )?;

    info!(tasks = registry.len(), "registered builtin quadruped tasks");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registration() {
        let mut registry = TaskRegistry::new();
        register_builtin_tasks(&mut registry).unwrap();

        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.task_ids(),
            vec![GETUP_TASK_ID, VELOCITY_FLAT_TASK_ID, VELOCITY_ROUGH_TASK_ID]
        );
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut registry = TaskRegistry::new();
        register_builtin_tasks(&mut registry).unwrap();

        let entry = registry.get(GETUP_TASK_ID).unwrap().clone();
        let err = registry.register(GETUP_TASK_ID, entry).unwrap_err();
        assert!(matches!(err, TaskError::DuplicateTask { .. }));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_unknown_id() {
        let registry = TaskRegistry::new();
        let err = registry.get("Quadruped-Backflip").unwrap_err();
        assert!(matches!(err, TaskError::UnknownTask { .. }));
    }

    #[test]
    fn test_entries_pair_train_and_play() {
        let mut registry = TaskRegistry::new();
        register_builtin_tasks(&mut registry).unwrap();

        let rough = registry.get(VELOCITY_ROUGH_TASK_ID).unwrap();
        // Train anneals; play is deterministic.
        assert!(rough.env.curriculum.contains_key("terrain_levels"));
        assert!(rough.play_env.curriculum.is_empty());
        assert!(rough.env.observations["actor"].enable_corruption);
        assert!(!rough.play_env.observations["actor"].enable_corruption);
    }

    #[test]
    fn test_invalid_runner_rejected() {
        let mut registry = TaskRegistry::new();
        register_builtin_tasks(&mut registry).unwrap();

        let mut entry = registry.get(GETUP_TASK_ID).unwrap().clone();
        entry.runner.save_interval = 0;
        let err = registry.register("Quadruped-Getup-V2", entry).unwrap_err();
        assert!(matches!(err, TaskError::InvalidRunner { .. }));
    }
}
