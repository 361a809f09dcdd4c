//! Error types for task definition and registration.

use thiserror::Error;

use rl_env::ComposeError;

/// Errors raised while building or registering tasks.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TaskError {
    /// Environment composition failed.
    #[error("compose error: {0}")]
    Compose(#[from] ComposeError),

    /// A task id was registered twice.
    #[error("duplicate task id `{id}`")]
    DuplicateTask {
        /// The duplicated id.
        id: String,
    },

    /// A task id was looked up but never registered.
    #[error("unknown task id `{id}`")]
    UnknownTask {
        /// The unknown id.
        id: String,
    },

    /// A runner configuration failed validation.
    #[error("invalid runner config for `{experiment}`: {reason}")]
    InvalidRunner {
        /// Experiment name of the offending config.
        experiment: String,
        /// Description of the violation.
        reason: String,
    },
}

impl TaskError {
    /// Create a duplicate-task error.
    #[must_use]
    pub fn duplicate_task(id: impl Into<String>) -> Self {
        Self::DuplicateTask { id: id.into() }
    }

    /// Create an unknown-task error.
    #[must_use]
    pub fn unknown_task(id: impl Into<String>) -> Self {
        Self::UnknownTask { id: id.into() }
    }

    /// Create an invalid-runner error.
    #[must_use]
    pub fn invalid_runner(experiment: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRunner {
            experiment: experiment.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TaskError::duplicate_task("Quadruped-Getup");
        assert!(err.to_string().contains("Quadruped-Getup"));

        let err = TaskError::invalid_runner("quadruped_getup", "max_iterations must be > 0");
        assert!(err.to_string().contains("quadruped_getup"));
    }

    #[test]
    fn test_from_compose_error() {
        let err: TaskError = ComposeError::EmptySchedule.into();
        assert!(matches!(err, TaskError::Compose(_)));
    }
}
