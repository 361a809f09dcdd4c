//! Error types for environment composition.

use thiserror::Error;

/// Errors raised while composing an environment configuration.
///
/// All of these are programmer errors in the declared constants: they are
/// raised synchronously at composition time, are fatal to the build call,
/// and have no retry path.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ComposeError {
    /// Morphology validation or derivation failed.
    #[error("morphology error: {0}")]
    Morphology(String),

    /// Sensor spec or pattern error.
    #[error("sensor error: {0}")]
    Sensor(String),

    /// An override targeted a term that does not exist.
    #[error("no {kind} term named `{name}`")]
    MissingTerm {
        /// Term collection the override targeted (e.g. `reward`).
        kind: &'static str,
        /// The missing term name.
        name: String,
    },

    /// A term references a sensor that was never attached to the scene.
    #[error("term `{term}` references undeclared sensor `{sensor}`")]
    UnresolvedSensor {
        /// Name of the referencing term.
        term: String,
        /// The dangling sensor name.
        sensor: String,
    },

    /// Two sensors with the same name were attached to the scene.
    #[error("duplicate sensor name `{name}` in scene")]
    DuplicateSensor {
        /// The duplicated sensor name.
        name: String,
    },

    /// A term references an entity missing from the scene.
    #[error("term `{term}` references unknown entity `{entity}`")]
    MissingEntity {
        /// Name of the referencing term.
        term: String,
        /// The missing entity key.
        entity: String,
    },

    /// A curriculum schedule has no stages.
    #[error("curriculum schedule is empty")]
    EmptySchedule,

    /// A curriculum schedule does not start at step zero.
    #[error("curriculum schedule must start at step 0 (first stage at {step})")]
    ScheduleStartsLate {
        /// The first stage's step threshold.
        step: u64,
    },

    /// Curriculum stage thresholds do not strictly increase.
    #[error("curriculum stage thresholds must strictly increase ({prev} then {next})")]
    ScheduleNotMonotonic {
        /// Threshold of the earlier stage.
        prev: u64,
        /// Offending threshold of the following stage.
        next: u64,
    },

    /// A curriculum stage range is inverted.
    #[error("curriculum stage at step {step} has inverted range [{min}, {max}]")]
    ScheduleInvertedRange {
        /// The stage's step threshold.
        step: u64,
        /// Range minimum.
        min: f64,
        /// Range maximum.
        max: f64,
    },

    /// Anything else wrong with the composed configuration.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },
}

impl ComposeError {
    /// Create a missing-term error.
    #[must_use]
    pub fn missing_term(kind: &'static str, name: impl Into<String>) -> Self {
        Self::MissingTerm {
            kind,
            name: name.into(),
        }
    }

    /// Create an unresolved-sensor error.
    #[must_use]
    pub fn unresolved_sensor(term: impl Into<String>, sensor: impl Into<String>) -> Self {
        Self::UnresolvedSensor {
            term: term.into(),
            sensor: sensor.into(),
        }
    }

    /// Create an invalid-configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Check if this error is a curriculum-schedule error.
    #[must_use]
    pub fn is_schedule_error(&self) -> bool {
        matches!(
            self,
            Self::EmptySchedule
                | Self::ScheduleStartsLate { .. }
                | Self::ScheduleNotMonotonic { .. }
                | Self::ScheduleInvertedRange { .. }
        )
    }
}

impl From<rl_robot::MorphologyError> for ComposeError {
    fn from(err: rl_robot::MorphologyError) -> Self {
        Self::Morphology(err.to_string())
    }
}

impl From<rl_sensor::SensorError> for ComposeError {
    fn from(err: rl_sensor::SensorError) -> Self {
        Self::Sensor(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ComposeError::missing_term("reward", "upright");
        assert!(err.to_string().contains("reward"));
        assert!(err.to_string().contains("upright"));

        let err = ComposeError::unresolved_sensor("illegal_contact", "nonfoot_ground_touch");
        assert!(err.to_string().contains("nonfoot_ground_touch"));
    }

    #[test]
    fn test_schedule_predicate() {
        assert!(ComposeError::EmptySchedule.is_schedule_error());
        assert!(ComposeError::ScheduleStartsLate { step: 5 }.is_schedule_error());
        assert!(!ComposeError::missing_term("event", "push_robot").is_schedule_error());
    }

    #[test]
    fn test_from_lower_layers() {
        let err: ComposeError = rl_robot::MorphologyError::missing_effort_limit("legs").into();
        assert!(matches!(err, ComposeError::Morphology(_)));

        let err: ComposeError = rl_sensor::SensorError::empty_selection("feet").into();
        assert!(matches!(err, ComposeError::Sensor(_)));
    }
}
