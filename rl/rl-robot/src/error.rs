//! Error types for morphology and actuator configuration.

use thiserror::Error;

/// Errors that can occur while validating a robot morphology or deriving
/// actuator parameters from it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MorphologyError {
    /// A joint-name pattern failed to compile as a regular expression.
    #[error("invalid joint pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Description of the compile failure.
        reason: String,
    },

    /// An actuator class has no effort limit, so the action scale is
    /// undefined.
    #[error("actuator class `{class}` has no effort limit")]
    MissingEffortLimit {
        /// Name of the mis-specified actuator class.
        class: String,
    },

    /// An actuator class has a stiffness for which the action scale is
    /// undefined.
    #[error("actuator class `{class}` has invalid stiffness {stiffness} (must be positive and finite)")]
    InvalidStiffness {
        /// Name of the mis-specified actuator class.
        class: String,
        /// The offending stiffness value.
        stiffness: f64,
    },

    /// The same joint pattern is declared by more than one actuator class.
    #[error("joint pattern `{pattern}` declared by multiple actuator classes")]
    DuplicatePattern {
        /// The duplicated pattern.
        pattern: String,
    },

    /// An actuated joint name matched none of the actuator-class patterns.
    #[error("joint `{joint}` matches no actuator class")]
    UnmatchedJoint {
        /// Name of the orphaned joint.
        joint: String,
    },

    /// An actuated joint name matched patterns from more than one actuator
    /// class.
    #[error("joint `{joint}` matches {count} actuator classes (expected exactly one)")]
    AmbiguousJoint {
        /// Name of the over-matched joint.
        joint: String,
        /// How many classes claimed the joint.
        count: usize,
    },

    /// An actuator class declares no joint patterns.
    #[error("actuator class `{class}` declares no joint patterns")]
    EmptyClass {
        /// Name of the empty actuator class.
        class: String,
    },
}

impl MorphologyError {
    /// Create an invalid-pattern error.
    #[must_use]
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing-effort-limit error.
    #[must_use]
    pub fn missing_effort_limit(class: impl Into<String>) -> Self {
        Self::MissingEffortLimit {
            class: class.into(),
        }
    }

    /// Create an invalid-stiffness error.
    #[must_use]
    pub fn invalid_stiffness(class: impl Into<String>, stiffness: f64) -> Self {
        Self::InvalidStiffness {
            class: class.into(),
            stiffness,
        }
    }

    /// Check if this error indicates a mis-specified actuator gain.
    #[must_use]
    pub fn is_gain_error(&self) -> bool {
        matches!(
            self,
            Self::MissingEffortLimit { .. } | Self::InvalidStiffness { .. }
        )
    }

    /// Check if this error indicates a joint/pattern mapping problem.
    #[must_use]
    pub fn is_mapping_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicatePattern { .. }
                | Self::UnmatchedJoint { .. }
                | Self::AmbiguousJoint { .. }
        )
    }
}
