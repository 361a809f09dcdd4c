//! Error types for contact-sensor configuration.

use thiserror::Error;

/// Errors that can occur while building or evaluating contact sensors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SensorError {
    /// A name pattern failed to compile as a regular expression.
    #[error("invalid contact pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Description of the compile failure.
        reason: String,
    },

    /// A match spec selected zero entities when at least one was expected.
    ///
    /// An empty selection produces an inert sensor, which almost always means
    /// a naming convention changed underneath the spec.
    #[error("contact match selected no entities: {context}")]
    EmptySelection {
        /// What was being selected, for diagnosis.
        context: String,
    },

    /// A sensor spec is malformed.
    #[error("invalid sensor spec `{name}`: {reason}")]
    InvalidSpec {
        /// Name of the offending sensor.
        name: String,
        /// Description of what's wrong.
        reason: String,
    },
}

impl SensorError {
    /// Create an invalid-pattern error.
    #[must_use]
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Create an empty-selection error.
    #[must_use]
    pub fn empty_selection(context: impl Into<String>) -> Self {
        Self::EmptySelection {
            context: context.into(),
        }
    }

    /// Create an invalid-spec error.
    #[must_use]
    pub fn invalid_spec(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSpec {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is an empty-selection error.
    #[must_use]
    pub fn is_empty_selection(&self) -> bool {
        matches!(self, Self::EmptySelection { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SensorError::empty_selection("geoms matching `.*_foot`");
        assert!(err.to_string().contains("no entities"));
        assert!(err.to_string().contains(".*_foot"));

        let err = SensorError::invalid_spec("feet_ground_contact", "num_slots must be > 0");
        assert!(err.to_string().contains("feet_ground_contact"));
    }

    #[test]
    fn test_error_predicates() {
        assert!(SensorError::empty_selection("x").is_empty_selection());
        assert!(!SensorError::invalid_pattern("(", "unclosed").is_empty_selection());
    }
}
