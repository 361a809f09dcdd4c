//! Action-scale derivation from actuator gains.
//!
//! The policy emits normalized actions; the action scale converts them into
//! joint-position command deltas. For a position-controlled actuator the
//! scale follows from the drive parameters:
//!
//! ```text
//! scale = 0.25 * effort_limit / stiffness
//! ```
//!
//! so a full-range action commands a quarter of the deflection at which the
//! actuator saturates. The map is derived fresh from a morphology on every
//! call; it is never a shared table, so composing several tasks in one
//! process cannot leak state between them.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::MorphologyError;
use crate::morphology::RobotMorphology;
use crate::pattern::compile_anchored;
use crate::Result;

/// Per-pattern action-scale multipliers derived from actuator gains.
///
/// Contains exactly one entry per joint pattern declared across a
/// morphology's actuator classes, in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActionScaleMap {
    entries: Vec<(String, f64)>,
}

impl ActionScaleMap {
    /// Number of pattern entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the scale for an exact pattern string.
    #[must_use]
    pub fn get(&self, pattern: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(p, _)| p == pattern)
            .map(|(_, s)| *s)
    }

    /// Resolve the scale for a concrete joint name.
    ///
    /// The first pattern matching the whole joint name supplies the scale.
    ///
    /// # Errors
    ///
    /// Returns [`MorphologyError::UnmatchedJoint`] if no pattern matches, or
    /// [`MorphologyError::InvalidPattern`] on a bad pattern.
    pub fn scale_for_joint(&self, joint: &str) -> Result<f64> {
        for (pattern, scale) in &self.entries {
            if compile_anchored(pattern)?.is_match(joint) {
                return Ok(*scale);
            }
        }
        Err(MorphologyError::UnmatchedJoint {
            joint: joint.to_string(),
        })
    }

    /// Iterate over `(pattern, scale)` entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(p, s)| (p.as_str(), *s))
    }
}

/// Derive the action-scale map for a morphology.
///
/// Produces one `scale = 0.25 * effort_limit / stiffness` entry per joint
/// pattern across all actuator classes.
///
/// # Errors
///
/// Fails fast with a [`MorphologyError`] when an actuator class has no
/// effort limit or a non-positive/non-finite stiffness (the derivation would
/// be undefined), or when two classes declare the same pattern.
///
/// # Example
///
/// ```
/// use rl_robot::{derive_action_scale, ActuatorClassConfig, RobotMorphology};
///
/// let robot = RobotMorphology::new("quadruped", "models/quadruped.xml")
///     .with_actuator_class(
///         ActuatorClassConfig::new("legs", [".*_hip_joint"])
///             .with_stiffness(10.0)
///             .with_effort_limit(6.0),
///     );
///
/// let scale = derive_action_scale(&robot).unwrap();
/// assert_eq!(scale.get(".*_hip_joint"), Some(0.15));
/// ```
pub fn derive_action_scale(morphology: &RobotMorphology) -> Result<ActionScaleMap> {
    let mut entries: Vec<(String, f64)> = Vec::new();

    for class in &morphology.actuators {
        let effort_limit = class
            .effort_limit
            .ok_or_else(|| MorphologyError::missing_effort_limit(&class.name))?;
        if class.stiffness <= 0.0 || !class.stiffness.is_finite() {
            return Err(MorphologyError::invalid_stiffness(
                &class.name,
                class.stiffness,
            ));
        }

        let scale = 0.25 * effort_limit / class.stiffness;
        for pattern in &class.target_patterns {
            if entries.iter().any(|(p, _)| p == pattern) {
                return Err(MorphologyError::DuplicatePattern {
                    pattern: pattern.clone(),
                });
            }
            entries.push((pattern.clone(), scale));
        }
    }

    Ok(ActionScaleMap { entries })
}
