//! Actuator class configuration.
//!
//! An actuator class groups joints that share identical physical drive
//! parameters: a set of joint-name patterns plus PD gains, effort limit, and
//! rotor armature. Classes are owned by a [`RobotMorphology`] and are
//! immutable after construction.
//!
//! [`RobotMorphology`]: crate::RobotMorphology

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Physical drive parameters for one group of joints.
///
/// # Example
///
/// ```
/// use rl_robot::ActuatorClassConfig;
///
/// let legs = ActuatorClassConfig::new(
///     "legs",
///     [".*_hip_joint", ".*_thigh_joint", ".*_calf_joint"],
/// )
/// .with_stiffness(10.0)
/// .with_effort_limit(6.0)
/// .with_armature(0.031);
///
/// assert_eq!(legs.target_patterns.len(), 3);
/// assert_eq!(legs.effort_limit, Some(6.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActuatorClassConfig {
    /// Name of the class, used in error messages and logs.
    pub name: String,

    /// Joint-name patterns owned by this class (whole-name regexes).
    pub target_patterns: Vec<String>,

    /// Position-gain stiffness (Nm/rad for revolute joints).
    pub stiffness: f64,

    /// Velocity-gain damping (Nm·s/rad).
    pub damping: f64,

    /// Maximum actuator effort (Nm). Required for action-scale derivation.
    pub effort_limit: Option<f64>,

    /// Reflected rotor inertia added to each joint (kg·m²).
    pub armature: f64,
}

impl ActuatorClassConfig {
    /// Create a class with the given name and joint patterns.
    ///
    /// Gains default to zero and must be set with the `with_*` builders
    /// before the class is usable for derivation.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            target_patterns: patterns.into_iter().map(Into::into).collect(),
            stiffness: 0.0,
            damping: 0.0,
            effort_limit: None,
            armature: 0.0,
        }
    }

    /// Set the position-gain stiffness.
    #[must_use]
    pub fn with_stiffness(mut self, stiffness: f64) -> Self {
        self.stiffness = stiffness;
        self
    }

    /// Set the velocity-gain damping.
    #[must_use]
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Set the effort limit.
    #[must_use]
    pub fn with_effort_limit(mut self, effort_limit: f64) -> Self {
        self.effort_limit = Some(effort_limit);
        self
    }

    /// Set the rotor armature.
    #[must_use]
    pub fn with_armature(mut self, armature: f64) -> Self {
        self.armature = armature;
        self
    }

    /// Check whether the gains allow action-scale derivation.
    #[must_use]
    pub fn has_derivable_scale(&self) -> bool {
        self.effort_limit.is_some() && self.stiffness > 0.0 && self.stiffness.is_finite()
    }
}
