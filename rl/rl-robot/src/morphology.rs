//! Robot morphology description.
//!
//! A [`RobotMorphology`] is the immutable physical description this layer
//! derives task configuration from: named joints grouped into actuator
//! classes, an initial pose, collision properties, and the names of the
//! bodies/geoms/sites downstream terms refer to. The geometric model itself
//! (skeleton, meshes) is loaded by the simulator from `asset_path`; only the
//! resulting names are consumed here.

use std::path::PathBuf;

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::actuator::ActuatorClassConfig;
use crate::collision::CollisionConfig;
use crate::error::MorphologyError;
use crate::pattern::compile_anchored;
use crate::Result;

/// Default base pose and joint state applied at reset.
///
/// Joint positions and velocities are pattern-keyed; the first matching
/// pattern supplies the value for a joint, unmatched joints default to zero.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InitialState {
    /// Base position in world frame (m).
    pub base_position: Vector3<f64>,

    /// Joint angles by pattern (rad).
    pub joint_pos: Vec<(String, f64)>,

    /// Joint velocities by pattern (rad/s).
    pub joint_vel: Vec<(String, f64)>,
}

impl Default for InitialState {
    fn default() -> Self {
        Self {
            base_position: Vector3::zeros(),
            joint_pos: Vec::new(),
            joint_vel: Vec::new(),
        }
    }
}

impl InitialState {
    /// Create an initial state with the given base position.
    #[must_use]
    pub fn at_position(base_position: Vector3<f64>) -> Self {
        Self {
            base_position,
            ..Self::default()
        }
    }

    /// Add a joint-angle entry for a pattern.
    #[must_use]
    pub fn with_joint_pos(mut self, pattern: impl Into<String>, angle: f64) -> Self {
        self.joint_pos.push((pattern.into(), angle));
        self
    }

    /// Add a joint-velocity entry for a pattern.
    #[must_use]
    pub fn with_joint_vel(mut self, pattern: impl Into<String>, velocity: f64) -> Self {
        self.joint_vel.push((pattern.into(), velocity));
        self
    }

    /// Resolve the initial angle for a joint name.
    ///
    /// Returns zero when no pattern matches.
    ///
    /// # Errors
    ///
    /// Returns [`MorphologyError::InvalidPattern`] if an entry's pattern does
    /// not compile.
    pub fn joint_pos_for(&self, joint: &str) -> Result<f64> {
        resolve_first(&self.joint_pos, joint)
    }

    /// Resolve the initial velocity for a joint name.
    ///
    /// Returns zero when no pattern matches.
    ///
    /// # Errors
    ///
    /// Returns [`MorphologyError::InvalidPattern`] if an entry's pattern does
    /// not compile.
    pub fn joint_vel_for(&self, joint: &str) -> Result<f64> {
        resolve_first(&self.joint_vel, joint)
    }
}

fn resolve_first(entries: &[(String, f64)], name: &str) -> Result<f64> {
    for (pattern, value) in entries {
        if compile_anchored(pattern)?.is_match(name) {
            return Ok(*value);
        }
    }
    Ok(0.0)
}

/// Immutable description of a robot.
///
/// # Example
///
/// ```
/// use rl_robot::{ActuatorClassConfig, InitialState, RobotMorphology};
///
/// let robot = RobotMorphology::new("quadruped", "models/quadruped.xml")
///     .with_joints(["FL_hip_joint", "FR_hip_joint"])
///     .with_actuator_class(
///         ActuatorClassConfig::new("legs", [".*_hip_joint"])
///             .with_stiffness(10.0)
///             .with_effort_limit(6.0),
///     );
///
/// assert!(robot.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RobotMorphology {
    /// Robot name, used as the scene entity key.
    pub name: String,

    /// Path to the model-description resource the simulator loads.
    pub asset_path: PathBuf,

    /// Names of all actuated joints.
    pub joint_names: Vec<String>,

    /// Name of the main body (torso).
    pub body_name: String,

    /// Names of the foot sites, used by gait rewards.
    pub foot_site_names: Vec<String>,

    /// Names of the foot collision geoms.
    pub foot_geom_names: Vec<String>,

    /// Actuator classes covering the actuated joints.
    pub actuators: Vec<ActuatorClassConfig>,

    /// Default pose applied at reset.
    pub init_state: InitialState,

    /// Collision geometry properties.
    pub collision: CollisionConfig,

    /// Fraction of the hard joint range exposed as the soft limit.
    pub soft_joint_pos_limit_factor: f64,
}

impl RobotMorphology {
    /// Create a morphology with the given name and model asset path.
    #[must_use]
    pub fn new(name: impl Into<String>, asset_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            asset_path: asset_path.into(),
            joint_names: Vec::new(),
            body_name: String::new(),
            foot_site_names: Vec::new(),
            foot_geom_names: Vec::new(),
            actuators: Vec::new(),
            init_state: InitialState::default(),
            collision: CollisionConfig::default(),
            soft_joint_pos_limit_factor: 1.0,
        }
    }

    /// Set the actuated joint names.
    #[must_use]
    pub fn with_joints<I, S>(mut self, joints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.joint_names = joints.into_iter().map(Into::into).collect();
        self
    }

    /// Set the main body name.
    #[must_use]
    pub fn with_body_name(mut self, body_name: impl Into<String>) -> Self {
        self.body_name = body_name.into();
        self
    }

    /// Set the foot site names.
    #[must_use]
    pub fn with_foot_sites<I, S>(mut self, sites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.foot_site_names = sites.into_iter().map(Into::into).collect();
        self
    }

    /// Set the foot collision geom names.
    #[must_use]
    pub fn with_foot_geoms<I, S>(mut self, geoms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.foot_geom_names = geoms.into_iter().map(Into::into).collect();
        self
    }

    /// Add an actuator class.
    #[must_use]
    pub fn with_actuator_class(mut self, class: ActuatorClassConfig) -> Self {
        self.actuators.push(class);
        self
    }

    /// Set the initial state.
    #[must_use]
    pub fn with_init_state(mut self, init_state: InitialState) -> Self {
        self.init_state = init_state;
        self
    }

    /// Set the collision config.
    #[must_use]
    pub fn with_collision(mut self, collision: CollisionConfig) -> Self {
        self.collision = collision;
        self
    }

    /// Set the soft joint-limit factor.
    #[must_use]
    pub fn with_soft_joint_pos_limit_factor(mut self, factor: f64) -> Self {
        self.soft_joint_pos_limit_factor = factor;
        self
    }

    /// Validate the morphology.
    ///
    /// Checks that every actuator class declares at least one pattern, that
    /// all patterns compile, and that every actuated joint name matches
    /// exactly one actuator class.
    ///
    /// # Errors
    ///
    /// Returns the first violation found as a [`MorphologyError`].
    pub fn validate(&self) -> Result<()> {
        let mut compiled = Vec::with_capacity(self.actuators.len());
        for class in &self.actuators {
            if class.target_patterns.is_empty() {
                return Err(MorphologyError::EmptyClass {
                    class: class.name.clone(),
                });
            }
            let regexes = class
                .target_patterns
                .iter()
                .map(|p| compile_anchored(p))
                .collect::<Result<Vec<_>>>()?;
            compiled.push(regexes);
        }

        for joint in &self.joint_names {
            let count = compiled
                .iter()
                .filter(|regexes| regexes.iter().any(|re| re.is_match(joint)))
                .count();
            match count {
                1 => {}
                0 => {
                    return Err(MorphologyError::UnmatchedJoint {
                        joint: joint.clone(),
                    })
                }
                _ => {
                    return Err(MorphologyError::AmbiguousJoint {
                        joint: joint.clone(),
                        count,
                    })
                }
            }
        }
        Ok(())
    }

    /// Find the actuator class owning a joint name.
    ///
    /// # Errors
    ///
    /// Returns [`MorphologyError::UnmatchedJoint`] if no class pattern
    /// matches, or [`MorphologyError::InvalidPattern`] on a bad pattern.
    pub fn actuator_class_for(&self, joint: &str) -> Result<&ActuatorClassConfig> {
        for class in &self.actuators {
            for pattern in &class.target_patterns {
                if compile_anchored(pattern)?.is_match(joint) {
                    return Ok(class);
                }
            }
        }
        Err(MorphologyError::UnmatchedJoint {
            joint: joint.to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn legs() -> ActuatorClassConfig {
        ActuatorClassConfig::new(
            "legs",
            [".*_hip_joint", ".*_thigh_joint", ".*_calf_joint"],
        )
        .with_stiffness(10.0)
        .with_effort_limit(6.0)
    }

    fn quadruped_joints() -> Vec<String> {
        ["FL", "FR", "BL", "BR"]
            .iter()
            .flat_map(|leg| {
                ["hip", "thigh", "calf"]
                    .iter()
                    .map(move |part| format!("{leg}_{part}_joint"))
            })
            .collect()
    }

    #[test]
    fn test_validate_ok() {
        let robot = RobotMorphology::new("quadruped", "models/quadruped.xml")
            .with_joints(quadruped_joints())
            .with_actuator_class(legs());
        assert!(robot.validate().is_ok());
    }

    #[test]
    fn test_validate_unmatched_joint() {
        let robot = RobotMorphology::new("quadruped", "models/quadruped.xml")
            .with_joints(["FL_hip_joint", "tail_joint"])
            .with_actuator_class(legs());

        let err = robot.validate().unwrap_err();
        assert!(matches!(
            err,
            MorphologyError::UnmatchedJoint { ref joint } if joint == "tail_joint"
        ));
    }

    #[test]
    fn test_validate_ambiguous_joint() {
        let robot = RobotMorphology::new("quadruped", "models/quadruped.xml")
            .with_joints(["FL_hip_joint"])
            .with_actuator_class(legs())
            .with_actuator_class(
                ActuatorClassConfig::new("hips", ["FL_hip_joint"]).with_stiffness(5.0),
            );

        let err = robot.validate().unwrap_err();
        assert!(matches!(err, MorphologyError::AmbiguousJoint { count: 2, .. }));
    }

    #[test]
    fn test_validate_empty_class() {
        let robot = RobotMorphology::new("quadruped", "models/quadruped.xml")
            .with_actuator_class(ActuatorClassConfig::new("legs", Vec::<String>::new()));

        let err = robot.validate().unwrap_err();
        assert!(matches!(err, MorphologyError::EmptyClass { .. }));
    }

    #[test]
    fn test_actuator_class_for() {
        let robot = RobotMorphology::new("quadruped", "models/quadruped.xml")
            .with_joints(quadruped_joints())
            .with_actuator_class(legs());

        let class = robot.actuator_class_for("BR_calf_joint").unwrap();
        assert_eq!(class.name, "legs");
        assert!(robot.actuator_class_for("tail_joint").is_err());
    }

    #[test]
    fn test_initial_state_resolution() {
        let init = InitialState::at_position(Vector3::new(0.0, 0.0, 0.1))
            .with_joint_pos("FL_calf_joint", -0.41)
            .with_joint_pos(".*_calf_joint", 0.41)
            .with_joint_vel(".*", 0.0);

        // First matching pattern wins.
        assert_relative_eq!(init.joint_pos_for("FL_calf_joint").unwrap(), -0.41);
        assert_relative_eq!(init.joint_pos_for("FR_calf_joint").unwrap(), 0.41);
        // Unmatched joints default to zero.
        assert_relative_eq!(init.joint_pos_for("FL_hip_joint").unwrap(), 0.0);
        assert_relative_eq!(init.joint_vel_for("FL_hip_joint").unwrap(), 0.0);
    }
}
