//! Quadruped robot constants.
//!
//! Twelve actuated joints, three per leg, all driven by one actuator class.
//! The morphology is built fresh on every call; derived values (the action
//! scale) are computed from it by the tasks, never shared between them.

use nalgebra::Vector3;

use rl_robot::{ActuatorClassConfig, CollisionConfig, InitialState, RobotMorphology};

/// Maximum actuator effort (Nm).
pub const EFFORT_LIMIT: f64 = 6.0;

/// Position-gain stiffness (Nm/rad).
pub const STIFFNESS: f64 = 10.0;

/// Velocity-gain damping (Nm·s/rad).
pub const DAMPING: f64 = 0.0;

/// Reflected rotor inertia (kg·m²).
pub const ARMATURE: f64 = 0.031;

/// Action scale implied by the gains: `0.25 * EFFORT_LIMIT / STIFFNESS`.
pub const ACTION_SCALE: f64 = 0.25 * EFFORT_LIMIT / STIFFNESS;

/// Leg prefixes, front/back x left/right.
pub const LEGS: [&str; 4] = ["FL", "FR", "BL", "BR"];

/// Joint parts within each leg.
pub const LEG_PARTS: [&str; 3] = ["hip", "thigh", "calf"];

/// Scene entity key the tasks register the robot under.
pub const ROBOT_ENTITY: &str = "robot";

/// Name of the torso body.
pub const BODY_NAME: &str = "body";

const FOOT_PATTERN: &str = "[FB][LR]_foot_collision";

/// The twelve actuated joint names, `<leg>_<part>_joint`.
#[must_use]
pub fn joint_names() -> Vec<String> {
    LEGS.iter()
        .flat_map(|leg| {
            LEG_PARTS
                .iter()
                .map(move |part| format!("{leg}_{part}_joint"))
        })
        .collect()
}

/// The four foot collision geom names, `<leg>_foot_collision`.
#[must_use]
pub fn foot_geom_names() -> Vec<String> {
    LEGS.iter()
        .map(|leg| format!("{leg}_foot_collision"))
        .collect()
}

/// The four foot site names (the leg prefixes).
#[must_use]
pub fn foot_site_names() -> Vec<String> {
    LEGS.iter().map(ToString::to_string).collect()
}

/// Build the quadruped morphology.
///
/// Pure function of the constants above: each call returns a fresh
/// instance, so tasks composed in the same process cannot share mutable
/// state through it.
///
/// # Example
///
/// ```
/// use rl_robot::derive_action_scale;
/// use rl_tasks::quadruped_morphology;
///
/// let robot = quadruped_morphology();
/// robot.validate().unwrap();
///
/// let scale = derive_action_scale(&robot).unwrap();
/// assert_eq!(scale.scale_for_joint("FL_hip_joint").unwrap(), 0.15);
/// ```
#[must_use]
pub fn quadruped_morphology() -> RobotMorphology {
    let legs = ActuatorClassConfig::new(
        "legs",
        [".*_hip_joint", ".*_thigh_joint", ".*_calf_joint"],
    )
    .with_stiffness(STIFFNESS)
    .with_damping(DAMPING)
    .with_effort_limit(EFFORT_LIMIT)
    .with_armature(ARMATURE);

    // Feet get a friction cone and contact priority; everything else
    // collides with a frictionless normal only.
    let collision = CollisionConfig::new([".*_collision"])
        .with_condim(FOOT_PATTERN, 3)
        .with_condim(".*_collision", 1)
        .with_priority(FOOT_PATTERN, 1)
        .with_friction(FOOT_PATTERN, 0.6)
        .with_solimp(FOOT_PATTERN, [0.9, 0.95, 0.023]);

    let init_state = InitialState::at_position(Vector3::new(0.0, 0.0, 0.1))
        .with_joint_pos(".*", 0.0)
        .with_joint_vel(".*", 0.0);

    RobotMorphology::new("quadruped", "models/quadruped/quadruped.xml")
        .with_joints(joint_names())
        .with_body_name(BODY_NAME)
        .with_foot_sites(foot_site_names())
        .with_foot_geoms(foot_geom_names())
        .with_actuator_class(legs)
        .with_init_state(init_state)
        .with_collision(collision)
        .with_soft_joint_pos_limit_factor(0.9)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rl_robot::derive_action_scale;

    #[test]
    fn test_morphology_valid() {
        let robot = quadruped_morphology();
        assert!(robot.validate().is_ok());
        assert_eq!(robot.joint_names.len(), 12);
        assert_eq!(robot.foot_geom_names.len(), 4);
    }

    #[test]
    fn test_derived_scale_matches_constant() {
        let scale = derive_action_scale(&quadruped_morphology()).unwrap();

        assert_eq!(scale.len(), 3);
        for (_, s) in scale.iter() {
            assert_relative_eq!(s, ACTION_SCALE);
            assert_relative_eq!(s, 0.15);
        }
    }

    #[test]
    fn test_every_joint_owned_once() {
        let robot = quadruped_morphology();
        for joint in &robot.joint_names {
            let class = robot.actuator_class_for(joint).unwrap();
            assert_eq!(class.name, "legs");
        }
    }

    #[test]
    fn test_fresh_instance_per_call() {
        let a = quadruped_morphology();
        let mut b = quadruped_morphology();
        assert_eq!(a, b);

        // Mutating one instance cannot affect later calls.
        b.joint_names.pop();
        assert_ne!(b, a);
        assert_eq!(quadruped_morphology(), a);
    }

    #[test]
    fn test_initial_pose() {
        let robot = quadruped_morphology();
        assert_relative_eq!(robot.init_state.base_position.z, 0.1);
        assert_relative_eq!(robot.init_state.joint_pos_for("BR_calf_joint").unwrap(), 0.0);
    }
}
