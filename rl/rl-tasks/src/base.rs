//! Generic base environment templates.
//!
//! These are the robot-agnostic starting points the task modules compose
//! against with their override lists. They are data only: no simulation
//! behavior lives here, and a template on its own is not a valid
//! configuration. It becomes one after a task attaches a robot entity and
//! the sensors its terms reference.
//!
//! The velocity template declares gait rewards against a feet contact
//! sensor named `feet_ground_contact` that the template itself does not
//! attach: supplying a sensor under that name is part of the task's
//! contract, and composition fails if the task forgets it.

use rl_env::{
    ActionScale, ActionTerm, CommandTerm, CurriculumTerm, EntitySelector, EnvConfig, EventMode,
    EventTerm, ObservationGroup, ObservationTerm, RewardTerm, TermParams, TerminationTerm,
    TerrainConfig, TwistCommand, TwistRanges,
};
use rl_sensor::{ContactField, ContactMatchSpec, ContactSensorSpec, MatchMode};

use crate::getup::GetupTaskParams;
use crate::quadruped::ROBOT_ENTITY;

/// Name of the feet contact sensor the velocity template's gait rewards
/// read. The task must attach a sensor under this name.
pub const FEET_CONTACT_SENSOR: &str = "feet_ground_contact";

/// Name of the terrain scan sensor the velocity template attaches.
pub const TERRAIN_SCAN_SENSOR: &str = "terrain_scan";

fn robot_asset() -> EntitySelector {
    EntitySelector::entity(ROBOT_ENTITY)
}

fn joint_pos_action(scale: f64) -> ActionTerm {
    ActionTerm::JointPosition {
        entity: ROBOT_ENTITY.to_string(),
        joint_patterns: vec![".*".to_string()],
        scale: ActionScale::Uniform(scale),
    }
}

/// Base template for stand-up recovery tasks.
///
/// Observation groups carry no velocity terms beyond the base rates; the
/// getup task additionally strips `base_lin_vel`/`base_ang_vel` so the
/// policy must balance from posture alone.
#[must_use]
pub fn getup_base_env(params: &GetupTaskParams) -> EnvConfig {
    let mut cfg = EnvConfig::default();

    cfg.scene.terrain = Some(TerrainConfig::plane());
    cfg.episode_length_s = params.episode_timeout_s;

    cfg.actions.insert(
        "joint_pos".to_string(),
        joint_pos_action(params.action_scale),
    );

    let proprio = |noise: f64| ObservationTerm::new().with_noise(noise);
    let actor = ObservationGroup::new()
        .with_corruption(true)
        .with_term("base_lin_vel", proprio(0.1))
        .with_term("base_ang_vel", proprio(0.2))
        .with_term("projected_gravity", proprio(0.05))
        .with_term("joint_pos", proprio(0.01))
        .with_term("joint_vel", proprio(1.5))
        .with_term("actions", ObservationTerm::new());
    let critic = ObservationGroup::new()
        .with_term("base_lin_vel", ObservationTerm::new())
        .with_term("base_ang_vel", ObservationTerm::new())
        .with_term("projected_gravity", ObservationTerm::new())
        .with_term("joint_pos", ObservationTerm::new())
        .with_term("joint_vel", ObservationTerm::new())
        .with_term("actions", ObservationTerm::new())
        .with_term("body_height", ObservationTerm::new());
    cfg.observations.insert("actor".to_string(), actor);
    cfg.observations.insert("critic".to_string(), critic);

    cfg.rewards.insert(
        "target_height".to_string(),
        RewardTerm::new(1.0).with_params(
            TermParams::default()
                .with_asset(robot_asset())
                .with_scalar("target_height", params.target_body_height)
                .with_scalar("min_height", params.min_body_height),
        ),
    );
    cfg.rewards.insert(
        "upright".to_string(),
        RewardTerm::new(1.0).with_params(TermParams::default().with_asset(robot_asset())),
    );
    cfg.rewards.insert(
        "joint_symmetry".to_string(),
        RewardTerm::new(0.5).with_params(
            TermParams::default().with_joint_scalars(
                "pairs",
                [("FL|FR", 1.0), ("BL|BR", 1.0)],
            ),
        ),
    );
    cfg.rewards.insert(
        "hip_stability".to_string(),
        RewardTerm::new(0.3)
            .with_params(TermParams::default().with_joint_scalars("std", [(".*_hip_joint", 0.1)])),
    );
    cfg.rewards
        .insert("dof_vel".to_string(), RewardTerm::new(-0.001));
    cfg.rewards
        .insert("torques".to_string(), RewardTerm::new(-0.0001));
    cfg.rewards
        .insert("action_rate_l2".to_string(), RewardTerm::new(-0.01));

    cfg.terminations
        .insert("time_out".to_string(), TerminationTerm::timeout());
    cfg.terminations.insert(
        "excessive_tilt".to_string(),
        TerminationTerm::new().with_params(
            TermParams::default()
                .with_asset(robot_asset())
                .with_scalar("max_tilt_angle", params.max_tilt_angle_deg),
        ),
    );

    cfg.events.insert(
        "reset_to_seated".to_string(),
        EventTerm::new(EventMode::Reset).with_params(
            TermParams::default()
                .with_asset(robot_asset())
                .with_joint_scalars("joint_pos", params.seated_joint_pos.clone()),
        ),
    );
    cfg.events.insert(
        "randomize_target_height".to_string(),
        EventTerm::new(EventMode::Reset).with_params(
            TermParams::default()
                .with_scalar("min_height", params.min_body_height)
                .with_scalar("max_height", 0.30),
        ),
    );

    cfg
}

/// Base template for velocity tracking tasks.
///
/// Ships a generated terrain, a twist command, the standard locomotion
/// reward set, and a terrain scan sensor that morphologies without a
/// scanner remove.
#[must_use]
pub fn velocity_base_env() -> EnvConfig {
    let mut cfg = EnvConfig::default();

    cfg.scene.terrain = Some(TerrainConfig::generated());

    // Probe grid under the base, reporting terrain contact heights.
    cfg.scene.sensors.push(
        ContactSensorSpec::new(
            TERRAIN_SCAN_SENSOR,
            ContactMatchSpec::new(MatchMode::Geom, ["base_scan_probe_\\d+"])
                .with_entity(ROBOT_ENTITY),
            ContactMatchSpec::new(MatchMode::Body, ["terrain"]),
        )
        .with_fields([ContactField::Found])
        .with_num_slots(32),
    );

    cfg.actions
        .insert("joint_pos".to_string(), joint_pos_action(0.5));

    let proprio = |noise: f64| ObservationTerm::new().with_noise(noise);
    let actor = ObservationGroup::new()
        .with_corruption(true)
        .with_term("base_ang_vel", proprio(0.2))
        .with_term("projected_gravity", proprio(0.05))
        .with_term("velocity_commands", ObservationTerm::new())
        .with_term("joint_pos", proprio(0.01))
        .with_term("joint_vel", proprio(1.5))
        .with_term("actions", ObservationTerm::new())
        .with_term(
            "height_scan",
            ObservationTerm::new()
                .with_noise(0.1)
                .with_params(TermParams::default().with_sensor(TERRAIN_SCAN_SENSOR)),
        );
    let critic = ObservationGroup::new()
        .with_term("base_lin_vel", ObservationTerm::new())
        .with_term("base_ang_vel", ObservationTerm::new())
        .with_term("projected_gravity", ObservationTerm::new())
        .with_term("velocity_commands", ObservationTerm::new())
        .with_term("joint_pos", ObservationTerm::new())
        .with_term("joint_vel", ObservationTerm::new())
        .with_term("actions", ObservationTerm::new())
        .with_term(
            "foot_height",
            ObservationTerm::new().with_params(TermParams::default().with_asset(robot_asset())),
        )
        .with_term(
            "height_scan",
            ObservationTerm::new()
                .with_params(TermParams::default().with_sensor(TERRAIN_SCAN_SENSOR)),
        );
    cfg.observations.insert("actor".to_string(), actor);
    cfg.observations.insert("critic".to_string(), critic);

    cfg.rewards.insert(
        "track_lin_vel".to_string(),
        RewardTerm::new(1.0).with_params(TermParams::default().with_scalar("std", 0.25)),
    );
    cfg.rewards.insert(
        "track_ang_vel".to_string(),
        RewardTerm::new(0.5).with_params(TermParams::default().with_scalar("std", 0.25)),
    );
    cfg.rewards.insert(
        "upright".to_string(),
        RewardTerm::new(0.5).with_params(TermParams::default().with_asset(robot_asset())),
    );
    cfg.rewards.insert(
        "pose".to_string(),
        RewardTerm::new(0.5).with_params(
            TermParams::default()
                .with_joint_scalars("std_standing", [(".*", 0.1)])
                .with_joint_scalars("std_walking", [(".*", 0.3)])
                .with_joint_scalars("std_running", [(".*", 0.6)]),
        ),
    );
    cfg.rewards
        .insert("dof_pos_limits".to_string(), RewardTerm::new(0.0));
    cfg.rewards
        .insert("action_rate_l2".to_string(), RewardTerm::new(-0.01));
    cfg.rewards.insert(
        "foot_clearance".to_string(),
        RewardTerm::new(-0.5).with_params(
            TermParams::default()
                .with_asset(robot_asset())
                .with_scalar("target_height", 0.1),
        ),
    );
    cfg.rewards.insert(
        "foot_swing_height".to_string(),
        RewardTerm::new(-0.1).with_params(
            TermParams::default()
                .with_asset(robot_asset())
                .with_scalar("target_height", 0.1),
        ),
    );
    cfg.rewards.insert(
        "foot_slip".to_string(),
        RewardTerm::new(-0.05).with_params(
            TermParams::default()
                .with_asset(robot_asset())
                .with_sensor(FEET_CONTACT_SENSOR),
        ),
    );
    cfg.rewards.insert(
        "soft_landing".to_string(),
        RewardTerm::new(0.0)
            .with_params(TermParams::default().with_sensor(FEET_CONTACT_SENSOR)),
    );
    cfg.rewards.insert(
        "body_ang_vel".to_string(),
        RewardTerm::new(-0.05).with_params(TermParams::default().with_asset(robot_asset())),
    );
    cfg.rewards
        .insert("angular_momentum".to_string(), RewardTerm::new(-0.01));
    cfg.rewards.insert(
        "air_time".to_string(),
        RewardTerm::new(0.25)
            .with_params(TermParams::default().with_sensor(FEET_CONTACT_SENSOR)),
    );

    cfg.terminations
        .insert("time_out".to_string(), TerminationTerm::timeout());
    cfg.terminations.insert(
        "bad_orientation".to_string(),
        TerminationTerm::new().with_params(
            TermParams::default()
                .with_asset(robot_asset())
                .with_scalar("limit_angle", 60.0),
        ),
    );

    cfg.events.insert(
        "foot_friction".to_string(),
        EventTerm::new(EventMode::Startup).with_params(
            TermParams::default()
                .with_asset(robot_asset())
                .with_range("friction", 0.3, 1.2),
        ),
    );
    cfg.events.insert(
        "base_com".to_string(),
        EventTerm::new(EventMode::Startup).with_params(
            TermParams::default()
                .with_asset(robot_asset())
                .with_range("com_offset", -0.05, 0.05),
        ),
    );
    cfg.events.insert(
        "push_robot".to_string(),
        EventTerm::new(EventMode::Interval).with_params(
            TermParams::default()
                .with_asset(robot_asset())
                .with_range("velocity", -0.5, 0.5)
                .with_scalar("interval_s", 10.0),
        ),
    );

    cfg.commands.insert(
        "twist".to_string(),
        CommandTerm::Twist(TwistCommand {
            ranges: TwistRanges {
                lin_vel_x: (-1.0, 1.0),
                lin_vel_y: (-0.6, 0.6),
                ang_vel_z: (-1.0, 1.0),
            },
            resampling_time_s: 10.0,
            viz_z_offset: 0.0,
        }),
    );

    cfg.curriculum
        .insert("terrain_levels".to_string(), CurriculumTerm::TerrainLevels);

    cfg
}
