//! Velocity tracking tasks, rough and flat terrain.
//!
//! The robot tracks a resampled twist command. The rough variant walks a
//! generated height field with a terrain difficulty curriculum; the flat
//! variant derives from it by swapping the terrain for a plane and
//! relaxing the solver settings the height field needed.

use rl_env::{
    ComposeError, Composer, EntitySelector, EnvConfig, EventMode, EventTerm, ParamPatch,
    TaskOverride, TermParams, TerminationTerm, TwistAxis, ViewerConfig,
};
use rl_robot::derive_action_scale;
use rl_sensor::{ContactField, ContactMatchSpec, ContactSensorSpec, MatchMode, ReduceMode};

use crate::base::{velocity_base_env, FEET_CONTACT_SENSOR, TERRAIN_SCAN_SENSOR};
use crate::error::TaskError;
use crate::getup::NONFOOT_SENSOR;
use crate::quadruped::{
    foot_geom_names, foot_site_names, quadruped_morphology, BODY_NAME, ROBOT_ENTITY,
};
use crate::Result;

fn feet_ground_sensor() -> ContactSensorSpec {
    ContactSensorSpec::new(
        FEET_CONTACT_SENSOR,
        ContactMatchSpec::new(MatchMode::Geom, foot_geom_names()).with_entity(ROBOT_ENTITY),
        ContactMatchSpec::new(MatchMode::Body, ["terrain"]),
    )
    .with_fields([ContactField::Found, ContactField::Force])
    .with_reduce(ReduceMode::NetForce)
    .with_num_slots(1)
    .with_track_air_time(true)
}

fn nonfoot_ground_sensor() -> ContactSensorSpec {
    ContactSensorSpec::new(
        NONFOOT_SENSOR,
        ContactMatchSpec::new(MatchMode::Geom, [r".*_collision\d*$"])
            .with_entity(ROBOT_ENTITY)
            .with_exclude(foot_geom_names()),
        ContactMatchSpec::new(MatchMode::Body, ["terrain"]),
    )
    .with_fields([ContactField::Found])
    .with_reduce(ReduceMode::None)
    .with_num_slots(1)
}

fn feet_sites() -> EntitySelector {
    EntitySelector::entity(ROBOT_ENTITY).with_sites(foot_site_names())
}

/// Per-gait pose tracking stds: tight while standing, loose while moving,
/// calves looser than hips and thighs throughout.
fn pose_stds() -> [(&'static str, [(&'static str, f64); 3]); 3] {
    [
        (
            "std_standing",
            [
                (".*_hip_joint", 0.05),
                (".*_thigh_joint", 0.05),
                (".*_calf_joint", 0.1),
            ],
        ),
        (
            "std_walking",
            [
                (".*_hip_joint", 0.3),
                (".*_thigh_joint", 0.3),
                (".*_calf_joint", 0.6),
            ],
        ),
        (
            "std_running",
            [
                (".*_hip_joint", 0.3),
                (".*_thigh_joint", 0.3),
                (".*_calf_joint", 0.6),
            ],
        ),
    ]
}

/// The rough-terrain override list, in application order.
#[allow(clippy::too_many_lines)]
fn rough_overrides(play: bool) -> Result<Vec<TaskOverride>> {
    let robot = quadruped_morphology();
    let action_scale = derive_action_scale(&robot).map_err(ComposeError::from)?;

    let mut ops = vec![
        TaskOverride::SetCcdIterations { iterations: 500 },
        TaskOverride::SetContactSensorMaxmatch { maxmatch: 500 },
        TaskOverride::SetRobot {
            entity: ROBOT_ENTITY.to_string(),
            morphology: robot,
        },
        TaskOverride::AttachSensor(feet_ground_sensor()),
        TaskOverride::AttachSensor(nonfoot_ground_sensor()),
        // No scanner on this morphology.
        TaskOverride::RemoveSensor {
            name: TERRAIN_SCAN_SENSOR.to_string(),
            required: true,
        },
        TaskOverride::SetTerrainGeneratorCurriculum { enabled: true },
        TaskOverride::SetActionScale {
            action: "joint_pos".to_string(),
            scale: action_scale,
        },
        TaskOverride::SetViewer(ViewerConfig::tracking(BODY_NAME, 2.0, -10.0)),
        TaskOverride::PatchObservation {
            group: "critic".to_string(),
            name: "foot_height".to_string(),
            patch: ParamPatch::Asset(feet_sites()),
        },
    ];

    // The scan observations go with the sensor.
    for group in ["actor", "critic"] {
        ops.push(TaskOverride::RemoveObservation {
            group: group.to_string(),
            name: "height_scan".to_string(),
            required: false,
        });
    }

    ops.push(TaskOverride::PatchEvent {
        name: "foot_friction".to_string(),
        patch: ParamPatch::Asset(
            EntitySelector::entity(ROBOT_ENTITY).with_geoms(foot_geom_names()),
        ),
    });
    ops.push(TaskOverride::PatchEvent {
        name: "base_com".to_string(),
        patch: ParamPatch::Asset(EntitySelector::entity(ROBOT_ENTITY).with_bodies([BODY_NAME])),
    });

    for (key, stds) in pose_stds() {
        ops.push(TaskOverride::PatchReward {
            name: "pose".to_string(),
            patch: ParamPatch::JointScalars {
                key: key.to_string(),
                values: stds.iter().map(|(p, v)| ((*p).to_string(), *v)).collect(),
            },
        });
    }

    for name in ["upright", "body_ang_vel"] {
        ops.push(TaskOverride::PatchReward {
            name: name.to_string(),
            patch: ParamPatch::Asset(
                EntitySelector::entity(ROBOT_ENTITY).with_bodies([BODY_NAME]),
            ),
        });
    }
    for name in ["foot_clearance", "foot_swing_height", "foot_slip"] {
        ops.push(TaskOverride::PatchReward {
            name: name.to_string(),
            patch: ParamPatch::Asset(feet_sites()),
        });
    }

    // Swing target of 7 cm instead of the template's 10 cm.
    for name in ["foot_clearance", "foot_swing_height"] {
        ops.push(TaskOverride::PatchReward {
            name: name.to_string(),
            patch: ParamPatch::Scalar {
                key: "target_height".to_string(),
                value: 0.07,
            },
        });
    }

    let weights = [
        ("upright", 1.0),
        ("pose", 1.0),
        ("dof_pos_limits", -1.0),
        ("action_rate_l2", -0.1),
        ("foot_clearance", -2.0),
        ("foot_swing_height", -0.25),
        ("foot_slip", -0.1),
        ("soft_landing", -1e-5),
        // Kept attached but disabled.
        ("body_ang_vel", 0.0),
        ("angular_momentum", 0.0),
        ("air_time", 0.0),
    ];
    for (name, weight) in weights {
        ops.push(TaskOverride::SetRewardWeight {
            name: name.to_string(),
            weight,
        });
    }

    // Unlike getup, any non-foot contact here is terminal.
    ops.push(TaskOverride::InsertTermination {
        name: "illegal_contact".to_string(),
        term: TerminationTerm::new()
            .with_params(TermParams::default().with_sensor(NONFOOT_SENSOR)),
    });

    ops.push(TaskOverride::SetCommandVizOffset {
        name: "twist".to_string(),
        z_offset: 0.5,
    });

    if play {
        ops.extend([
            // Effectively unbounded episode.
            TaskOverride::SetEpisodeLength { seconds: 1e9 },
            TaskOverride::SetObservationCorruption {
                group: "actor".to_string(),
                enabled: false,
            },
            TaskOverride::RemoveEvent {
                name: "push_robot".to_string(),
                required: false,
            },
            TaskOverride::ClearCurriculum,
            TaskOverride::InsertEvent {
                name: "randomize_terrain".to_string(),
                term: EventTerm::new(EventMode::Reset),
            },
            TaskOverride::SetTerrainGeneratorCurriculum { enabled: false },
            TaskOverride::SetTerrainGrid {
                num_rows: 5,
                num_cols: 5,
                border_width: 10.0,
            },
        ]);
    }

    Ok(ops)
}

/// Compose the rough-terrain velocity environment configuration.
///
/// # Errors
///
/// Returns [`TaskError::Compose`] if the morphology, sensors, or override
/// list fail validation.
///
/// # Example
///
/// ```
/// use rl_tasks::velocity_rough_env;
///
/// let cfg = velocity_rough_env(false).unwrap();
/// assert!(cfg.scene.has_sensor("feet_ground_contact"));
/// assert!(!cfg.scene.has_sensor("terrain_scan"));
/// ```
pub fn velocity_rough_env(play: bool) -> Result<EnvConfig> {
    let base = velocity_base_env();
    let overrides = rough_overrides(play)?;
    Composer::apply(&base, &overrides).map_err(TaskError::from)
}

/// Compose the flat-terrain velocity environment configuration.
///
/// Derives from the rough composition: plane terrain, smaller constraint
/// arena, fewer solver iterations, no terrain curriculum. Play mode widens
/// the command ranges for behavior review.
///
/// # Errors
///
/// Returns [`TaskError::Compose`] if composition fails.
pub fn velocity_flat_env(play: bool) -> Result<EnvConfig> {
    let rough = velocity_rough_env(play)?;

    let mut ops = vec![
        TaskOverride::SetNjmax { njmax: 300 },
        TaskOverride::SetCcdIterations { iterations: 50 },
        TaskOverride::SetContactSensorMaxmatch { maxmatch: 64 },
        TaskOverride::SetTerrainPlane,
        // Absent in play mode, where the rough composition cleared all
        // curricula.
        TaskOverride::RemoveCurriculum {
            name: "terrain_levels".to_string(),
            required: false,
        },
    ];

    if play {
        ops.push(TaskOverride::SetCommandRange {
            name: "twist".to_string(),
            axis: TwistAxis::LinVelX,
            min: -1.5,
            max: 2.0,
        });
        ops.push(TaskOverride::SetCommandRange {
            name: "twist".to_string(),
            axis: TwistAxis::AngVelZ,
            min: -0.7,
            max: 0.7,
        });
    }

    Composer::apply(&rough, &ops).map_err(TaskError::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use rl_env::{CommandTerm, TerrainType};

    #[test]
    fn test_rough_train_composition() {
        let cfg = velocity_rough_env(false).unwrap();

        assert!(cfg.scene.has_sensor(FEET_CONTACT_SENSOR));
        assert!(cfg.scene.has_sensor(NONFOOT_SENSOR));
        assert!(!cfg.scene.has_sensor(TERRAIN_SCAN_SENSOR));

        let generator = cfg.scene.terrain.as_ref().unwrap().generator.as_ref().unwrap();
        assert!(generator.curriculum);

        assert_eq!(cfg.rewards["upright"].weight, 1.0);
        assert_eq!(cfg.rewards["foot_clearance"].weight, -2.0);
        assert_eq!(cfg.rewards["air_time"].weight, 0.0);
        assert_eq!(
            cfg.rewards["foot_clearance"].params.scalars["target_height"],
            0.07
        );

        assert_eq!(
            cfg.terminations["illegal_contact"].params.sensor.as_deref(),
            Some(NONFOOT_SENSOR)
        );

        let CommandTerm::Twist(twist) = &cfg.commands["twist"];
        assert_eq!(twist.viz_z_offset, 0.5);
    }

    #[test]
    fn test_rough_feet_sensor_shape() {
        let cfg = velocity_rough_env(false).unwrap();
        let feet = cfg
            .scene
            .sensors
            .iter()
            .find(|s| s.name == FEET_CONTACT_SENSOR)
            .unwrap();

        assert!(feet.track_air_time);
        assert_eq!(feet.reduce, rl_sensor::ReduceMode::NetForce);
        assert!(feet.reports(ContactField::Force));

        let primary = feet.primary.compile().unwrap();
        assert!(primary.matches("FL_foot_collision"));
        assert!(!primary.matches("body_collision"));
    }

    #[test]
    fn test_rough_observation_retargeting() {
        let cfg = velocity_rough_env(false).unwrap();

        let critic = &cfg.observations["critic"].terms;
        assert!(!critic.contains_key("height_scan"));
        assert!(!cfg.observations["actor"].terms.contains_key("height_scan"));

        let asset = critic["foot_height"].params.asset.as_ref().unwrap();
        assert_eq!(asset.site_names, vec!["FL", "FR", "BL", "BR"]);
    }

    #[test]
    fn test_rough_pose_stds() {
        let cfg = velocity_rough_env(false).unwrap();
        let pose = &cfg.rewards["pose"].params.joint_scalars;

        assert_eq!(pose["std_standing"][2], (".*_calf_joint".to_string(), 0.1));
        assert_eq!(pose["std_walking"][0], (".*_hip_joint".to_string(), 0.3));
        assert_eq!(pose["std_running"][2], (".*_calf_joint".to_string(), 0.6));
    }

    #[test]
    fn test_rough_play_determinism_overrides() {
        let cfg = velocity_rough_env(true).unwrap();

        assert_eq!(cfg.episode_length_s, 1e9);
        assert!(!cfg.observations["actor"].enable_corruption);
        assert!(!cfg.events.contains_key("push_robot"));
        assert!(cfg.events.contains_key("randomize_terrain"));
        assert!(cfg.curriculum.is_empty());

        let generator = cfg.scene.terrain.as_ref().unwrap().generator.as_ref().unwrap();
        assert!(!generator.curriculum);
        assert_eq!((generator.num_rows, generator.num_cols), (5, 5));
        assert_eq!(generator.border_width, 10.0);
    }

    #[test]
    fn test_flat_derives_from_rough() {
        let cfg = velocity_flat_env(false).unwrap();

        assert_eq!(cfg.sim.njmax, Some(300));
        assert_eq!(cfg.sim.ccd_iterations, 50);
        assert_eq!(cfg.sim.contact_sensor_maxmatch, 64);

        let terrain = cfg.scene.terrain.as_ref().unwrap();
        assert_eq!(terrain.terrain_type, TerrainType::Plane);
        assert!(terrain.generator.is_none());
        assert!(!cfg.curriculum.contains_key("terrain_levels"));

        // Rough customizations carry through.
        assert!(cfg.scene.has_sensor(FEET_CONTACT_SENSOR));
        assert_eq!(cfg.rewards["foot_swing_height"].weight, -0.25);
    }

    #[test]
    fn test_flat_play_widens_commands() {
        let cfg = velocity_flat_env(true).unwrap();

        let CommandTerm::Twist(twist) = &cfg.commands["twist"];
        assert_eq!(twist.ranges.get(TwistAxis::LinVelX), (-1.5, 2.0));
        assert_eq!(twist.ranges.get(TwistAxis::AngVelZ), (-0.7, 0.7));
        // Lateral range inherited from the base.
        assert_eq!(twist.ranges.get(TwistAxis::LinVelY), (-0.6, 0.6));
    }

    #[test]
    fn test_composition_idempotent() {
        assert_eq!(
            velocity_rough_env(false).unwrap(),
            velocity_rough_env(false).unwrap()
        );
        assert_eq!(
            velocity_flat_env(true).unwrap(),
            velocity_flat_env(true).unwrap()
        );
    }
}
