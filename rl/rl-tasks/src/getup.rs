//! Stand-up recovery task.
//!
//! The robot starts seated on the ground and must reach a target body
//! height without tipping over. Base velocity observations are withheld
//! from both actor and critic so the policy balances from posture alone,
//! and non-foot ground contact is penalized rather than terminal, since
//! the robot necessarily touches the ground while rising.

use rl_env::{
    ComposeError, Composer, CurriculumStage, CurriculumStageSchedule, CurriculumTerm, EnvConfig,
    ParamPatch, RewardTerm, TaskOverride, TermParams, ViewerConfig,
};
use rl_robot::derive_action_scale;
use rl_sensor::{ContactField, ContactMatchSpec, ContactSensorSpec, MatchMode, ReduceMode};

use crate::base::getup_base_env;
use crate::error::TaskError;
use crate::quadruped::{foot_geom_names, quadruped_morphology, BODY_NAME, LEGS, ROBOT_ENTITY};
use crate::Result;

/// Name of the non-foot ground contact sensor.
pub const NONFOOT_SENSOR: &str = "nonfoot_ground_touch";

/// Parameters of the stand-up task.
#[derive(Debug, Clone, PartialEq)]
pub struct GetupTaskParams {
    /// Target standing pose, `(joint pattern, angle)`.
    pub target_joint_pos: Vec<(String, f64)>,

    /// Initial seated pose, `(joint pattern, angle)`.
    pub seated_joint_pos: Vec<(String, f64)>,

    /// Body height when standing (m).
    pub target_body_height: f64,

    /// Minimum body height counted as standing (m).
    pub min_body_height: f64,

    /// Tilt angle beyond which the episode terminates (deg).
    pub max_tilt_angle_deg: f64,

    /// Episode timeout (s).
    pub episode_timeout_s: f64,

    /// Uniform action scale of the base template.
    pub action_scale: f64,
}

impl Default for GetupTaskParams {
    fn default() -> Self {
        let mut target = Vec::new();
        let mut seated = Vec::new();
        // Calf angles mirror left/right; back legs fold slightly further.
        let calf_angles = [
            ("FL", -0.41),
            ("FR", 0.41),
            ("BL", -0.491),
            ("BR", 0.491),
        ];
        for leg in LEGS {
            target.push((format!("{leg}_hip_joint"), 0.0));
            target.push((format!("{leg}_thigh_joint"), 0.0));
            for part in ["hip", "thigh", "calf"] {
                seated.push((format!("{leg}_{part}_joint"), 0.0));
            }
        }
        for (leg, angle) in calf_angles {
            target.push((format!("{leg}_calf_joint"), angle));
        }

        Self {
            target_joint_pos: target,
            seated_joint_pos: seated,
            target_body_height: 0.18,
            min_body_height: 0.16,
            max_tilt_angle_deg: 30.0,
            episode_timeout_s: 20.0,
            action_scale: 0.1,
        }
    }
}

/// Target-height curriculum: widen and lower the sampled height range as
/// training progresses. Thresholds are in env steps (iterations times 24
/// steps per env).
fn target_height_schedule() -> rl_env::Result<CurriculumStageSchedule> {
    CurriculumStageSchedule::new([
        CurriculumStage::new(0, 0.21, 0.23),
        CurriculumStage::new(1_000 * 24, 0.18, 0.26),
        CurriculumStage::new(2_000 * 24, 0.16, 0.28),
        CurriculumStage::new(3_000 * 24, 0.14, 0.30),
    ])
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

/// The getup override list, in application order.
fn getup_overrides(params: &GetupTaskParams, play: bool) -> Result<Vec<TaskOverride>> {
    let robot = quadruped_morphology();
    let action_scale = derive_action_scale(&robot).map_err(ComposeError::from)?;

    let mut ops = vec![
        TaskOverride::SetRobot {
            entity: ROBOT_ENTITY.to_string(),
            morphology: robot,
        },
        TaskOverride::SetCcdIterations { iterations: 500 },
        TaskOverride::SetContactSensorMaxmatch { maxmatch: 500 },
        TaskOverride::AttachSensor(nonfoot_ground_sensor()),
        // Penalize non-foot contact instead of terminating: the robot
        // starts on the ground and needs time to stand up.
        TaskOverride::InsertReward {
            name: "illegal_contact".to_string(),
            term: RewardTerm::new(0.5)
                .with_params(TermParams::default().with_sensor(NONFOOT_SENSOR)),
        },
        TaskOverride::SetActionScale {
            action: "joint_pos".to_string(),
            scale: action_scale,
        },
        TaskOverride::SetViewer(ViewerConfig::tracking(BODY_NAME, 2.0, -10.0)),
    ];

    // Balance-only policies: strip base velocity observations.
    for group in ["actor", "critic"] {
        for name in ["base_lin_vel", "base_ang_vel"] {
            ops.push(TaskOverride::RemoveObservation {
                group: group.to_string(),
                name: name.to_string(),
                required: true,
            });
        }
    }

    if play {
        // Pin the sampled target height for deterministic evaluation.
        for key in ["min_height", "max_height"] {
            ops.push(TaskOverride::PatchEvent {
                name: "randomize_target_height".to_string(),
                patch: ParamPatch::Scalar {
                    key: key.to_string(),
                    value: params.min_body_height,
                },
            });
        }
    }

    let schedule = if play {
        CurriculumStageSchedule::fixed(params.min_body_height)
    } else {
        target_height_schedule()?
    };
    ops.push(TaskOverride::InsertCurriculum {
        name: "target_height".to_string(),
        term: CurriculumTerm::Staged {
            parameter: "target_height".to_string(),
            schedule,
        },
    });

    Ok(ops)
}

/// Compose the getup environment configuration.
///
/// # Errors
///
/// Returns [`TaskError::Compose`] if the morphology, sensors, or override
/// list fail validation.
///
/// # Example
///
/// ```
/// use rl_tasks::getup_env;
///
/// let cfg = getup_env(false).unwrap();
/// assert!(cfg.scene.has_sensor("nonfoot_ground_touch"));
/// assert!(cfg.curriculum.contains_key("target_height"));
/// ```
pub fn getup_env(play: bool) -> Result<EnvConfig> {
    let params = GetupTaskParams::default();
    let base = getup_base_env(&params);
    let overrides = getup_overrides(&params, play)?;
    Composer::apply(&base, &overrides).map_err(TaskError::from)
}
