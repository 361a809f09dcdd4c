//! Ordered task overrides and the composer that applies them.
//!
//! A task describes itself as a base [`EnvConfig`] plus an ordered list of
//! [`TaskOverride`]s. [`Composer::apply`] clones the base, applies the list
//! once, and validates the result, so a caller never observes a partially
//! composed configuration. Order matters: a sensor must be attached before
//! any term that references it by name is inserted.
//!
//! Overrides are plain data, so a task's entire customization is auditable
//! and serializable, and re-applying the same list to the same base yields
//! a structurally identical configuration.

use serde::{Deserialize, Serialize};
use tracing::debug;

use rl_robot::{ActionScaleMap, RobotMorphology};
use rl_sensor::ContactSensorSpec;

use crate::config::{EnvConfig, TerrainType, ViewerConfig};
use crate::error::ComposeError;
use crate::term::{
    ActionScale, ActionTerm, CommandTerm, CurriculumTerm, EntitySelector, EventTerm, RewardTerm,
    TermParams, TerminationTerm, TwistAxis,
};
use crate::Result;

/// A patch to one term's parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamPatch {
    /// Replace the entity selector.
    Asset(EntitySelector),
    /// Replace the sensor reference.
    Sensor(String),
    /// Set a named scalar.
    Scalar {
        /// Parameter key.
        key: String,
        /// New value.
        value: f64,
    },
    /// Set a named range.
    Range {
        /// Parameter key.
        key: String,
        /// Range minimum.
        min: f64,
        /// Range maximum.
        max: f64,
    },
    /// Set a named per-joint-pattern scalar list.
    JointScalars {
        /// Parameter key.
        key: String,
        /// `(pattern, value)` entries.
        values: Vec<(String, f64)>,
    },
}

/// One named mutation of a base configuration.
///
/// Removals taking a `required` flag fail with
/// [`ComposeError::MissingTerm`] when the target is absent and `required`
/// is true; with `required` false an absent target is ignored, for terms a
/// base may or may not carry (e.g. a curriculum already cleared by an
/// earlier play-mode override).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TaskOverride {
    /// Insert or replace a robot entity in the scene.
    SetRobot {
        /// Scene entity key.
        entity: String,
        /// The robot description.
        morphology: RobotMorphology,
    },
    /// Attach a contact sensor. Attaching a name already present fails.
    AttachSensor(ContactSensorSpec),
    /// Detach a sensor by name.
    RemoveSensor {
        /// Sensor name.
        name: String,
        /// Fail if the sensor is absent.
        required: bool,
    },
    /// Switch the terrain to a flat plane, dropping any generator.
    SetTerrainPlane,
    /// Enable or disable the terrain generator's difficulty ordering.
    /// Ignored when the scene has no generated terrain.
    SetTerrainGeneratorCurriculum {
        /// New curriculum flag.
        enabled: bool,
    },
    /// Resize the terrain generator grid. Ignored when the scene has no
    /// generated terrain.
    SetTerrainGrid {
        /// Sub-terrain rows.
        num_rows: usize,
        /// Sub-terrain columns.
        num_cols: usize,
        /// Flat border width (m).
        border_width: f64,
    },
    /// Override the constraint arena size.
    SetNjmax {
        /// New arena size.
        njmax: usize,
    },
    /// Override the CCD solver iteration count.
    SetCcdIterations {
        /// New iteration count.
        iterations: usize,
    },
    /// Override the contact-sensor match cap.
    SetContactSensorMaxmatch {
        /// New match cap.
        maxmatch: usize,
    },
    /// Replace the viewer framing.
    SetViewer(ViewerConfig),
    /// Override the episode length.
    SetEpisodeLength {
        /// New length (s).
        seconds: f64,
    },
    /// Replace an action's scale with a derived per-joint map.
    SetActionScale {
        /// Action term name.
        action: String,
        /// The derived scale map.
        scale: ActionScaleMap,
    },
    /// Remove an observation term from a group.
    RemoveObservation {
        /// Group name.
        group: String,
        /// Term name.
        name: String,
        /// Fail if the term is absent.
        required: bool,
    },
    /// Patch an observation term's parameters.
    PatchObservation {
        /// Group name.
        group: String,
        /// Term name.
        name: String,
        /// The patch.
        patch: ParamPatch,
    },
    /// Enable or disable an observation group's corruption noise.
    SetObservationCorruption {
        /// Group name.
        group: String,
        /// New corruption flag.
        enabled: bool,
    },
    /// Insert or replace a reward term.
    InsertReward {
        /// Term name.
        name: String,
        /// The term.
        term: RewardTerm,
    },
    /// Override a reward term's weight.
    SetRewardWeight {
        /// Term name.
        name: String,
        /// New weight.
        weight: f64,
    },
    /// Patch a reward term's parameters.
    PatchReward {
        /// Term name.
        name: String,
        /// The patch.
        patch: ParamPatch,
    },
    /// Insert or replace a termination term.
    InsertTermination {
        /// Term name.
        name: String,
        /// The term.
        term: TerminationTerm,
    },
    /// Remove a termination term.
    RemoveTermination {
        /// Term name.
        name: String,
        /// Fail if the term is absent.
        required: bool,
    },
    /// Insert or replace an event term.
    InsertEvent {
        /// Term name.
        name: String,
        /// The term.
        term: EventTerm,
    },
    /// Remove an event term.
    RemoveEvent {
        /// Term name.
        name: String,
        /// Fail if the term is absent.
        required: bool,
    },
    /// Patch an event term's parameters.
    PatchEvent {
        /// Term name.
        name: String,
        /// The patch.
        patch: ParamPatch,
    },
    /// Override one axis range of a twist command.
    SetCommandRange {
        /// Command term name.
        name: String,
        /// The axis.
        axis: TwistAxis,
        /// Range minimum.
        min: f64,
        /// Range maximum.
        max: f64,
    },
    /// Override a twist command's visualization height offset.
    SetCommandVizOffset {
        /// Command term name.
        name: String,
        /// New offset (m).
        z_offset: f64,
    },
    /// Insert or replace a curriculum term.
    InsertCurriculum {
        /// Term name.
        name: String,
        /// The term.
        term: CurriculumTerm,
    },
    /// Remove a curriculum term.
    RemoveCurriculum {
        /// Term name.
        name: String,
        /// Fail if the term is absent.
        required: bool,
    },
    /// Remove every curriculum term.
    ClearCurriculum,
}

impl TaskOverride {
    /// Short operation name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetRobot { .. } => "set_robot",
            Self::AttachSensor(_) => "attach_sensor",
            Self::RemoveSensor { .. } => "remove_sensor",
            Self::SetTerrainPlane => "set_terrain_plane",
            Self::SetTerrainGeneratorCurriculum { .. } => "set_terrain_generator_curriculum",
            Self::SetTerrainGrid { .. } => "set_terrain_grid",
            Self::SetNjmax { .. } => "set_njmax",
            Self::SetCcdIterations { .. } => "set_ccd_iterations",
            Self::SetContactSensorMaxmatch { .. } => "set_contact_sensor_maxmatch",
            Self::SetViewer(_) => "set_viewer",
            Self::SetEpisodeLength { .. } => "set_episode_length",
            Self::SetActionScale { .. } => "set_action_scale",
            Self::RemoveObservation { .. } => "remove_observation",
            Self::PatchObservation { .. } => "patch_observation",
            Self::SetObservationCorruption { .. } => "set_observation_corruption",
            Self::InsertReward { .. } => "insert_reward",
            Self::SetRewardWeight { .. } => "set_reward_weight",
            Self::PatchReward { .. } => "patch_reward",
            Self::InsertTermination { .. } => "insert_termination",
            Self::RemoveTermination { .. } => "remove_termination",
            Self::InsertEvent { .. } => "insert_event",
            Self::RemoveEvent { .. } => "remove_event",
            Self::PatchEvent { .. } => "patch_event",
            Self::SetCommandRange { .. } => "set_command_range",
            Self::SetCommandVizOffset { .. } => "set_command_viz_offset",
            Self::InsertCurriculum { .. } => "insert_curriculum",
            Self::RemoveCurriculum { .. } => "remove_curriculum",
            Self::ClearCurriculum => "clear_curriculum",
        }
    }
}

/// Applies an ordered override list to a base configuration.
///
/// # Example
///
/// ```
/// use rl_env::{Composer, EnvConfig, TaskOverride};
///
/// let base = EnvConfig::default();
/// let overrides = [TaskOverride::SetEpisodeLength { seconds: 30.0 }];
///
/// let cfg = Composer::apply(&base, &overrides).unwrap();
/// assert_eq!(cfg.episode_length_s, 30.0);
/// // The base is untouched.
/// assert_eq!(base.episode_length_s, 20.0);
/// ```
pub struct Composer;

impl Composer {
    /// Compose a configuration from a base and an ordered override list.
    ///
    /// The base is cloned, every override is applied in order, and the
    /// result is validated as a whole. Sensor references are additionally
    /// checked eagerly when a referencing term is inserted, so an override
    /// list that inserts a term before attaching its sensor fails at that
    /// override rather than at the end.
    ///
    /// # Errors
    ///
    /// Returns the first [`ComposeError`] raised by an override or by final
    /// validation. On error no configuration is returned; composition is
    /// all-or-nothing.
    pub fn apply(base: &EnvConfig, overrides: &[TaskOverride]) -> Result<EnvConfig> {
        let mut cfg = base.clone();
        for op in overrides {
            apply_override(&mut cfg, op)?;
            debug!(op = op.name(), "applied task override");
        }
        cfg.validate()?;
        debug!(
            overrides = overrides.len(),
            sensors = cfg.scene.sensors.len(),
            rewards = cfg.rewards.len(),
            "composed environment configuration"
        );
        Ok(cfg)
    }
}

#[allow(clippy::too_many_lines)]
fn apply_override(cfg: &mut EnvConfig, op: &TaskOverride) -> Result<()> {
    match op {
        TaskOverride::SetRobot { entity, morphology } => {
            morphology.validate()?;
            cfg.scene
                .entities
                .insert(entity.clone(), morphology.clone());
        }
        TaskOverride::AttachSensor(spec) => {
            spec.validate()?;
            if cfg.scene.has_sensor(&spec.name) {
                return Err(ComposeError::DuplicateSensor {
                    name: spec.name.clone(),
                });
            }
            cfg.scene.sensors.push(spec.clone());
        }
        TaskOverride::RemoveSensor { name, required } => {
            let before = cfg.scene.sensors.len();
            cfg.scene.sensors.retain(|s| &s.name != name);
            if *required && cfg.scene.sensors.len() == before {
                return Err(ComposeError::missing_term("sensor", name));
            }
        }
        TaskOverride::SetTerrainPlane => {
            let terrain = cfg
                .scene
                .terrain
                .as_mut()
                .ok_or_else(|| ComposeError::invalid_config("scene has no terrain to flatten"))?;
            terrain.terrain_type = TerrainType::Plane;
            terrain.generator = None;
        }
        TaskOverride::SetTerrainGeneratorCurriculum { enabled } => {
            if let Some(generator) = cfg
                .scene
                .terrain
                .as_mut()
                .and_then(|t| t.generator.as_mut())
            {
                generator.curriculum = *enabled;
            }
        }
        TaskOverride::SetTerrainGrid {
            num_rows,
            num_cols,
            border_width,
        } => {
            if let Some(generator) = cfg
                .scene
                .terrain
                .as_mut()
                .and_then(|t| t.generator.as_mut())
            {
                generator.num_rows = *num_rows;
                generator.num_cols = *num_cols;
                generator.border_width = *border_width;
            }
        }
        TaskOverride::SetNjmax { njmax } => cfg.sim.njmax = Some(*njmax),
        TaskOverride::SetCcdIterations { iterations } => cfg.sim.ccd_iterations = *iterations,
        TaskOverride::SetContactSensorMaxmatch { maxmatch } => {
            cfg.sim.contact_sensor_maxmatch = *maxmatch;
        }
        TaskOverride::SetViewer(viewer) => cfg.viewer = viewer.clone(),
        TaskOverride::SetEpisodeLength { seconds } => cfg.episode_length_s = *seconds,
        TaskOverride::SetActionScale { action, scale } => {
            let term = cfg
                .actions
                .get_mut(action)
                .ok_or_else(|| ComposeError::missing_term("action", action))?;
            let ActionTerm::JointPosition { scale: slot, .. } = term;
            *slot = ActionScale::PerJoint(scale.clone());
        }
        TaskOverride::RemoveObservation {
            group,
            name,
            required,
        } => {
            let terms = &mut observation_group(cfg, group)?.terms;
            if terms.remove(name).is_none() && *required {
                return Err(ComposeError::missing_term("observation", name));
            }
        }
        TaskOverride::PatchObservation { group, name, patch } => {
            check_sensor_patch(&cfg.scene, &format!("{group}/{name}"), patch)?;
            let terms = &mut observation_group(cfg, group)?.terms;
            let term = terms
                .get_mut(name)
                .ok_or_else(|| ComposeError::missing_term("observation", name))?;
            apply_patch(&mut term.params, patch);
        }
        TaskOverride::SetObservationCorruption { group, enabled } => {
            observation_group(cfg, group)?.enable_corruption = *enabled;
        }
        TaskOverride::InsertReward { name, term } => {
            check_sensor_ref(&cfg.scene, name, &term.params)?;
            cfg.rewards.insert(name.clone(), term.clone());
        }
        TaskOverride::SetRewardWeight { name, weight } => {
            cfg.rewards
                .get_mut(name)
                .ok_or_else(|| ComposeError::missing_term("reward", name))?
                .weight = *weight;
        }
        TaskOverride::PatchReward { name, patch } => {
            check_sensor_patch(&cfg.scene, name, patch)?;
            let term = cfg
                .rewards
                .get_mut(name)
                .ok_or_else(|| ComposeError::missing_term("reward", name))?;
            apply_patch(&mut term.params, patch);
        }
        TaskOverride::InsertTermination { name, term } => {
            check_sensor_ref(&cfg.scene, name, &term.params)?;
            cfg.terminations.insert(name.clone(), term.clone());
        }
        TaskOverride::RemoveTermination { name, required } => {
            if cfg.terminations.remove(name).is_none() && *required {
                return Err(ComposeError::missing_term("termination", name));
            }
        }
        TaskOverride::InsertEvent { name, term } => {
            check_sensor_ref(&cfg.scene, name, &term.params)?;
            cfg.events.insert(name.clone(), term.clone());
        }
        TaskOverride::RemoveEvent { name, required } => {
            if cfg.events.remove(name).is_none() && *required {
                return Err(ComposeError::missing_term("event", name));
            }
        }
        TaskOverride::PatchEvent { name, patch } => {
            check_sensor_patch(&cfg.scene, name, patch)?;
            let term = cfg
                .events
                .get_mut(name)
                .ok_or_else(|| ComposeError::missing_term("event", name))?;
            apply_patch(&mut term.params, patch);
        }
        TaskOverride::SetCommandRange {
            name,
            axis,
            min,
            max,
        } => {
            let CommandTerm::Twist(cmd) = cfg
                .commands
                .get_mut(name)
                .ok_or_else(|| ComposeError::missing_term("command", name))?;
            cmd.ranges.set(*axis, *min, *max);
        }
        TaskOverride::SetCommandVizOffset { name, z_offset } => {
            let CommandTerm::Twist(cmd) = cfg
                .commands
                .get_mut(name)
                .ok_or_else(|| ComposeError::missing_term("command", name))?;
            cmd.viz_z_offset = *z_offset;
        }
        TaskOverride::InsertCurriculum { name, term } => {
            if let CurriculumTerm::Staged { schedule, .. } = term {
                schedule.validate()?;
            }
            cfg.curriculum.insert(name.clone(), term.clone());
        }
        TaskOverride::RemoveCurriculum { name, required } => {
            if cfg.curriculum.remove(name).is_none() && *required {
                return Err(ComposeError::missing_term("curriculum", name));
            }
        }
        TaskOverride::ClearCurriculum => cfg.curriculum.clear(),
    }
    Ok(())
}

fn observation_group<'a>(
    cfg: &'a mut EnvConfig,
    group: &str,
) -> Result<&'a mut crate::term::ObservationGroup> {
    cfg.observations
        .get_mut(group)
        .ok_or_else(|| ComposeError::missing_term("observation group", group))
}

fn check_sensor_ref(
    scene: &crate::config::SceneConfig,
    term: &str,
    params: &TermParams,
) -> Result<()> {
    if let Some(sensor) = &params.sensor {
        if !scene.has_sensor(sensor) {
            return Err(ComposeError::unresolved_sensor(term, sensor));
        }
    }
    Ok(())
}

fn check_sensor_patch(
    scene: &crate::config::SceneConfig,
    term: &str,
    patch: &ParamPatch,
) -> Result<()> {
    if let ParamPatch::Sensor(sensor) = patch {
        if !scene.has_sensor(sensor) {
            return Err(ComposeError::unresolved_sensor(term, sensor));
        }
    }
    Ok(())
}

fn apply_patch(params: &mut TermParams, patch: &ParamPatch) {
    match patch {
        ParamPatch::Asset(asset) => params.asset = Some(asset.clone()),
        ParamPatch::Sensor(sensor) => params.sensor = Some(sensor.clone()),
        ParamPatch::Scalar { key, value } => {
            params.scalars.insert(key.clone(), *value);
        }
        ParamPatch::Range { key, min, max } => {
            params.ranges.insert(key.clone(), (*min, *max));
        }
        ParamPatch::JointScalars { key, values } => {
            params.joint_scalars.insert(key.clone(), values.clone());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::config::TerrainConfig;
    use crate::term::{EventMode, ObservationGroup, ObservationTerm};
    use rl_robot::{derive_action_scale, ActuatorClassConfig};
    use rl_sensor::{ContactMatchSpec, MatchMode};

    fn robot() -> RobotMorphology {
        RobotMorphology::new("quadruped", "models/quadruped.xml")
            .with_joints(["FL_hip_joint", "FR_hip_joint"])
            .with_actuator_class(
                ActuatorClassConfig::new("legs", [".*_hip_joint"])
                    .with_stiffness(10.0)
                    .with_effort_limit(6.0),
            )
    }

    fn nonfoot_sensor() -> ContactSensorSpec {
        ContactSensorSpec::new(
            "nonfoot_ground_touch",
            ContactMatchSpec::new(MatchMode::Geom, [r".*_collision\d*$"]).with_entity("robot"),
            ContactMatchSpec::new(MatchMode::Body, ["terrain"]),
        )
    }

    fn base() -> EnvConfig {
        let mut cfg = EnvConfig::default();
        cfg.scene.terrain = Some(TerrainConfig::generated());
        cfg.actions.insert(
            "joint_pos".to_string(),
            ActionTerm::JointPosition {
                entity: "robot".to_string(),
                joint_patterns: vec![".*".to_string()],
                scale: ActionScale::Uniform(0.5),
            },
        );
        cfg.observations.insert(
            "actor".to_string(),
            ObservationGroup::new()
                .with_corruption(true)
                .with_term("joint_pos", ObservationTerm::new().with_noise(0.01))
                .with_term("base_lin_vel", ObservationTerm::new()),
        );
        cfg.rewards
            .insert("upright".to_string(), RewardTerm::new(0.5));
        cfg
    }

    fn overrides() -> Vec<TaskOverride> {
        vec![
            TaskOverride::SetRobot {
                entity: "robot".to_string(),
                morphology: robot(),
            },
            TaskOverride::AttachSensor(nonfoot_sensor()),
            TaskOverride::InsertReward {
                name: "illegal_contact".to_string(),
                term: RewardTerm::new(0.5)
                    .with_params(TermParams::default().with_sensor("nonfoot_ground_touch")),
            },
            TaskOverride::SetActionScale {
                action: "joint_pos".to_string(),
                scale: derive_action_scale(&robot()).unwrap(),
            },
            TaskOverride::RemoveObservation {
                group: "actor".to_string(),
                name: "base_lin_vel".to_string(),
                required: true,
            },
            TaskOverride::SetRewardWeight {
                name: "upright".to_string(),
                weight: 1.0,
            },
        ]
    }

    #[test]
    fn test_apply_full_list() {
        let cfg = Composer::apply(&base(), &overrides()).unwrap();

        assert!(cfg.scene.has_sensor("nonfoot_ground_touch"));
        assert!(cfg.rewards.contains_key("illegal_contact"));
        assert!(!cfg.observations["actor"].terms.contains_key("base_lin_vel"));
        assert_eq!(cfg.rewards["upright"].weight, 1.0);

        let ActionTerm::JointPosition { scale, .. } = &cfg.actions["joint_pos"];
        assert!(matches!(scale, ActionScale::PerJoint(map) if map.len() == 1));
    }

    #[test]
    fn test_idempotent_composition() {
        let first = Composer::apply(&base(), &overrides()).unwrap();
        let second = Composer::apply(&base(), &overrides()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_base_untouched() {
        let before = base();
        let _ = Composer::apply(&before, &overrides()).unwrap();
        assert_eq!(before, base());
    }

    #[test]
    fn test_sensor_must_precede_referencing_term() {
        // Same overrides with the reward inserted before its sensor.
        let bad = vec![
            TaskOverride::SetRobot {
                entity: "robot".to_string(),
                morphology: robot(),
            },
            TaskOverride::InsertReward {
                name: "illegal_contact".to_string(),
                term: RewardTerm::new(0.5)
                    .with_params(TermParams::default().with_sensor("nonfoot_ground_touch")),
            },
            TaskOverride::AttachSensor(nonfoot_sensor()),
        ];

        let err = Composer::apply(&base(), &bad).unwrap_err();
        assert!(matches!(
            err,
            ComposeError::UnresolvedSensor { ref sensor, .. } if sensor == "nonfoot_ground_touch"
        ));
    }

    #[test]
    fn test_duplicate_attach_fails() {
        let ops = vec![
            TaskOverride::SetRobot {
                entity: "robot".to_string(),
                morphology: robot(),
            },
            TaskOverride::AttachSensor(nonfoot_sensor()),
            TaskOverride::AttachSensor(nonfoot_sensor()),
        ];

        let err = Composer::apply(&base(), &ops).unwrap_err();
        assert!(matches!(err, ComposeError::DuplicateSensor { .. }));
    }

    #[test]
    fn test_required_removal_of_missing_term() {
        let ops = vec![TaskOverride::RemoveSensor {
            name: "terrain_scan".to_string(),
            required: true,
        }];
        let err = Composer::apply(&base(), &ops).unwrap_err();
        assert!(matches!(err, ComposeError::MissingTerm { kind: "sensor", .. }));

        // Tolerant removal of the same missing term succeeds.
        let mut cfg = base();
        cfg.scene
            .entities
            .insert("robot".to_string(), robot());
        let ops = vec![TaskOverride::RemoveEvent {
            name: "push_robot".to_string(),
            required: false,
        }];
        assert!(Composer::apply(&cfg, &ops).is_ok());
    }

    #[test]
    fn test_unknown_action_fails() {
        let ops = vec![TaskOverride::SetActionScale {
            action: "arm_pos".to_string(),
            scale: ActionScaleMap::default(),
        }];
        let err = Composer::apply(&base(), &ops).unwrap_err();
        assert!(matches!(err, ComposeError::MissingTerm { kind: "action", .. }));
    }

    #[test]
    fn test_terrain_overrides() {
        let mut ops = overrides();
        ops.push(TaskOverride::SetTerrainGeneratorCurriculum { enabled: true });
        ops.push(TaskOverride::SetTerrainGrid {
            num_rows: 5,
            num_cols: 5,
            border_width: 10.0,
        });
        let cfg = Composer::apply(&base(), &ops).unwrap();
        let generator = cfg.scene.terrain.unwrap().generator.unwrap();
        assert!(generator.curriculum);
        assert_eq!((generator.num_rows, generator.num_cols), (5, 5));

        // Flattening drops the generator.
        let mut ops = overrides();
        ops.push(TaskOverride::SetTerrainPlane);
        let cfg = Composer::apply(&base(), &ops).unwrap();
        let terrain = cfg.scene.terrain.unwrap();
        assert_eq!(terrain.terrain_type, TerrainType::Plane);
        assert!(terrain.generator.is_none());
    }

    #[test]
    fn test_patch_event_scalars() {
        let mut cfg = base();
        cfg.scene.entities.insert("robot".to_string(), robot());
        cfg.events.insert(
            "randomize_target_height".to_string(),
            EventTerm::new(EventMode::Reset).with_params(
                TermParams::default()
                    .with_scalar("min_height", 0.16)
                    .with_scalar("max_height", 0.30),
            ),
        );

        let ops = vec![
            TaskOverride::PatchEvent {
                name: "randomize_target_height".to_string(),
                patch: ParamPatch::Scalar {
                    key: "max_height".to_string(),
                    value: 0.16,
                },
            },
        ];
        let composed = Composer::apply(&cfg, &ops).unwrap();
        let params = &composed.events["randomize_target_height"].params;
        assert_eq!(params.scalars["min_height"], 0.16);
        assert_eq!(params.scalars["max_height"], 0.16);
    }

    #[test]
    fn test_clear_curriculum() {
        let mut cfg = base();
        cfg.scene.entities.insert("robot".to_string(), robot());
        cfg.curriculum
            .insert("terrain_levels".to_string(), CurriculumTerm::TerrainLevels);

        let composed = Composer::apply(&cfg, &[TaskOverride::ClearCurriculum]).unwrap();
        assert!(composed.curriculum.is_empty());
    }

    #[test]
    fn test_final_validation_catches_dangling_reference() {
        // Removing a sensor but keeping the term that references it is
        // caught by the final whole-config validation.
        let mut ops = overrides();
        ops.push(TaskOverride::RemoveSensor {
            name: "nonfoot_ground_touch".to_string(),
            required: true,
        });

        let err = Composer::apply(&base(), &ops).unwrap_err();
        assert!(matches!(err, ComposeError::UnresolvedSensor { .. }));
    }
}
