//! Environment configuration records.
//!
//! [`EnvConfig`] is the composed, immutable configuration handed to the
//! external training loop: scene contents, simulation settings, viewer
//! framing, and the string-keyed term maps the managers consume each step.
//! [`EnvConfig::validate`] checks referential integrity once, at composition
//! time; a configuration that validates never fails at simulation time for
//! a dangling reference.

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use rl_robot::RobotMorphology;
use rl_sensor::ContactSensorSpec;

use crate::error::ComposeError;
use crate::term::{
    ActionTerm, CommandTerm, CurriculumTerm, EventTerm, ObservationGroup, RewardTerm, TermParams,
    TerminationTerm,
};
use crate::Result;

/// Terrain surface kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainType {
    /// Flat infinite plane.
    Plane,
    /// Procedurally generated height field.
    Generator,
}

/// Procedural terrain generator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainGeneratorConfig {
    /// Whether sub-terrains are ordered by difficulty for curriculum use.
    pub curriculum: bool,

    /// Sub-terrain grid rows.
    pub num_rows: usize,

    /// Sub-terrain grid columns.
    pub num_cols: usize,

    /// Flat border around the grid (m).
    pub border_width: f64,
}

impl Default for TerrainGeneratorConfig {
    fn default() -> Self {
        Self {
            curriculum: false,
            num_rows: 10,
            num_cols: 20,
            border_width: 20.0,
        }
    }
}

/// Terrain configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainConfig {
    /// Surface kind.
    pub terrain_type: TerrainType,

    /// Generator settings, present when `terrain_type` is
    /// [`TerrainType::Generator`].
    pub generator: Option<TerrainGeneratorConfig>,
}

impl TerrainConfig {
    /// A flat plane.
    #[must_use]
    pub fn plane() -> Self {
        Self {
            terrain_type: TerrainType::Plane,
            generator: None,
        }
    }

    /// A generated height field with default grid settings.
    #[must_use]
    pub fn generated() -> Self {
        Self {
            terrain_type: TerrainType::Generator,
            generator: Some(TerrainGeneratorConfig::default()),
        }
    }
}

/// Scene contents: entities, sensors, terrain, and replication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Robot entities by scene key.
    pub entities: HashMap<String, RobotMorphology>,

    /// Attached contact sensors. Names must be unique.
    pub sensors: Vec<ContactSensorSpec>,

    /// Terrain, if the scene has one.
    pub terrain: Option<TerrainConfig>,

    /// Number of parallel environment instances.
    pub num_envs: usize,

    /// Spacing between instances (m).
    pub env_spacing: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            entities: HashMap::new(),
            sensors: Vec::new(),
            terrain: None,
            num_envs: 4096,
            env_spacing: 2.5,
        }
    }
}

impl SceneConfig {
    /// Check whether a sensor with the given name is attached.
    #[must_use]
    pub fn has_sensor(&self, name: &str) -> bool {
        self.sensors.iter().any(|s| s.name == name)
    }
}

/// Simulation settings passed through to the physics collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Physics timestep (s).
    pub timestep: f64,

    /// Constraint arena size override; `None` uses the solver default.
    pub njmax: Option<usize>,

    /// Convex collision (CCD) solver iterations.
    pub ccd_iterations: usize,

    /// Cap on contact matches evaluated per sensor per step. Enforced by
    /// the contact solver, not by this layer.
    pub contact_sensor_maxmatch: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            timestep: 0.005,
            njmax: None,
            ccd_iterations: 50,
            contact_sensor_maxmatch: 64,
        }
    }
}

/// Viewer framing for interactive playback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Body the camera tracks; empty tracks the world origin.
    pub body_name: String,

    /// Camera distance (m).
    pub distance: f64,

    /// Camera elevation (deg).
    pub elevation: f64,

    /// Camera azimuth (deg).
    pub azimuth: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            body_name: String::new(),
            distance: 5.0,
            elevation: -20.0,
            azimuth: 90.0,
        }
    }
}

impl ViewerConfig {
    /// Track a body at the given distance and elevation.
    #[must_use]
    pub fn tracking(body_name: impl Into<String>, distance: f64, elevation: f64) -> Self {
        Self {
            body_name: body_name.into(),
            distance,
            elevation,
            ..Self::default()
        }
    }
}

/// A complete environment configuration.
///
/// Built once per task by the composer, validated, and then read-only for
/// the rest of the process. Structural equality compares every term map by
/// content, so two compositions from identical inputs compare equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvConfig {
    /// Scene contents.
    pub scene: SceneConfig,

    /// Simulation settings.
    pub sim: SimConfig,

    /// Viewer framing.
    pub viewer: ViewerConfig,

    /// Control decimation: physics steps per policy step.
    pub decimation: usize,

    /// Episode length before timeout (s).
    pub episode_length_s: f64,

    /// Action terms by name.
    pub actions: HashMap<String, ActionTerm>,

    /// Observation groups by name (e.g. `actor`, `critic`).
    pub observations: HashMap<String, ObservationGroup>,

    /// Reward terms by name.
    pub rewards: HashMap<String, RewardTerm>,

    /// Termination terms by name.
    pub terminations: HashMap<String, TerminationTerm>,

    /// Event terms by name.
    pub events: HashMap<String, EventTerm>,

    /// Command terms by name.
    pub commands: HashMap<String, CommandTerm>,

    /// Curriculum terms by name.
    pub curriculum: HashMap<String, CurriculumTerm>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            scene: SceneConfig::default(),
            sim: SimConfig::default(),
            viewer: ViewerConfig::default(),
            decimation: 4,
            episode_length_s: 20.0,
            actions: HashMap::new(),
            observations: HashMap::new(),
            rewards: HashMap::new(),
            terminations: HashMap::new(),
            events: HashMap::new(),
            commands: HashMap::new(),
            curriculum: HashMap::new(),
        }
    }
}

impl EnvConfig {
    /// Validate the configuration's referential integrity.
    ///
    /// Checks, in order: basic scalar sanity, sensor specs and name
    /// uniqueness, morphology validity, sensor and entity references from
    /// every term, action entity references, and curriculum schedules.
    ///
    /// # Errors
    ///
    /// Returns the first violation found as a [`ComposeError`].
    pub fn validate(&self) -> Result<()> {
        if self.sim.timestep <= 0.0 || !self.sim.timestep.is_finite() {
            return Err(ComposeError::invalid_config(format!(
                "timestep must be positive, got {}",
                self.sim.timestep
            )));
        }
        if self.decimation == 0 {
            return Err(ComposeError::invalid_config("decimation must be > 0"));
        }
        if self.episode_length_s <= 0.0 {
            return Err(ComposeError::invalid_config(
                "episode length must be positive",
            ));
        }
        if self.scene.num_envs == 0 {
            return Err(ComposeError::invalid_config("num_envs must be > 0"));
        }

        let mut sensor_names: HashSet<&str> = HashSet::new();
        for sensor in &self.scene.sensors {
            sensor.validate()?;
            if !sensor_names.insert(&sensor.name) {
                return Err(ComposeError::DuplicateSensor {
                    name: sensor.name.clone(),
                });
            }
        }

        for morphology in self.scene.entities.values() {
            morphology.validate()?;
        }

        for (name, term) in &self.rewards {
            self.check_params(name, &term.params, &sensor_names)?;
        }
        for (name, term) in &self.terminations {
            self.check_params(name, &term.params, &sensor_names)?;
        }
        for (name, term) in &self.events {
            self.check_params(name, &term.params, &sensor_names)?;
        }
        for (group_name, group) in &self.observations {
            for (name, term) in &group.terms {
                let qualified = format!("{group_name}/{name}");
                self.check_params(&qualified, &term.params, &sensor_names)?;
            }
        }

        for (name, action) in &self.actions {
            let entity = action.entity();
            if !self.scene.entities.contains_key(entity) {
                return Err(ComposeError::MissingEntity {
                    term: name.clone(),
                    entity: entity.to_string(),
                });
            }
        }

        for term in self.curriculum.values() {
            if let CurriculumTerm::Staged { schedule, .. } = term {
                schedule.validate()?;
            }
        }

        Ok(())
    }

    fn check_params(
        &self,
        term: &str,
        params: &TermParams,
        sensor_names: &HashSet<&str>,
    ) -> Result<()> {
        if let Some(sensor) = &params.sensor {
            if !sensor_names.contains(sensor.as_str()) {
                return Err(ComposeError::unresolved_sensor(term, sensor));
            }
        }
        if let Some(asset) = &params.asset {
            if !self.scene.entities.contains_key(&asset.entity) {
                return Err(ComposeError::MissingEntity {
                    term: term.to_string(),
                    entity: asset.entity.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::curriculum::{CurriculumStage, CurriculumStageSchedule};
    use crate::term::{ActionScale, EventMode};
    use rl_robot::ActuatorClassConfig;
    use rl_sensor::{ContactMatchSpec, MatchMode};

    fn robot() -> RobotMorphology {
        RobotMorphology::new("quadruped", "models/quadruped.xml")
            .with_joints(["FL_hip_joint"])
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

    fn valid_config() -> EnvConfig {
        let mut cfg = EnvConfig::default();
        cfg.scene.entities.insert("robot".to_string(), robot());
        cfg.scene.sensors.push(nonfoot_sensor());
        cfg.actions.insert(
            "joint_pos".to_string(),
            ActionTerm::JointPosition {
                entity: "robot".to_string(),
                joint_patterns: vec![".*".to_string()],
                scale: ActionScale::Uniform(0.1),
            },
        );
        cfg.rewards.insert(
            "illegal_contact".to_string(),
            RewardTerm::new(0.5)
                .with_params(TermParams::default().with_sensor("nonfoot_ground_touch")),
        );
        cfg
    }

    #[test]
    fn test_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_unresolved_sensor() {
        let mut cfg = valid_config();
        cfg.scene.sensors.clear();

        let err = cfg.validate().unwrap_err();
        assert!(matches!(
            err,
            ComposeError::UnresolvedSensor { ref sensor, .. } if sensor == "nonfoot_ground_touch"
        ));
    }

    #[test]
    fn test_duplicate_sensor_names() {
        let mut cfg = valid_config();
        cfg.scene.sensors.push(nonfoot_sensor());

        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, ComposeError::DuplicateSensor { .. }));
    }

    #[test]
    fn test_action_entity_missing() {
        let mut cfg = valid_config();
        cfg.scene.entities.clear();

        let err = cfg.validate().unwrap_err();
        assert!(matches!(
            err,
            ComposeError::MissingEntity { ref entity, .. } if entity == "robot"
        ));
    }

    #[test]
    fn test_event_asset_entity_checked() {
        let mut cfg = valid_config();
        cfg.events.insert(
            "foot_friction".to_string(),
            EventTerm::new(EventMode::Startup).with_params(
                TermParams::default()
                    .with_asset(crate::term::EntitySelector::entity("other_robot")),
            ),
        );

        let err = cfg.validate().unwrap_err();
        assert!(matches!(
            err,
            ComposeError::MissingEntity { ref entity, .. } if entity == "other_robot"
        ));
    }

    #[test]
    fn test_staged_schedule_validated() {
        let mut cfg = valid_config();
        let schedule =
            CurriculumStageSchedule::new([CurriculumStage::new(0, 0.21, 0.23)]).unwrap();
        cfg.curriculum.insert(
            "target_height".to_string(),
            CurriculumTerm::Staged {
                parameter: "target_height".to_string(),
                schedule,
            },
        );
        assert!(cfg.validate().is_ok());

        // A malformed schedule arriving through deserialization is caught.
        let late: CurriculumStageSchedule =
            serde_json::from_str(r#"{"stages":[{"step":100,"min":0.1,"max":0.2}]}"#).unwrap();
        cfg.curriculum.insert(
            "target_height".to_string(),
            CurriculumTerm::Staged {
                parameter: "target_height".to_string(),
                schedule: late,
            },
        );
        let err = cfg.validate().unwrap_err();
        assert!(err.is_schedule_error());
    }

    #[test]
    fn test_scalar_sanity() {
        let mut cfg = valid_config();
        cfg.decimation = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = valid_config();
        cfg.sim.timestep = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let cfg = valid_config();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: EnvConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
