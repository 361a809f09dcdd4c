//! Term variants for environment configuration.
//!
//! An environment configuration is a set of string-keyed term maps consumed
//! by the external managers each step: rewards, terminations, observations,
//! events, commands, and curricula. Each term is a tagged variant carrying
//! its parameters; referential integrity (sensor and entity references) is
//! validated when the configuration is composed, never at simulation time.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use rl_robot::ActionScaleMap;

use crate::curriculum::CurriculumStageSchedule;

/// Selects named parts of a scene entity for a term's computation.
///
/// Name lists are whole-name regex patterns, matched by the consuming
/// manager against the entity's declared bodies/geoms/sites/joints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySelector {
    /// Scene entity key the names are resolved against.
    pub entity: String,

    /// Body name patterns.
    pub body_names: Vec<String>,

    /// Collision geom name patterns.
    pub geom_names: Vec<String>,

    /// Site name patterns.
    pub site_names: Vec<String>,

    /// Joint name patterns.
    pub joint_names: Vec<String>,
}

impl EntitySelector {
    /// Select an entity with no name filters.
    #[must_use]
    pub fn entity(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            body_names: Vec::new(),
            geom_names: Vec::new(),
            site_names: Vec::new(),
            joint_names: Vec::new(),
        }
    }

    /// Set the body name patterns.
    #[must_use]
    pub fn with_bodies<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.body_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the geom name patterns.
    #[must_use]
    pub fn with_geoms<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.geom_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the site name patterns.
    #[must_use]
    pub fn with_sites<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.site_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the joint name patterns.
    #[must_use]
    pub fn with_joints<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.joint_names = names.into_iter().map(Into::into).collect();
        self
    }
}

/// Named parameters shared by manager terms.
///
/// A term's function reads the parameters it needs by key; unused entries
/// are ignored. The `sensor` reference is validated against the scene's
/// attached sensors at composition time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TermParams {
    /// Entity parts the term operates on.
    pub asset: Option<EntitySelector>,

    /// Contact sensor the term reads, by name.
    pub sensor: Option<String>,

    /// Named scalar parameters (e.g. `target_height`).
    pub scalars: HashMap<String, f64>,

    /// Named range parameters (e.g. randomization bounds).
    pub ranges: HashMap<String, (f64, f64)>,

    /// Named per-joint-pattern scalars (e.g. pose tracking stds).
    pub joint_scalars: HashMap<String, Vec<(String, f64)>>,
}

impl TermParams {
    /// Set the entity selector.
    #[must_use]
    pub fn with_asset(mut self, asset: EntitySelector) -> Self {
        self.asset = Some(asset);
        self
    }

    /// Set the sensor reference.
    #[must_use]
    pub fn with_sensor(mut self, sensor: impl Into<String>) -> Self {
        self.sensor = Some(sensor.into());
        self
    }

    /// Add a scalar parameter.
    #[must_use]
    pub fn with_scalar(mut self, key: impl Into<String>, value: f64) -> Self {
        self.scalars.insert(key.into(), value);
        self
    }

    /// Add a range parameter.
    #[must_use]
    pub fn with_range(mut self, key: impl Into<String>, min: f64, max: f64) -> Self {
        self.ranges.insert(key.into(), (min, max));
        self
    }

    /// Add a per-joint-pattern scalar parameter.
    #[must_use]
    pub fn with_joint_scalars<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        self.joint_scalars.insert(
            key.into(),
            values.into_iter().map(|(p, v)| (p.into(), v)).collect(),
        );
        self
    }
}

/// A weighted reward term.
///
/// # Example
///
/// ```
/// use rl_env::{RewardTerm, TermParams};
///
/// let illegal_contact = RewardTerm::new(0.5)
///     .with_params(TermParams::default().with_sensor("nonfoot_ground_touch"));
///
/// assert_eq!(illegal_contact.weight, 0.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardTerm {
    /// Weight applied to the term's raw value. Zero disables the term
    /// without removing it.
    pub weight: f64,

    /// Term parameters.
    pub params: TermParams,
}

impl RewardTerm {
    /// Create a reward term with the given weight and default params.
    #[must_use]
    pub fn new(weight: f64) -> Self {
        Self {
            weight,
            params: TermParams::default(),
        }
    }

    /// Set the term parameters.
    #[must_use]
    pub fn with_params(mut self, params: TermParams) -> Self {
        self.params = params;
        self
    }
}

/// A termination term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminationTerm {
    /// Whether this termination is a timeout (episode truncation) rather
    /// than a failure.
    pub time_out: bool,

    /// Term parameters.
    pub params: TermParams,
}

impl TerminationTerm {
    /// Create a failure termination with default params.
    #[must_use]
    pub fn new() -> Self {
        Self {
            time_out: false,
            params: TermParams::default(),
        }
    }

    /// Create a timeout termination.
    #[must_use]
    pub fn timeout() -> Self {
        Self {
            time_out: true,
            params: TermParams::default(),
        }
    }

    /// Set the term parameters.
    #[must_use]
    pub fn with_params(mut self, params: TermParams) -> Self {
        self.params = params;
        self
    }
}

impl Default for TerminationTerm {
    fn default() -> Self {
        Self::new()
    }
}

/// One observation term within a group.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObservationTerm {
    /// Uniform noise magnitude applied when the group's corruption is
    /// enabled. Zero means the term is never corrupted.
    pub noise_std: f64,

    /// Term parameters.
    pub params: TermParams,
}

impl ObservationTerm {
    /// Create a noiseless observation term.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the corruption noise magnitude.
    #[must_use]
    pub fn with_noise(mut self, noise_std: f64) -> Self {
        self.noise_std = noise_std;
        self
    }

    /// Set the term parameters.
    #[must_use]
    pub fn with_params(mut self, params: TermParams) -> Self {
        self.params = params;
        self
    }
}

/// A named group of observation terms (e.g. `actor`, `critic`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObservationGroup {
    /// Observation terms by name.
    pub terms: HashMap<String, ObservationTerm>,

    /// Whether per-term noise is applied. Disabled in play mode for
    /// deterministic evaluation.
    pub enable_corruption: bool,
}

impl ObservationGroup {
    /// Create an empty group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable corruption.
    #[must_use]
    pub fn with_corruption(mut self, enable: bool) -> Self {
        self.enable_corruption = enable;
        self
    }

    /// Add an observation term.
    #[must_use]
    pub fn with_term(mut self, name: impl Into<String>, term: ObservationTerm) -> Self {
        self.terms.insert(name.into(), term);
        self
    }
}

/// When an event term fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventMode {
    /// Once, before the first episode.
    Startup,
    /// At every environment reset.
    Reset,
    /// Periodically during episodes.
    Interval,
}

/// A randomization or reset event term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTerm {
    /// When the event fires.
    pub mode: EventMode,

    /// Term parameters.
    pub params: TermParams,
}

impl EventTerm {
    /// Create an event with the given mode and default params.
    #[must_use]
    pub fn new(mode: EventMode) -> Self {
        Self {
            mode,
            params: TermParams::default(),
        }
    }

    /// Set the term parameters.
    #[must_use]
    pub fn with_params(mut self, params: TermParams) -> Self {
        self.params = params;
        self
    }
}

/// Axes of a twist command's sampling ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TwistAxis {
    /// Forward linear velocity (m/s).
    LinVelX,
    /// Lateral linear velocity (m/s).
    LinVelY,
    /// Yaw angular velocity (rad/s).
    AngVelZ,
}

/// Sampling ranges for a twist command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TwistRanges {
    /// Forward linear velocity range (m/s).
    pub lin_vel_x: (f64, f64),
    /// Lateral linear velocity range (m/s).
    pub lin_vel_y: (f64, f64),
    /// Yaw angular velocity range (rad/s).
    pub ang_vel_z: (f64, f64),
}

impl TwistRanges {
    /// The range for an axis.
    #[must_use]
    pub const fn get(&self, axis: TwistAxis) -> (f64, f64) {
        match axis {
            TwistAxis::LinVelX => self.lin_vel_x,
            TwistAxis::LinVelY => self.lin_vel_y,
            TwistAxis::AngVelZ => self.ang_vel_z,
        }
    }

    /// Set the range for an axis.
    pub fn set(&mut self, axis: TwistAxis, min: f64, max: f64) {
        let range = match axis {
            TwistAxis::LinVelX => &mut self.lin_vel_x,
            TwistAxis::LinVelY => &mut self.lin_vel_y,
            TwistAxis::AngVelZ => &mut self.ang_vel_z,
        };
        *range = (min, max);
    }
}

/// A resampled base-velocity command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwistCommand {
    /// Sampling ranges per axis.
    pub ranges: TwistRanges,

    /// Seconds between command resamples.
    pub resampling_time_s: f64,

    /// Height offset of the command visualization arrow (m).
    pub viz_z_offset: f64,
}

/// A command term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CommandTerm {
    /// Base-velocity tracking command.
    Twist(TwistCommand),
}

/// How a policy action is scaled into a joint command delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActionScale {
    /// One scale for every joint.
    Uniform(f64),
    /// Per-pattern scales derived from actuator gains.
    PerJoint(ActionScaleMap),
}

/// An action term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActionTerm {
    /// Joint-position action: the policy output, scaled, offsets the
    /// default joint pose.
    JointPosition {
        /// Scene entity the action drives.
        entity: String,
        /// Patterns selecting the actuated joints.
        joint_patterns: Vec<String>,
        /// Normalized-action to command-delta scale.
        scale: ActionScale,
    },
}

impl ActionTerm {
    /// The scene entity the action drives.
    #[must_use]
    pub fn entity(&self) -> &str {
        match self {
            Self::JointPosition { entity, .. } => entity,
        }
    }
}

/// A curriculum term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CurriculumTerm {
    /// Anneal a named task parameter through staged ranges.
    Staged {
        /// The parameter the schedule anneals (e.g. `target_height`).
        parameter: String,
        /// The stage schedule.
        schedule: CurriculumStageSchedule,
    },
    /// Promote or demote terrain difficulty from tracking performance.
    TerrainLevels,
}
