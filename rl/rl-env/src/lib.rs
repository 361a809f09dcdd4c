//! Environment-configuration model and override engine for RL tasks.
//!
//! This crate defines the configuration objects an RL training loop
//! consumes, and the engine that composes them:
//!
//! - [`EnvConfig`] - Scene, simulation, viewer, and term maps
//! - [`RewardTerm`] / [`TerminationTerm`] / [`ObservationGroup`] /
//!   [`EventTerm`] / [`CommandTerm`] / [`CurriculumTerm`] - Tagged term
//!   variants keyed by stable string identifiers
//! - [`CurriculumStageSchedule`] - Staged parameter annealing over training
//!   progress
//! - [`TaskOverride`] / [`Composer`] - An ordered, auditable patch list
//!   applied to a base configuration
//!
//! # Design Philosophy
//!
//! A task is data: a base configuration plus an ordered override list.
//! [`Composer::apply`] clones the base, applies the list once, and
//! validates referential integrity (sensor references, entity references,
//! curriculum shape), so no caller ever observes a partially composed or
//! inconsistent configuration. Terms reference sensors by name; attaching
//! the sensor must precede the reference, and a dangling name fails
//! composition rather than surfacing at simulation time.
//!
//! # Example
//!
//! ```
//! use rl_env::{Composer, EnvConfig, RewardTerm, TaskOverride, TermParams};
//! use rl_sensor::{ContactMatchSpec, ContactSensorSpec, MatchMode};
//!
//! let base = EnvConfig::default();
//! let overrides = [
//!     TaskOverride::AttachSensor(ContactSensorSpec::new(
//!         "nonfoot_ground_touch",
//!         ContactMatchSpec::new(MatchMode::Geom, [r".*_collision\d*$"]),
//!         ContactMatchSpec::new(MatchMode::Body, ["terrain"]),
//!     )),
//!     TaskOverride::InsertReward {
//!         name: "illegal_contact".to_string(),
//!         term: RewardTerm::new(0.5)
//!             .with_params(TermParams::default().with_sensor("nonfoot_ground_touch")),
//!     },
//! ];
//!
//! let cfg = Composer::apply(&base, &overrides).unwrap();
//! assert!(cfg.scene.has_sensor("nonfoot_ground_touch"));
//! ```

#![doc(html_root_url = "https://docs.rs/rl-env/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,  // Builders move self; const adds nothing
    clippy::missing_errors_doc,    // Error docs added where non-obvious
)]

mod compose;
mod config;
mod curriculum;
mod error;
mod term;

pub use compose::{Composer, ParamPatch, TaskOverride};
pub use config::{
    EnvConfig, SceneConfig, SimConfig, TerrainConfig, TerrainGeneratorConfig, TerrainType,
    ViewerConfig,
};
pub use curriculum::{CurriculumStage, CurriculumStageSchedule};
pub use error::ComposeError;
pub use term::{
    ActionScale, ActionTerm, CommandTerm, CurriculumTerm, EntitySelector, EventMode, EventTerm,
    ObservationGroup, ObservationTerm, RewardTerm, TermParams, TerminationTerm, TwistAxis,
    TwistCommand, TwistRanges,
};

/// Result type for composition operations.
pub type Result<T> = std::result::Result<T, ComposeError>;
