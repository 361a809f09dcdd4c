//! Quadruped RL task definitions: stand-up recovery and velocity tracking.
//!
//! This crate turns the generic configuration machinery of the lower
//! layers into concrete, registered training tasks:
//!
//! - [`quadruped_morphology`] - The robot: twelve joints, one actuator
//!   class, foot contact geometry
//! - [`getup_env`] - Stand-up recovery task, train and play variants
//! - [`velocity_rough_env`] / [`velocity_flat_env`] - Velocity tracking on
//!   generated and flat terrain
//! - [`RunnerConfig`] / [`PpoConfig`] / [`PolicyConfig`] - PPO
//!   hyperparameter records consumed by the external training loop
//! - [`TaskRegistry`] / [`register_builtin_tasks`] - Id-keyed lookup of
//!   composed tasks
//!
//! # Design Philosophy
//!
//! Every task is a base template plus an ordered override list applied by
//! `rl_env::Composer`. Nothing here steps physics or trains networks; the
//! deliverable is validated, immutable configuration. Composition runs
//! once per process, synchronously, before the vectorized training loop
//! starts, and a configuration that composes cleanly cannot fail later on
//! a dangling sensor or entity reference.
//!
//! # Example
//!
//! ```
//! use rl_tasks::{register_builtin_tasks, TaskRegistry, VELOCITY_ROUGH_TASK_ID};
//!
//! let mut registry = TaskRegistry::new();
//! register_builtin_tasks(&mut registry).unwrap();
//!
//! let task = registry.get(VELOCITY_ROUGH_TASK_ID).unwrap();
//! assert!(task.env.scene.has_sensor("feet_ground_contact"));
//! assert_eq!(task.runner.num_steps_per_env, 24);
//! ```

#![doc(html_root_url = "https://docs.rs/rl-tasks/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,  // Builders move self; const adds nothing
    clippy::missing_errors_doc,    // Error docs added where non-obvious
)]

mod base;
mod error;
mod getup;
mod quadruped;
mod registry;
mod runner;
mod velocity;

pub use base::{getup_base_env, velocity_base_env, FEET_CONTACT_SENSOR, TERRAIN_SCAN_SENSOR};
pub use error::TaskError;
pub use getup::{getup_env, GetupTaskParams, NONFOOT_SENSOR};
pub use quadruped::{
    foot_geom_names, foot_site_names, joint_names, quadruped_morphology, ACTION_SCALE, ARMATURE,
    BODY_NAME, DAMPING, EFFORT_LIMIT, LEGS, LEG_PARTS, ROBOT_ENTITY, STIFFNESS,
};
pub use registry::{
    register_builtin_tasks, TaskEntry, TaskRegistry, GETUP_TASK_ID, VELOCITY_FLAT_TASK_ID,
    VELOCITY_ROUGH_TASK_ID,
};
pub use runner::{
    getup_runner_config, velocity_runner_config, Activation, LrSchedule, NoiseStdType, PolicyConfig,
    PpoConfig, RunnerConfig,
};
pub use velocity::{velocity_flat_env, velocity_rough_env};

/// Result type for task operations.
pub type Result<T> = std::result::Result<T, TaskError>;
