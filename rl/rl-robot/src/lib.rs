//! Robot morphology and actuator configuration for RL task composition.
//!
//! This crate provides the physical description layer that task composition
//! derives configuration from:
//!
//! - [`RobotMorphology`] - Joints, actuator classes, initial pose, collision
//! - [`ActuatorClassConfig`] - One physical actuator group with PD gains
//! - [`ActionScaleMap`] / [`derive_action_scale`] - Policy-action multipliers
//!   derived from effort limit and stiffness
//! - [`InitialState`] - Default base pose and joint state
//! - [`CollisionConfig`] - Pattern-keyed contact properties
//!
//! # Design Philosophy
//!
//! These types are **pure data** plus derivation. They hold no simulator
//! handles and step no physics; the simulator loads the model asset and
//! consumes the declared names and gains. Derived values (the action scale)
//! are computed by pure functions of a morphology, never cached in module
//! state, so composing several tasks in one process cannot interfere.
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with **zero simulator dependencies**. It can be
//! used in:
//!
//! - Headless training-task composition
//! - Configuration tooling and validation
//! - Tests that never touch a physics engine
//!
//! # Example
//!
//! ```
//! use rl_robot::{derive_action_scale, ActuatorClassConfig, RobotMorphology};
//!
//! let robot = RobotMorphology::new("quadruped", "models/quadruped.xml")
//!     .with_joints(["FL_hip_joint", "FR_hip_joint"])
//!     .with_actuator_class(
//!         ActuatorClassConfig::new("legs", [".*_hip_joint"])
//!             .with_stiffness(10.0)
//!             .with_effort_limit(6.0),
//!     );
//!
//! robot.validate().unwrap();
//! let scale = derive_action_scale(&robot).unwrap();
//! assert_eq!(scale.scale_for_joint("FL_hip_joint").unwrap(), 0.15);
//! ```

#![doc(html_root_url = "https://docs.rs/rl-robot/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,  // Builders move self; const adds nothing
    clippy::missing_errors_doc,    // Error docs added where non-obvious
)]

mod action_scale;
mod actuator;
mod collision;
mod error;
mod morphology;
mod pattern;

pub use action_scale::{derive_action_scale, ActionScaleMap};
pub use actuator::ActuatorClassConfig;
pub use collision::CollisionConfig;
pub use error::MorphologyError;
pub use morphology::{InitialState, RobotMorphology};
pub use pattern::{compile_anchored, matches_anchored};

// Re-export the math type used in public fields.
pub use nalgebra::Vector3;

/// Result type for morphology operations.
pub type Result<T> = std::result::Result<T, MorphologyError>;
