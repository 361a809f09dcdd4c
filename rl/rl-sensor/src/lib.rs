//! Contact-sensor selection and state tracking for RL task composition.
//!
//! This crate provides the contact-sensing layer tasks declare rewards and
//! terminations against:
//!
//! - [`ContactMatchSpec`] - Include/exclude pattern rule selecting geoms or
//!   bodies by name
//! - [`ContactSensorSpec`] - A pair of match rules plus field selection,
//!   aggregation mode, reserved slots, and air-time tracking
//! - [`ContactSensorState`] / [`ContactReading`] - Per-step aggregation and
//!   transition timing
//!
//! # Design Philosophy
//!
//! Sensors follow the MuJoCo contact-sensor model: the contact solver decides
//! which entity pairs touch, and a sensor declares *which* pairs it cares
//! about and *what* it reports. Selection is by whole-name-anchored regular
//! expression with exclusion taking precedence over inclusion, and exclusion
//! patterns run through the same regex engine as inclusions.
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
//! use rl_sensor::{ContactMatchSpec, ContactSensorSpec, MatchMode};
//!
//! // Detect non-foot geoms touching the terrain.
//! let nonfoot = ContactSensorSpec::new(
//!     "nonfoot_ground_touch",
//!     ContactMatchSpec::new(MatchMode::Geom, [r".*_collision\d*$"])
//!         .with_entity("robot")
//!         .with_exclude(["FL_foot_collision", "FR_foot_collision"]),
//!     ContactMatchSpec::new(MatchMode::Body, ["terrain"]),
//! );
//!
//! nonfoot.validate().unwrap();
//! let primary = nonfoot.primary.compile().unwrap();
//! assert!(primary.matches("body_collision"));
//! assert!(!primary.matches("FL_foot_collision"));
//! ```

#![doc(html_root_url = "https://docs.rs/rl-sensor/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,  // Builders move self; const adds nothing
    clippy::missing_errors_doc,    // Error docs added where non-obvious
)]

mod error;
mod matching;
mod sensor;
mod state;

pub use error::SensorError;
pub use matching::{CompiledMatch, ContactMatchSpec, MatchMode};
pub use sensor::{ContactField, ContactSensorSpec, ReduceMode};
pub use state::{ContactReading, ContactSensorState, SlotReading};

/// Result type for sensor operations.
pub type Result<T> = std::result::Result<T, SensorError>;
