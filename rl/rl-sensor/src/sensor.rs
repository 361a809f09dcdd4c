//! Contact sensor specification.
//!
//! A [`ContactSensorSpec`] pairs two [`ContactMatchSpec`]s and declares what
//! the sensor reports each step: a found flag per matched pair, an
//! aggregated net force, and optionally air-time tracking for gait rewards.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::SensorError;
use crate::matching::ContactMatchSpec;
use crate::Result;

/// A field a contact sensor can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ContactField {
    /// Whether any matching pair is in contact.
    Found,
    /// Net contact force.
    Force,
}

/// How per-pair contact data is aggregated into the reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ReduceMode {
    /// Report per-pair found flags, up to the reserved slot count.
    #[default]
    None,
    /// Sum all matching contact forces into a single net force.
    NetForce,
}

impl std::fmt::Display for ReduceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::NetForce => write!(f, "netforce"),
        }
    }
}

/// Declarative specification of one contact sensor.
///
/// Sensor names must be unique within a scene's sensor collection; that
/// invariant is enforced where sensors are attached, at composition time.
///
/// # Example
///
/// ```
/// use rl_sensor::{ContactField, ContactMatchSpec, ContactSensorSpec, MatchMode, ReduceMode};
///
/// let feet = ContactSensorSpec::new(
///     "feet_ground_contact",
///     ContactMatchSpec::new(MatchMode::Geom, ["FL_foot_collision"]).with_entity("robot"),
///     ContactMatchSpec::new(MatchMode::Body, ["terrain"]),
/// )
/// .with_fields([ContactField::Found, ContactField::Force])
/// .with_reduce(ReduceMode::NetForce)
/// .with_track_air_time(true);
///
/// assert!(feet.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContactSensorSpec {
    /// Sensor name, unique within the scene.
    pub name: String,

    /// Selection rule for the primary side (typically robot geoms).
    pub primary: ContactMatchSpec,

    /// Selection rule for the secondary side (typically the terrain).
    pub secondary: ContactMatchSpec,

    /// Fields the sensor reports.
    pub fields: Vec<ContactField>,

    /// Aggregation applied across matching pairs.
    pub reduce: ReduceMode,

    /// Number of reserved contact slots. Matches beyond this are dropped.
    pub num_slots: usize,

    /// Track time since the last contact transition, per slot.
    pub track_air_time: bool,
}

impl ContactSensorSpec {
    /// Create a sensor spec reporting only the found flag with one slot.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        primary: ContactMatchSpec,
        secondary: ContactMatchSpec,
    ) -> Self {
        Self {
            name: name.into(),
            primary,
            secondary,
            fields: vec![ContactField::Found],
            reduce: ReduceMode::None,
            num_slots: 1,
            track_air_time: false,
        }
    }

    /// Set the reported fields.
    #[must_use]
    pub fn with_fields<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = ContactField>,
    {
        self.fields = fields.into_iter().collect();
        self
    }

    /// Set the aggregation mode.
    #[must_use]
    pub fn with_reduce(mut self, reduce: ReduceMode) -> Self {
        self.reduce = reduce;
        self
    }

    /// Set the reserved slot count.
    #[must_use]
    pub fn with_num_slots(mut self, num_slots: usize) -> Self {
        self.num_slots = num_slots;
        self
    }

    /// Enable or disable air-time tracking.
    #[must_use]
    pub fn with_track_air_time(mut self, track: bool) -> Self {
        self.track_air_time = track;
        self
    }

    /// Check whether the sensor reports a given field.
    #[must_use]
    pub fn reports(&self, field: ContactField) -> bool {
        self.fields.contains(&field)
    }

    /// Validate the spec and compile both match rules.
    ///
    /// # Errors
    ///
    /// Returns [`SensorError::InvalidSpec`] for an empty name, no fields, or
    /// zero slots, and [`SensorError::InvalidPattern`] for patterns that do
    /// not compile.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(SensorError::invalid_spec("<unnamed>", "empty sensor name"));
        }
        if self.fields.is_empty() {
            return Err(SensorError::invalid_spec(&self.name, "no fields selected"));
        }
        if self.num_slots == 0 {
            return Err(SensorError::invalid_spec(
                &self.name,
                "num_slots must be > 0",
            ));
        }
        if self.reports(ContactField::Force) && self.reduce == ReduceMode::None {
            return Err(SensorError::invalid_spec(
                &self.name,
                "force field requires a reduction mode",
            ));
        }
        self.primary.compile()?;
        self.secondary.compile()?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::matching::MatchMode;

    fn terrain() -> ContactMatchSpec {
        ContactMatchSpec::new(MatchMode::Body, ["terrain"])
    }

    fn feet() -> ContactMatchSpec {
        ContactMatchSpec::new(MatchMode::Geom, ["[FB][LR]_foot_collision"]).with_entity("robot")
    }

    #[test]
    fn test_defaults() {
        let spec = ContactSensorSpec::new("feet_ground_contact", feet(), terrain());
        assert_eq!(spec.fields, vec![ContactField::Found]);
        assert_eq!(spec.reduce, ReduceMode::None);
        assert_eq!(spec.num_slots, 1);
        assert!(!spec.track_air_time);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_force_requires_reduce() {
        let spec = ContactSensorSpec::new("feet_ground_contact", feet(), terrain())
            .with_fields([ContactField::Found, ContactField::Force]);
        assert!(spec.validate().is_err());

        let spec = spec.with_reduce(ReduceMode::NetForce);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_zero_slots_rejected() {
        let spec = ContactSensorSpec::new("s", feet(), terrain()).with_num_slots(0);
        let err = spec.validate().unwrap_err();
        assert!(matches!(err, SensorError::InvalidSpec { .. }));
    }

    #[test]
    fn test_empty_name_rejected() {
        let spec = ContactSensorSpec::new("", feet(), terrain());
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_bad_pattern_rejected() {
        let spec = ContactSensorSpec::new(
            "s",
            ContactMatchSpec::new(MatchMode::Geom, ["[unclosed"]),
            terrain(),
        );
        let err = spec.validate().unwrap_err();
        assert!(matches!(err, SensorError::InvalidPattern { .. }));
    }
}
