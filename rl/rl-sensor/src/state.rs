//! Runtime contact-sensor state.
//!
//! [`ContactSensorState`] turns the per-step list of matching contact pairs
//! into a [`ContactReading`] and maintains per-slot transition timing for
//! air-time rewards. The external contact solver decides *which* pairs are
//! in contact; this type only aggregates and times them.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sensor::{ContactField, ContactSensorSpec, ReduceMode};

/// Timing state for one reserved contact slot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct SlotState {
    in_contact: bool,
    /// Simulated seconds since the slot last changed contact state.
    time_since_transition: f64,
}

/// Reading for one reserved contact slot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SlotReading {
    /// Whether this slot is in contact.
    pub found: bool,
    /// Seconds out of contact since the last touchdown-to-liftoff
    /// transition; zero while in contact.
    pub air_time: f64,
    /// Seconds in contact since the last liftoff-to-touchdown transition;
    /// zero while airborne.
    pub contact_time: f64,
}

/// Aggregated reading produced once per simulation step.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContactReading {
    /// Whether any (primary, secondary) pair is in contact.
    pub found: bool,
    /// Number of matching pairs this step (before slot truncation).
    pub contact_count: usize,
    /// Net contact force, present when the spec reports force.
    pub net_force: Option<Vector3<f64>>,
    /// Per-slot readings, length equal to the spec's `num_slots`.
    pub slots: Vec<SlotReading>,
}

/// Per-sensor runtime state.
///
/// # Example
///
/// ```
/// use nalgebra::Vector3;
/// use rl_sensor::{ContactMatchSpec, ContactSensorSpec, ContactSensorState, MatchMode};
///
/// let spec = ContactSensorSpec::new(
///     "feet_ground_contact",
///     ContactMatchSpec::new(MatchMode::Geom, ["FL_foot_collision"]),
///     ContactMatchSpec::new(MatchMode::Body, ["terrain"]),
/// )
/// .with_track_air_time(true);
///
/// let mut state = ContactSensorState::new(&spec);
///
/// // Airborne for two steps, then touchdown.
/// state.update(0.02, &[]);
/// let airborne = state.update(0.02, &[]);
/// assert!(!airborne.found);
/// assert!(airborne.slots[0].air_time > 0.0);
///
/// let down = state.update(0.02, &[Vector3::new(0.0, 0.0, 12.0)]);
/// assert!(down.found);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContactSensorState {
    reduce: ReduceMode,
    report_force: bool,
    track_air_time: bool,
    slots: Vec<SlotState>,
}

impl ContactSensorState {
    /// Create zeroed state for a sensor spec.
    #[must_use]
    pub fn new(spec: &ContactSensorSpec) -> Self {
        Self {
            reduce: spec.reduce,
            report_force: spec.reports(ContactField::Force),
            track_air_time: spec.track_air_time,
            slots: vec![SlotState::default(); spec.num_slots],
        }
    }

    /// Reset all slots to no-contact with zero elapsed time.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            *slot = SlotState::default();
        }
    }

    /// Advance the state by one step and produce a reading.
    ///
    /// `pair_forces` holds one net force per (primary, secondary) pair the
    /// solver reports in contact this step. Pairs beyond the reserved slot
    /// count contribute to `contact_count` and the net force but are dropped
    /// from per-slot tracking rather than crashing.
    ///
    /// Air time is zero at the first step after construction or
    /// [`reset`](Self::reset), and zero at the step a transition is
    /// observed; the reading reflects time elapsed *before* this step's
    /// `dt` is accumulated.
    pub fn update(&mut self, dt: f64, pair_forces: &[Vector3<f64>]) -> ContactReading {
        let contact_count = pair_forces.len();
        let mut slots = Vec::with_capacity(self.slots.len());

        for (i, slot) in self.slots.iter_mut().enumerate() {
            let now_in_contact = i < contact_count;
            if now_in_contact != slot.in_contact {
                slot.in_contact = now_in_contact;
                slot.time_since_transition = 0.0;
            }
            slots.push(SlotReading {
                found: slot.in_contact,
                air_time: if self.track_air_time && !slot.in_contact {
                    slot.time_since_transition
                } else {
                    0.0
                },
                contact_time: if self.track_air_time && slot.in_contact {
                    slot.time_since_transition
                } else {
                    0.0
                },
            });
            slot.time_since_transition += dt;
        }

        let net_force = if self.report_force && self.reduce == ReduceMode::NetForce {
            Some(pair_forces.iter().sum())
        } else {
            None
        };

        ContactReading {
            found: contact_count > 0,
            contact_count,
            net_force,
            slots,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::matching::{ContactMatchSpec, MatchMode};
    use approx::assert_relative_eq;

    fn spec(track_air_time: bool) -> ContactSensorSpec {
        ContactSensorSpec::new(
            "feet_ground_contact",
            ContactMatchSpec::new(MatchMode::Geom, ["[FB][LR]_foot_collision"]),
            ContactMatchSpec::new(MatchMode::Body, ["terrain"]),
        )
        .with_fields([ContactField::Found, ContactField::Force])
        .with_reduce(ReduceMode::NetForce)
        .with_track_air_time(track_air_time)
    }

    #[test]
    fn test_zero_air_time_at_first_step() {
        let mut state = ContactSensorState::new(&spec(true));
        let first = state.update(0.02, &[]);

        assert!(!first.found);
        assert_relative_eq!(first.slots[0].air_time, 0.0);

        let second = state.update(0.02, &[]);
        assert_relative_eq!(second.slots[0].air_time, 0.02);

        state.reset();
        let after_reset = state.update(0.02, &[]);
        assert_relative_eq!(after_reset.slots[0].air_time, 0.0);
    }

    #[test]
    fn test_air_time_resets_on_touchdown() {
        let mut state = ContactSensorState::new(&spec(true));

        state.update(0.02, &[]);
        state.update(0.02, &[]);
        let down = state.update(0.02, &[Vector3::new(0.0, 0.0, 10.0)]);
        assert!(down.found);
        assert_relative_eq!(down.slots[0].air_time, 0.0);
        assert_relative_eq!(down.slots[0].contact_time, 0.0);

        let still_down = state.update(0.02, &[Vector3::new(0.0, 0.0, 10.0)]);
        assert_relative_eq!(still_down.slots[0].contact_time, 0.02);

        let up = state.update(0.02, &[]);
        assert_relative_eq!(up.slots[0].air_time, 0.0);
        let later = state.update(0.02, &[]);
        assert_relative_eq!(later.slots[0].air_time, 0.02);
    }

    #[test]
    fn test_net_force_reduction() {
        let mut state = ContactSensorState::new(&spec(false));
        let reading = state.update(
            0.02,
            &[Vector3::new(1.0, 0.0, 5.0), Vector3::new(-1.0, 0.0, 7.0)],
        );

        assert!(reading.found);
        assert_eq!(reading.contact_count, 2);
        let force = reading.net_force.unwrap();
        assert_relative_eq!(force.x, 0.0);
        assert_relative_eq!(force.z, 12.0);
    }

    #[test]
    fn test_no_force_without_field() {
        let base = ContactSensorSpec::new(
            "touch",
            ContactMatchSpec::new(MatchMode::Geom, [".*"]),
            ContactMatchSpec::new(MatchMode::Body, ["terrain"]),
        );
        let mut state = ContactSensorState::new(&base);
        let reading = state.update(0.02, &[Vector3::new(0.0, 0.0, 3.0)]);

        assert!(reading.found);
        assert!(reading.net_force.is_none());
    }

    #[test]
    fn test_slot_overflow_is_dropped() {
        let mut state = ContactSensorState::new(&spec(false));

        // Three pairs against one reserved slot: count and force keep all,
        // slot tracking keeps the first.
        let forces = [
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, 0.0, 2.0),
            Vector3::new(0.0, 0.0, 3.0),
        ];
        let reading = state.update(0.02, &forces);

        assert_eq!(reading.contact_count, 3);
        assert_eq!(reading.slots.len(), 1);
        assert!(reading.slots[0].found);
        assert_relative_eq!(reading.net_force.unwrap().z, 6.0);
    }
}
