//! Collision geometry configuration.
//!
//! Pattern-keyed contact properties applied to a robot's collision geoms.
//! The simulator consumes these when compiling the model; this layer only
//! declares them.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Contact properties for the collision geoms selected by name patterns.
///
/// Per-property overrides are ordered `(pattern, value)` pairs; the first
/// matching pattern wins, so specific geoms (feet) are listed before the
/// catch-all.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CollisionConfig {
    /// Patterns selecting the geoms this config applies to.
    pub geom_patterns: Vec<String>,

    /// Contact dimensionality per pattern (1 = frictionless normal,
    /// 3 = sliding friction).
    pub condim: Vec<(String, u8)>,

    /// Contact priority per pattern.
    pub priority: Vec<(String, i32)>,

    /// Sliding friction coefficient per pattern.
    pub friction: Vec<(String, f64)>,

    /// Solver impedance triple per pattern.
    pub solimp: Vec<(String, [f64; 3])>,

    /// Contact type bitmask.
    pub contype: u32,

    /// Contact affinity bitmask.
    pub conaffinity: u32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            geom_patterns: Vec::new(),
            condim: Vec::new(),
            priority: Vec::new(),
            friction: Vec::new(),
            solimp: Vec::new(),
            contype: 1,
            conaffinity: 0,
        }
    }
}

impl CollisionConfig {
    /// Create a config applying to the given geom patterns.
    #[must_use]
    pub fn new<I, S>(geom_patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            geom_patterns: geom_patterns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Add a condim override for a pattern.
    #[must_use]
    pub fn with_condim(mut self, pattern: impl Into<String>, condim: u8) -> Self {
        self.condim.push((pattern.into(), condim));
        self
    }

    /// Add a priority override for a pattern.
    #[must_use]
    pub fn with_priority(mut self, pattern: impl Into<String>, priority: i32) -> Self {
        self.priority.push((pattern.into(), priority));
        self
    }

    /// Add a friction override for a pattern.
    #[must_use]
    pub fn with_friction(mut self, pattern: impl Into<String>, friction: f64) -> Self {
        self.friction.push((pattern.into(), friction));
        self
    }

    /// Add a solver-impedance override for a pattern.
    #[must_use]
    pub fn with_solimp(mut self, pattern: impl Into<String>, solimp: [f64; 3]) -> Self {
        self.solimp.push((pattern.into(), solimp));
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_order_preserved() {
        let cfg = CollisionConfig::new([".*_collision"])
            .with_condim(r"^[FB][LR]_foot_collision$", 3)
            .with_condim(".*_collision", 1);

        assert_eq!(cfg.condim.len(), 2);
        // Specific pattern stays ahead of the catch-all.
        assert_eq!(cfg.condim[0].1, 3);
        assert_eq!(cfg.condim[1].1, 1);
    }

    #[test]
    fn test_default_masks() {
        let cfg = CollisionConfig::default();
        assert_eq!(cfg.contype, 1);
        assert_eq!(cfg.conaffinity, 0);
    }
}
