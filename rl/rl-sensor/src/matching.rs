//! Pattern-based entity selection for contact sensing.
//!
//! A [`ContactMatchSpec`] declares which simulation entities (geoms or
//! bodies) participate in one side of a contact sensor. Selection is by
//! whole-name regular expression with include/exclude semantics: a candidate
//! matches iff its name satisfies at least one inclusion pattern and no
//! exclusion pattern. Exclusion always takes precedence over inclusion, and
//! exclusions run through the same anchored regex engine as inclusions.

use regex::Regex;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::SensorError;
use crate::Result;

/// Which kind of simulation entity a match spec selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MatchMode {
    /// Match collision geoms by name.
    Geom,
    /// Match bodies by name.
    Body,
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Geom => write!(f, "geom"),
            Self::Body => write!(f, "body"),
        }
    }
}

/// Declarative rule selecting entities for one side of a contact sensor.
///
/// # Example
///
/// ```
/// use rl_sensor::{ContactMatchSpec, MatchMode};
///
/// // All collision geoms of the robot except the feet.
/// let spec = ContactMatchSpec::new(MatchMode::Geom, [r".*_collision\d*$"])
///     .with_entity("robot")
///     .with_exclude(["FL_foot_collision", "FR_foot_collision"]);
///
/// let compiled = spec.compile().unwrap();
/// assert!(compiled.matches("body_collision"));
/// assert!(!compiled.matches("FL_foot_collision"));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContactMatchSpec {
    /// Entity kind to select.
    pub mode: MatchMode,

    /// Owning entity the names are scoped to (e.g. the robot); `None` means
    /// scene-global names such as the terrain.
    pub entity: Option<String>,

    /// Inclusion patterns (whole-name regexes). At least one must match.
    pub patterns: Vec<String>,

    /// Exclusion patterns. Any match disqualifies the candidate.
    pub exclude: Vec<String>,
}

impl ContactMatchSpec {
    /// Create a match spec with the given mode and inclusion patterns.
    #[must_use]
    pub fn new<I, S>(mode: MatchMode, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode,
            entity: None,
            patterns: patterns.into_iter().map(Into::into).collect(),
            exclude: Vec::new(),
        }
    }

    /// Scope the selection to a named entity.
    #[must_use]
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Set the exclusion patterns.
    #[must_use]
    pub fn with_exclude<I, S>(mut self, exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = exclude.into_iter().map(Into::into).collect();
        self
    }

    /// Compile the spec's patterns into anchored regexes.
    ///
    /// # Errors
    ///
    /// Returns [`SensorError::InvalidPattern`] if any pattern fails to
    /// compile or the spec declares no inclusion patterns. Emptiness against
    /// concrete candidates is checked later, in [`CompiledMatch::select`].
    pub fn compile(&self) -> Result<CompiledMatch> {
        if self.patterns.is_empty() {
            return Err(SensorError::invalid_pattern(
                "",
                "match spec declares no inclusion patterns",
            ));
        }
        Ok(CompiledMatch {
            include: compile_all(&self.patterns)?,
            exclude: compile_all(&self.exclude)?,
            describe: format!(
                "{} matching {:?}{}",
                self.mode,
                self.patterns,
                self.entity
                    .as_deref()
                    .map(|e| format!(" on entity `{e}`"))
                    .unwrap_or_default()
            ),
        })
    }
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(&format!("^(?:{p})$"))
                .map_err(|e| SensorError::invalid_pattern(p, e.to_string()))
        })
        .collect()
}

/// A [`ContactMatchSpec`] with its patterns compiled.
#[derive(Debug, Clone)]
pub struct CompiledMatch {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
    describe: String,
}

impl CompiledMatch {
    /// Check whether an entity name satisfies the rule.
    ///
    /// True iff the name matches at least one inclusion pattern and no
    /// exclusion pattern.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        if !self.include.iter().any(|re| re.is_match(name)) {
            return false;
        }
        !self.exclude.iter().any(|re| re.is_match(name))
    }

    /// Select the matching names from a candidate list, preserving order.
    ///
    /// # Errors
    ///
    /// Returns [`SensorError::EmptySelection`] when nothing matched: an
    /// empty selection would produce an inert sensor and usually means an
    /// entity naming convention changed.
    pub fn select<'a, I>(&self, candidates: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let selected: Vec<String> = candidates
            .into_iter()
            .filter(|name| self.matches(name))
            .map(ToString::to_string)
            .collect();
        if selected.is_empty() {
            return Err(SensorError::empty_selection(self.describe.clone()));
        }
        Ok(selected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const FOOT_GEOMS: [&str; 4] = [
        "FL_foot_collision",
        "FR_foot_collision",
        "BL_foot_collision",
        "BR_foot_collision",
    ];

    fn nonfoot_spec() -> ContactMatchSpec {
        ContactMatchSpec::new(MatchMode::Geom, [r".*_collision\d*$"])
            .with_entity("robot")
            .with_exclude(FOOT_GEOMS)
    }

    #[test]
    fn test_exclusion_precedence() {
        let compiled = nonfoot_spec().compile().unwrap();

        // Excluded even though the inclusion pattern also matches.
        assert!(!compiled.matches("FL_foot_collision"));
        // Not excluded, included.
        assert!(compiled.matches("body_collision"));
        assert!(compiled.matches("FL_calf_collision2"));
    }

    #[test]
    fn test_anchored_inclusion() {
        let compiled = ContactMatchSpec::new(MatchMode::Body, ["terrain"])
            .compile()
            .unwrap();

        assert!(compiled.matches("terrain"));
        assert!(!compiled.matches("terrain_2"));
        assert!(!compiled.matches("sub_terrain"));
    }

    #[test]
    fn test_select_preserves_order() {
        let compiled = nonfoot_spec().compile().unwrap();
        let candidates = [
            "body_collision",
            "FL_foot_collision",
            "FL_calf_collision",
            "head",
        ];

        let selected = compiled.select(candidates).unwrap();
        assert_eq!(selected, vec!["body_collision", "FL_calf_collision"]);
    }

    #[test]
    fn test_select_empty_is_error() {
        let compiled = nonfoot_spec().compile().unwrap();
        let err = compiled.select(FOOT_GEOMS).unwrap_err();
        assert!(err.is_empty_selection());
    }

    #[test]
    fn test_no_inclusion_patterns() {
        let spec = ContactMatchSpec::new(MatchMode::Geom, Vec::<String>::new());
        assert!(spec.compile().is_err());
    }

    #[test]
    fn test_exclusion_is_pattern_based() {
        // Exclusions go through the same regex engine as inclusions.
        let compiled = ContactMatchSpec::new(MatchMode::Geom, [".*_collision"])
            .with_exclude([".*_foot_collision"])
            .compile()
            .unwrap();

        assert!(!compiled.matches("FL_foot_collision"));
        assert!(compiled.matches("body_collision"));
    }
}
