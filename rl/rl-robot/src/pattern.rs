//! Anchored joint-name pattern compilation.
//!
//! Patterns are regular expressions matched against whole entity names.
//! Anchoring prevents a pattern like `hip_joint` from accidentally matching
//! `FL_hip_joint_backup` or any other partial overlap.

use regex::Regex;

use crate::error::MorphologyError;

/// Compile a name pattern into a whole-name-anchored regular expression.
///
/// The pattern is wrapped in a non-capturing group and anchored with `^`/`$`,
/// so `.*_hip_joint` matches `FL_hip_joint` but `hip` does not.
///
/// # Errors
///
/// Returns [`MorphologyError::InvalidPattern`] if the pattern fails to
/// compile.
pub fn compile_anchored(pattern: &str) -> Result<Regex, MorphologyError> {
    Regex::new(&format!("^(?:{pattern})$"))
        .map_err(|e| MorphologyError::invalid_pattern(pattern, e.to_string()))
}

/// Check whether a name matches an anchored pattern.
///
/// Convenience for one-off checks; callers matching many names against the
/// same pattern should compile once with [`compile_anchored`].
///
/// # Errors
///
/// Returns [`MorphologyError::InvalidPattern`] if the pattern fails to
/// compile.
pub fn matches_anchored(pattern: &str, name: &str) -> Result<bool, MorphologyError> {
    Ok(compile_anchored(pattern)?.is_match(name))
}
