//! Staged curriculum schedules.
//!
//! A curriculum anneals a task parameter over training progress: an ordered
//! list of stages, each a step threshold and a parameter range. The active
//! stage for a step is the last stage whose threshold is at or below it,
//! so later steps never regress to an earlier, more permissive stage.

use serde::{Deserialize, Serialize};

use crate::error::ComposeError;
use crate::Result;

/// One curriculum stage: a step threshold and the parameter range active
/// from that step onward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurriculumStage {
    /// Training step (env steps) at which this stage activates.
    pub step: u64,
    /// Range minimum.
    pub min: f64,
    /// Range maximum.
    pub max: f64,
}

impl CurriculumStage {
    /// Create a stage.
    #[must_use]
    pub const fn new(step: u64, min: f64, max: f64) -> Self {
        Self { step, min, max }
    }

    /// The stage's parameter range.
    #[must_use]
    pub const fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

/// An ordered, validated sequence of curriculum stages.
///
/// # Example
///
/// ```
/// use rl_env::{CurriculumStage, CurriculumStageSchedule};
///
/// let schedule = CurriculumStageSchedule::new([
///     CurriculumStage::new(0, 0.21, 0.23),
///     CurriculumStage::new(24_000, 0.18, 0.26),
///     CurriculumStage::new(48_000, 0.16, 0.28),
/// ])
/// .unwrap();
///
/// assert_eq!(schedule.stage_for(23_999), (0.21, 0.23));
/// assert_eq!(schedule.stage_for(24_000), (0.18, 0.26));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumStageSchedule {
    stages: Vec<CurriculumStage>,
}

impl CurriculumStageSchedule {
    /// Create a schedule from stages.
    ///
    /// # Errors
    ///
    /// Returns a [`ComposeError`] when the stage list is empty, the first
    /// threshold is not zero (some step would have no defined stage),
    /// thresholds do not strictly increase, or a range is inverted.
    pub fn new<I>(stages: I) -> Result<Self>
    where
        I: IntoIterator<Item = CurriculumStage>,
    {
        let stages: Vec<CurriculumStage> = stages.into_iter().collect();
        let schedule = Self { stages };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Create a single-stage schedule pinning the parameter to a constant.
    ///
    /// Used in play mode, where annealing is bypassed for determinism.
    #[must_use]
    pub fn fixed(value: f64) -> Self {
        Self {
            stages: vec![CurriculumStage::new(0, value, value)],
        }
    }

    /// Re-check the schedule invariants.
    ///
    /// Construction already validates; this exists for configs that arrive
    /// through deserialization.
    ///
    /// # Errors
    ///
    /// Same conditions as [`new`](Self::new).
    pub fn validate(&self) -> Result<()> {
        let Some(first) = self.stages.first() else {
            return Err(ComposeError::EmptySchedule);
        };
        if first.step != 0 {
            return Err(ComposeError::ScheduleStartsLate { step: first.step });
        }
        for pair in self.stages.windows(2) {
            if pair[1].step <= pair[0].step {
                return Err(ComposeError::ScheduleNotMonotonic {
                    prev: pair[0].step,
                    next: pair[1].step,
                });
            }
        }
        for stage in &self.stages {
            if stage.min > stage.max || !stage.min.is_finite() || !stage.max.is_finite() {
                return Err(ComposeError::ScheduleInvertedRange {
                    step: stage.step,
                    min: stage.min,
                    max: stage.max,
                });
            }
        }
        Ok(())
    }

    /// The parameter range active at a training step.
    ///
    /// Evaluates to the last stage whose threshold is ≤ `step`. Stage 0
    /// starts at step 0, so every step has a defined stage.
    #[must_use]
    pub fn stage_for(&self, step: u64) -> (f64, f64) {
        let mut active = (0.0, 0.0);
        for stage in &self.stages {
            if stage.step > step {
                break;
            }
            active = stage.range();
        }
        active
    }

    /// Whether the schedule pins the parameter to a single constant value.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        self.stages.len() == 1 && self.stages[0].min == self.stages[0].max
    }

    /// The stages in order.
    #[must_use]
    pub fn stages(&self) -> &[CurriculumStage] {
        &self.stages
    }
}
