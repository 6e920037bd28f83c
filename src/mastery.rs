//! Per-mode proficiency tracking and the archive decision.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::types::ModeStat;

/// How the accuracy threshold is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyBound {
    /// Accuracy must exceed the threshold.
    Exclusive,
    /// Accuracy may equal the threshold.
    Inclusive,
}

impl Default for AccuracyBound {
    fn default() -> Self {
        Self::Exclusive
    }
}

/// Archive thresholds. A word archives for a mode once it has at least
/// `correct_threshold` correct answers and its accuracy clears
/// `accuracy_threshold`.
#[derive(Debug, Clone)]
pub struct MasteryConfig {
    pub correct_threshold: u32,
    pub accuracy_threshold: f64,
    pub accuracy_bound: AccuracyBound,
}

impl Default for MasteryConfig {
    fn default() -> Self {
        Self {
            correct_threshold: 5,
            accuracy_threshold: 0.7,
            accuracy_bound: AccuracyBound::default(),
        }
    }
}

/// Statistics after recording or amending an attempt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MasteryUpdate {
    pub stat: ModeStat,
    /// True only on the call that flipped `archived` from false to true.
    pub just_archived: bool,
}

/// Applies judged attempts to per-mode statistics.
///
/// Pure: callers persist the returned stat themselves. Archiving is a
/// one-way ratchet; no update ever clears the flag.
#[derive(Debug, Clone, Default)]
pub struct MasteryTracker {
    config: MasteryConfig,
}

impl MasteryTracker {
    pub fn new(config: MasteryConfig) -> Self {
        Self { config }
    }

    /// Record one judged attempt against the current stat.
    pub fn record_answer(&self, stat: &ModeStat, correct: bool) -> MasteryUpdate {
        let mut next = *stat;
        next.total += 1;
        if correct {
            next.correct += 1;
        }
        self.finish(next)
    }

    /// Flip the most recent attempt from wrong to correct without adding
    /// a new attempt, as when the user's answer was right after all.
    pub fn amend_to_correct(&self, stat: &ModeStat) -> Result<MasteryUpdate> {
        if stat.total == 0 {
            return Err(EngineError::NothingToAmend);
        }
        if stat.correct >= stat.total {
            return Err(EngineError::AmendAlreadyCorrect);
        }
        let mut next = *stat;
        next.correct += 1;
        Ok(self.finish(next))
    }

    fn finish(&self, mut next: ModeStat) -> MasteryUpdate {
        let just_archived = !next.archived && self.predicate_holds(&next);
        next.archived = next.archived || just_archived;
        MasteryUpdate {
            stat: next,
            just_archived,
        }
    }

    fn predicate_holds(&self, stat: &ModeStat) -> bool {
        if stat.correct < self.config.correct_threshold {
            return false;
        }
        match self.config.accuracy_bound {
            AccuracyBound::Exclusive => stat.accuracy() > self.config.accuracy_threshold,
            AccuracyBound::Inclusive => stat.accuracy() >= self.config.accuracy_threshold,
        }
    }
}
