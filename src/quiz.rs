//! Quiz round generation.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::{QuizMode, Round, WordRecord};

/// Why no round could be generated. A normal outcome, not an error:
/// callers present a "nothing to practice" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoRound {
    /// The language has no usable words.
    PoolEmpty,
    /// Multiple choice needs more words to draw distractors from.
    PoolTooSmall,
    /// Every word is already archived for this mode.
    AllMastered,
}

/// Round-generation limits.
#[derive(Debug, Clone)]
pub struct QuizConfig {
    /// Smallest language pool that can host a multiple-choice round.
    pub min_choice_pool: usize,
    /// Distractors drawn per multiple-choice round.
    pub distractor_count: usize,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            min_choice_pool: 3,
            distractor_count: 3,
        }
    }
}

/// Builds rounds from a language-scoped word pool.
#[derive(Debug, Clone, Default)]
pub struct QuizGenerator {
    config: QuizConfig,
}

impl QuizGenerator {
    pub fn new(config: QuizConfig) -> Self {
        Self { config }
    }

    /// Pick a target, and options for multiple choice, from `pool`.
    ///
    /// The target is chosen uniformly from the eligible (non-archived)
    /// words. Distractors come from the whole pool, archived words
    /// included. Records with blank text are treated as absent.
    pub fn next_round<R: Rng + ?Sized>(
        &self,
        pool: &[WordRecord],
        mode: QuizMode,
        rng: &mut R,
    ) -> Result<Round, NoRound> {
        let usable: Vec<&WordRecord> = pool.iter().filter(|w| w.has_usable_text()).collect();
        if usable.is_empty() {
            return Err(NoRound::PoolEmpty);
        }
        if mode == QuizMode::MultipleChoice && usable.len() < self.config.min_choice_pool {
            return Err(NoRound::PoolTooSmall);
        }

        let eligible: Vec<&WordRecord> = usable
            .iter()
            .copied()
            .filter(|w| !w.is_archived(mode))
            .collect();
        let target = match eligible.choose(rng) {
            Some(target) => *target,
            None => return Err(NoRound::AllMastered),
        };

        let options = match mode {
            QuizMode::FillInBlank => None,
            QuizMode::MultipleChoice => Some(self.choice_options(&usable, target, rng)),
        };

        Ok(Round {
            target: target.clone(),
            options,
        })
    }

    /// Distractor definitions plus the target's, in shuffled order. With
    /// a small pool the list degrades below `distractor_count + 1`
    /// entries rather than failing.
    fn choice_options<R: Rng + ?Sized>(
        &self,
        pool: &[&WordRecord],
        target: &WordRecord,
        rng: &mut R,
    ) -> Vec<String> {
        let others: Vec<&WordRecord> = pool
            .iter()
            .copied()
            .filter(|w| w.id != target.id)
            .collect();
        let mut options: Vec<String> = others
            .choose_multiple(rng, self.config.distractor_count)
            .map(|w| w.definition.clone())
            .collect();
        options.push(target.definition.clone());
        options.shuffle(rng);
        options
    }
}
