//! Achievement milestones derived from mastered-word counts.
//!
//! Hunter ranks below the base count come from a sparse named table;
//! from the base up the tiers form a fixed arithmetic ladder, capped by
//! three uniquely named top ranks. Display state only: the ladder is
//! stateless and never errors.

use serde::{Deserialize, Serialize};

use crate::types::{QuizMode, WordRecord};

/// A display tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub threshold: u32,
    pub label: String,
}

/// Named hunter ranks below the arithmetic ladder.
const NAMED_TIERS: [(u32, &str); 23] = [
    (1, "見習獵人"),
    (10, "新手獵人"),
    (30, "初階獵人"),
    (50, "中階獵人"),
    (80, "熟練獵人"),
    (100, "百字獵人"),
    (150, "資深獵人"),
    (200, "菁英獵人 I"),
    (250, "菁英獵人 II"),
    (300, "菁英獵人 III"),
    (350, "菁英獵人 IV"),
    (400, "王牌獵人 I"),
    (450, "王牌獵人 II"),
    (500, "王牌獵人 III"),
    (550, "王牌獵人 IV"),
    (600, "大師獵人 I"),
    (650, "大師獵人 II"),
    (700, "大師獵人 III"),
    (750, "大師獵人 IV"),
    (800, "宗師獵人 I"),
    (850, "宗師獵人 II"),
    (900, "宗師獵人 III"),
    (950, "宗師獵人 IV"),
];

/// Uniquely named ranks that override the arithmetic ladder.
const TOP_TIERS: [(u32, &str); 3] = [(3000, "獵場王者"), (5000, "獵場傳說"), (10000, "單字獵神")];

/// Maps a mastered-word count to its highest reached tier.
#[derive(Debug, Clone)]
pub struct AchievementLadder {
    /// First count at which tiers become arithmetic.
    pub base: u32,
    /// Tier width at and above `base`.
    pub step: u32,
}

impl Default for AchievementLadder {
    fn default() -> Self {
        Self {
            base: 1000,
            step: 200,
        }
    }
}

impl AchievementLadder {
    /// The highest tier whose threshold does not exceed `mastered`, or
    /// `None` below the first tier. Negative input counts as zero.
    pub fn milestone_for(&self, mastered: i64) -> Option<Milestone> {
        let mastered = u32::try_from(mastered.max(0)).unwrap_or(u32::MAX);
        if mastered == 0 {
            return None;
        }
        if let Some(&(threshold, label)) = TOP_TIERS.iter().rev().find(|(t, _)| *t <= mastered) {
            return Some(Milestone {
                threshold,
                label: label.to_string(),
            });
        }
        if mastered >= self.base {
            let step = self.step.max(1);
            let threshold = mastered / step * step;
            return Some(Milestone {
                threshold,
                label: format!("傳奇獵人 {}", threshold),
            });
        }
        NAMED_TIERS
            .iter()
            .rev()
            .find(|(t, _)| *t <= mastered)
            .map(|&(threshold, label)| Milestone {
                threshold,
                label: label.to_string(),
            })
    }

    /// The tier newly reached between two counts, if any. Callers use
    /// this to decide whether to surface a celebration.
    pub fn crossed(&self, before: i64, after: i64) -> Option<Milestone> {
        let new = self.milestone_for(after)?;
        match self.milestone_for(before) {
            Some(old) if old.threshold >= new.threshold => None,
            _ => Some(new),
        }
    }
}

/// Mastered and total word counts for one language pool and mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageProgress {
    pub mastered: usize,
    pub total: usize,
}

/// Count mastered words in a language pool for one mode.
pub fn progress(pool: &[WordRecord], mode: QuizMode) -> LanguageProgress {
    LanguageProgress {
        mastered: pool.iter().filter(|w| w.is_archived(mode)).count(),
        total: pool.len(),
    }
}
