//! Round lifecycle for a practice session.
//!
//! One `QuizSession` drives the practice loop for a (language, mode)
//! pair: it generates rounds, holds the in-round submission lock, paces
//! automatic advancement, and keeps locally judged stats alive when a
//! persistence write fails. Hosts schedule the cooldown timer themselves
//! and call [`QuizSession::auto_advance`] when it fires; the epoch
//! captured at scheduling time makes late callbacks harmless.

use std::collections::BTreeMap;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::achievements::{progress, AchievementLadder, LanguageProgress, Milestone};
use crate::error::{EngineError, Result};
use crate::mastery::{MasteryConfig, MasteryTracker};
use crate::matching;
use crate::quiz::{NoRound, QuizConfig, QuizGenerator};
use crate::store::{StoreError, WordPatch, WordStore};
use crate::types::{Language, ModeStat, QuizMode, Round, WordRecord};

/// Where the session is in the round lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    /// No round on screen.
    Idle,
    /// A round is presented and unanswered.
    AwaitingAnswer,
    /// An answer is being judged and persisted.
    Resolving,
    /// Feedback is showing; the next round is pending.
    Cooldown,
}

/// Identifies one scheduling generation. A cooldown timer carries the
/// epoch it was scheduled under; the session ignores callbacks from any
/// earlier generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SessionEpoch(u64);

/// A user response to the active round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// An option picked in a multiple-choice round.
    Choice(String),
    /// Free text typed in a fill-in-blank round.
    Text(String),
}

/// How an answer was judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Wrong,
}

impl Verdict {
    pub fn is_correct(self) -> bool {
        matches!(self, Self::Correct)
    }
}

/// Session tuning knobs.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub quiz: QuizConfig,
    pub mastery: MasteryConfig,
    pub ladder: AchievementLadder,
    /// Pause before auto-advancing after an ordinary answer.
    pub feedback_pause: Duration,
    /// Longer pause when the answer archived the word.
    pub archive_pause: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            quiz: QuizConfig::default(),
            mastery: MasteryConfig::default(),
            ladder: AchievementLadder::default(),
            feedback_pause: Duration::from_millis(1000),
            archive_pause: Duration::from_millis(2000),
        }
    }
}

/// Everything the host needs to render feedback for a judged round.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RoundResolution {
    pub verdict: Verdict,
    pub term: String,
    /// Canonical definition, shown when the answer was wrong.
    pub definition: String,
    pub stat: ModeStat,
    pub just_archived: bool,
    /// Set when this answer pushed the mastered count over a new tier.
    pub milestone: Option<Milestone>,
    /// Pause the host should wait before calling `auto_advance`.
    pub cooldown: Duration,
    /// Persistence failure, if any. The stat above still stands for the
    /// session; the host decides whether to retry or toast.
    pub write_error: Option<StoreError>,
}

/// Result of flipping the last wrong answer to correct.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AmendOutcome {
    pub stat: ModeStat,
    pub just_archived: bool,
    pub milestone: Option<Milestone>,
    pub write_error: Option<StoreError>,
}

/// Outcome of a cooldown timer firing.
#[derive(Debug, Clone)]
pub enum AutoAdvance {
    /// A fresh round was generated.
    Started(Round),
    /// Nothing left to practice.
    Exhausted(NoRound),
    /// The timer belonged to a cancelled generation; nothing happened.
    Stale,
}

#[derive(Debug, Clone)]
struct LastAttempt {
    word_id: String,
    verdict: Verdict,
    stat: ModeStat,
}

/// One user's practice loop for a (language, mode) pair.
pub struct QuizSession {
    language: Language,
    mode: QuizMode,
    tracker: MasteryTracker,
    generator: QuizGenerator,
    ladder: AchievementLadder,
    feedback_pause: Duration,
    archive_pause: Duration,
    rng: StdRng,
    phase: RoundPhase,
    round: Option<Round>,
    epoch: SessionEpoch,
    /// Stats judged locally but not yet confirmed by the store.
    pending: BTreeMap<(String, QuizMode), ModeStat>,
    last_attempt: Option<LastAttempt>,
}

impl QuizSession {
    pub fn new(language: Language, mode: QuizMode, config: SessionConfig) -> Self {
        Self::with_rng(language, mode, config, StdRng::from_entropy())
    }

    /// Session with a caller-supplied generator, for deterministic tests.
    pub fn with_rng(language: Language, mode: QuizMode, config: SessionConfig, rng: StdRng) -> Self {
        Self {
            language,
            mode,
            tracker: MasteryTracker::new(config.mastery),
            generator: QuizGenerator::new(config.quiz),
            ladder: config.ladder,
            feedback_pause: config.feedback_pause,
            archive_pause: config.archive_pause,
            rng,
            phase: RoundPhase::Idle,
            round: None,
            epoch: SessionEpoch(0),
            pending: BTreeMap::new(),
            last_attempt: None,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// The value a host captures when scheduling the cooldown timer.
    pub fn epoch(&self) -> SessionEpoch {
        self.epoch
    }

    /// The round currently on screen, if any.
    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// Generate and present the next round, re-deriving eligibility from
    /// the store's current pool. Starts a new scheduling generation, so
    /// any timer from the previous round goes stale.
    pub fn next_round<S: WordStore>(&mut self, store: &S) -> std::result::Result<Round, NoRound> {
        self.bump_epoch();
        self.last_attempt = None;
        let pool = self.pool(store);
        match self.generator.next_round(&pool, self.mode, &mut self.rng) {
            Ok(round) => {
                debug!(term = %round.target.term, mode = self.mode.as_str(), "round started");
                self.round = Some(round.clone());
                self.phase = RoundPhase::AwaitingAnswer;
                Ok(round)
            }
            Err(reason) => {
                self.round = None;
                self.phase = RoundPhase::Idle;
                Err(reason)
            }
        }
    }

    /// Judge an answer for the active round.
    ///
    /// Accepted only while a round awaits its first answer; a second
    /// submission for the same round returns [`EngineError::RoundLocked`],
    /// so each round mutates stats exactly once. Stats are recomputed
    /// from the store's latest copy of the record, not the round-start
    /// snapshot, in case the record was edited while the round was open.
    pub fn submit<S: WordStore>(&mut self, store: &mut S, answer: &Answer) -> Result<RoundResolution> {
        match self.phase {
            RoundPhase::AwaitingAnswer => {}
            RoundPhase::Idle => return Err(EngineError::NoActiveRound),
            RoundPhase::Resolving | RoundPhase::Cooldown => return Err(EngineError::RoundLocked),
        }
        let round = match self.round.clone() {
            Some(round) => round,
            None => return Err(EngineError::NoActiveRound),
        };
        let verdict = judge(self.mode, &round, answer)?;
        self.phase = RoundPhase::Resolving;

        let pool = self.pool(store);
        let base = pool
            .iter()
            .find(|w| w.id == round.target.id)
            .map(|w| w.stat(self.mode))
            .unwrap_or_else(|| round.target.stat(self.mode));
        let update = self.tracker.record_answer(&base, verdict.is_correct());
        let mastered_before = progress(&pool, self.mode).mastered as i64;

        let write_error = self.write_stat(store, &round.target.id, update.stat);

        let milestone = if update.just_archived {
            self.ladder
                .crossed(mastered_before, mastered_before + 1)
        } else {
            None
        };
        let cooldown = if update.just_archived {
            self.archive_pause
        } else {
            self.feedback_pause
        };

        self.last_attempt = Some(LastAttempt {
            word_id: round.target.id.clone(),
            verdict,
            stat: update.stat,
        });
        self.phase = RoundPhase::Cooldown;
        debug!(
            term = %round.target.term,
            correct = verdict.is_correct(),
            archived = update.stat.archived,
            "round resolved"
        );

        Ok(RoundResolution {
            verdict,
            term: round.target.term,
            definition: round.target.definition,
            stat: update.stat,
            just_archived: update.just_archived,
            milestone,
            cooldown,
            write_error,
        })
    }

    /// Cooldown timer callback. `epoch` is the value captured when the
    /// timer was scheduled; a session that has since moved on ignores
    /// the call.
    pub fn auto_advance<S: WordStore>(&mut self, store: &S, epoch: SessionEpoch) -> AutoAdvance {
        if epoch != self.epoch || self.phase != RoundPhase::Cooldown {
            debug!("ignoring stale auto-advance");
            return AutoAdvance::Stale;
        }
        match self.next_round(store) {
            Ok(round) => AutoAdvance::Started(round),
            Err(reason) => AutoAdvance::Exhausted(reason),
        }
    }

    /// Flip the last judged answer from wrong to correct, as when the
    /// user's own variant was right after all. Available while the
    /// round's feedback is showing.
    pub fn amend_last_attempt<S: WordStore>(&mut self, store: &mut S) -> Result<AmendOutcome> {
        if self.phase != RoundPhase::Cooldown {
            return Err(EngineError::NothingToAmend);
        }
        let last = match self.last_attempt.clone() {
            Some(last) => last,
            None => return Err(EngineError::NothingToAmend),
        };
        if last.verdict == Verdict::Correct {
            return Err(EngineError::AmendAlreadyCorrect);
        }

        let pool = self.pool(store);
        let base = pool
            .iter()
            .find(|w| w.id == last.word_id)
            .map(|w| w.stat(self.mode))
            .unwrap_or(last.stat);
        let update = self.tracker.amend_to_correct(&base)?;
        let mastered_before = progress(&pool, self.mode).mastered as i64;

        let write_error = self.write_stat(store, &last.word_id, update.stat);

        let milestone = if update.just_archived {
            self.ladder
                .crossed(mastered_before, mastered_before + 1)
        } else {
            None
        };

        self.last_attempt = Some(LastAttempt {
            word_id: last.word_id,
            verdict: Verdict::Correct,
            stat: update.stat,
        });

        Ok(AmendOutcome {
            stat: update.stat,
            just_archived: update.just_archived,
            milestone,
            write_error,
        })
    }

    /// Drop the active round without judging it, as when the user leaves
    /// the quiz view. Pending timers go stale.
    pub fn abandon(&mut self) {
        self.bump_epoch();
        self.round = None;
        self.last_attempt = None;
        self.phase = RoundPhase::Idle;
    }

    /// Switch the practiced language, cancelling any round in flight.
    pub fn set_language(&mut self, language: Language) {
        if self.language != language {
            self.language = language;
            self.abandon();
        }
    }

    /// Switch the practice mode, cancelling any round in flight.
    pub fn set_mode(&mut self, mode: QuizMode) {
        if self.mode != mode {
            self.mode = mode;
            self.abandon();
        }
    }

    /// Mastered and total counts for the active language and mode,
    /// including any stats the store has not confirmed yet.
    pub fn progress<S: WordStore>(&mut self, store: &S) -> LanguageProgress {
        let pool = self.pool(store);
        progress(&pool, self.mode)
    }

    fn bump_epoch(&mut self) {
        self.epoch = SessionEpoch(self.epoch.0 + 1);
    }

    /// Current language pool with locally judged stats layered over the
    /// store's copies.
    fn pool<S: WordStore>(&mut self, store: &S) -> Vec<WordRecord> {
        let mut pool = store.list(self.language);
        self.reconcile(&mut pool);
        pool
    }

    /// Overlay pending stats and drop entries the store has caught up
    /// on. An entry for a deleted word is dropped outright.
    fn reconcile(&mut self, pool: &mut [WordRecord]) {
        if self.pending.is_empty() {
            return;
        }
        let pending = std::mem::take(&mut self.pending);
        for ((id, mode), local) in pending {
            let word = match pool.iter_mut().find(|w| w.id == id) {
                Some(word) => word,
                None => continue,
            };
            let merged = merge_stats(word.stat(mode), local);
            if merged == word.stat(mode) {
                continue;
            }
            word.stats.insert(mode, merged);
            self.pending.insert((id, mode), merged);
        }
    }

    /// Persist one stat, falling back to the local overlay on failure.
    fn write_stat<S: WordStore>(
        &mut self,
        store: &mut S,
        word_id: &str,
        stat: ModeStat,
    ) -> Option<StoreError> {
        match store.update(word_id, WordPatch::stat(self.mode, stat)) {
            Ok(()) => None,
            Err(error) => {
                warn!(word = word_id, %error, "stat write failed, keeping local copy");
                self.pending
                    .insert((word_id.to_string(), self.mode), stat);
                Some(error)
            }
        }
    }
}

/// Judge an answer against the round's target. Selected options are
/// compared verbatim; free text goes through the answer matcher.
fn judge(mode: QuizMode, round: &Round, answer: &Answer) -> Result<Verdict> {
    let correct = match (mode, answer) {
        (QuizMode::MultipleChoice, Answer::Choice(option)) => *option == round.target.definition,
        (QuizMode::FillInBlank, Answer::Text(text)) => {
            matching::matches(text, &round.target.definition)
        }
        _ => return Err(EngineError::WrongAnswerKind),
    };
    Ok(if correct {
        Verdict::Correct
    } else {
        Verdict::Wrong
    })
}

/// Local and stored copies of a stat can disagree after a failed write;
/// the copy with more attempts wins and the archive flag stays ratcheted.
fn merge_stats(stored: ModeStat, local: ModeStat) -> ModeStat {
    let mut merged = if stored.total >= local.total {
        stored
    } else {
        local
    };
    merged.archived = stored.archived || local.archived;
    merged
}
