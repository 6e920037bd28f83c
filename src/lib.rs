//! Mastery and quiz engine for the VocabHunter vocabulary trainer.
//!
//! Provides:
//! - Answer matching for fill-in-blank rounds (multi-variant definitions,
//!   case/punctuation-insensitive)
//! - Per-mode mastery statistics with a one-way archive ratchet
//! - Quiz round generation (multiple choice with distractors, fill-in-blank)
//! - Achievement milestones derived from mastered-word counts
//! - A round-lifecycle state machine with a submission lock and
//!   cancellation-safe auto-advance
//!
//! The engine is a pure library: persistence, speech output, and machine
//! translation are collaborator traits implemented by the host
//! application.

pub mod achievements;
pub mod entry;
pub mod error;
pub mod host;
pub mod mastery;
pub mod matching;
pub mod quiz;
pub mod session;
pub mod store;
pub mod types;

pub use achievements::{progress, AchievementLadder, LanguageProgress, Milestone};
pub use entry::{add_word, pronounce, suggest_definition, update_word};
pub use error::{EngineError, Result};
pub use host::{SpeechEngine, TranslateError, Translator};
pub use mastery::{AccuracyBound, MasteryConfig, MasteryTracker, MasteryUpdate};
pub use matching::{matches, normalize, variants};
pub use quiz::{NoRound, QuizConfig, QuizGenerator};
pub use session::{
    AmendOutcome, Answer, AutoAdvance, QuizSession, RoundPhase, RoundResolution, SessionConfig,
    SessionEpoch, Verdict,
};
pub use store::{MemoryWordStore, StoreError, StoreEvent, WordPatch, WordStore};
pub use types::{Language, ModeStat, NewWord, QuizMode, Round, WordRecord};
