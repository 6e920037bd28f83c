//! Error types for the engine.

use thiserror::Error;

use crate::store::StoreError;
use crate::types::Language;

/// Result type alias using EngineError.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by the engine.
///
/// An exhausted word pool is not represented here; round generation uses
/// [`crate::quiz::NoRound`] as a normal outcome.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("term must not be empty")]
    EmptyTerm,

    #[error("definition must not be empty")]
    EmptyDefinition,

    #[error("{term} is already in the {language} word list")]
    DuplicateTerm { term: String, language: Language },

    #[error("no round is awaiting an answer")]
    NoActiveRound,

    #[error("round already has an answer")]
    RoundLocked,

    #[error("answer kind does not fit the round's mode")]
    WrongAnswerKind,

    #[error("no attempt to amend")]
    NothingToAmend,

    #[error("last attempt was already correct")]
    AmendAlreadyCorrect,

    #[error("translation unavailable: {0}")]
    TranslationUnavailable(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
