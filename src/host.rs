//! Collaborator traits implemented by the host application.
//!
//! The engine performs no I/O of its own: audio output and machine
//! translation arrive through these seams. No implementations ship with
//! the crate.

use thiserror::Error;

use crate::types::Language;

/// Failure from the translation collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TranslateError(pub String);

/// Text-to-speech output. Fire and forget; the engine never consumes a
/// return value.
pub trait SpeechEngine {
    fn speak(&self, text: &str, language: Language);
}

/// Optional machine-translation help for definition entry. Best effort:
/// when it fails, the definition is supplied manually.
pub trait Translator {
    fn translate(&self, term: &str, language: Language) -> Result<String, TranslateError>;
}
