//! Word capture and editing.
//!
//! The quiz engine only ever mutates stats; terms and definitions enter
//! and leave the pool through this workflow.

use tracing::{debug, warn};

use crate::error::{EngineError, Result};
use crate::host::{SpeechEngine, Translator};
use crate::store::{StoreError, WordPatch, WordStore};
use crate::types::{Language, ModeStat, NewWord, QuizMode, WordRecord};

/// Validate and store a new word with zeroed stats for `modes`.
///
/// Terms are unique within their language, compared case-insensitively.
pub fn add_word<S: WordStore>(
    store: &mut S,
    term: &str,
    definition: &str,
    language: Language,
    modes: &[QuizMode],
) -> Result<String> {
    let term = term.trim();
    let definition = definition.trim();
    if term.is_empty() {
        return Err(EngineError::EmptyTerm);
    }
    if definition.is_empty() {
        return Err(EngineError::EmptyDefinition);
    }
    if find_term(store, term, language).is_some() {
        return Err(EngineError::DuplicateTerm {
            term: term.to_string(),
            language,
        });
    }

    let stats = modes.iter().map(|&m| (m, ModeStat::default())).collect();
    let id = store.create(NewWord {
        term: term.to_string(),
        definition: definition.to_string(),
        language,
        stats,
    })?;
    debug!(%id, term, "word added");
    Ok(id)
}

/// Apply term and/or definition edits to an existing word, with the same
/// validation as [`add_word`].
pub fn update_word<S: WordStore>(
    store: &mut S,
    id: &str,
    term: Option<&str>,
    definition: Option<&str>,
) -> Result<()> {
    let record = match find_word(store, id) {
        Some(record) => record,
        None => return Err(StoreError::NotFound(id.to_string()).into()),
    };

    let mut patch = WordPatch::default();
    if let Some(term) = term {
        let term = term.trim();
        if term.is_empty() {
            return Err(EngineError::EmptyTerm);
        }
        let taken = find_term(store, term, record.language)
            .map(|other| other.id != id)
            .unwrap_or(false);
        if taken {
            return Err(EngineError::DuplicateTerm {
                term: term.to_string(),
                language: record.language,
            });
        }
        patch.term = Some(term.to_string());
    }
    if let Some(definition) = definition {
        let definition = definition.trim();
        if definition.is_empty() {
            return Err(EngineError::EmptyDefinition);
        }
        patch.definition = Some(definition.to_string());
    }

    store.update(id, patch)?;
    Ok(())
}

/// Ask the translation collaborator for a definition draft. Best effort:
/// on failure the caller falls back to manual entry.
pub fn suggest_definition<T: Translator>(
    translator: &T,
    term: &str,
    language: Language,
) -> Result<String> {
    let term = term.trim();
    if term.is_empty() {
        return Err(EngineError::EmptyTerm);
    }
    translator.translate(term, language).map_err(|e| {
        warn!(term, error = %e, "translation lookup failed");
        EngineError::TranslationUnavailable(e.to_string())
    })
}

/// Speak a word through the host's speech collaborator.
pub fn pronounce<S: SpeechEngine>(speech: &S, record: &WordRecord) {
    speech.speak(&record.term, record.language);
}

/// Case-insensitive term lookup within one language.
fn find_term<S: WordStore>(store: &S, term: &str, language: Language) -> Option<WordRecord> {
    let needle = term.to_lowercase();
    store
        .list(language)
        .into_iter()
        .find(|w| w.term.to_lowercase() == needle)
}

/// Locate a record regardless of language.
fn find_word<S: WordStore>(store: &S, id: &str) -> Option<WordRecord> {
    Language::ALL
        .iter()
        .flat_map(|&language| store.list(language))
        .find(|w| w.id == id)
}
