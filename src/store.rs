//! Word persistence seam and the in-memory reference store.

use std::sync::mpsc::{channel, Receiver, Sender};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::types::{Language, ModeStat, NewWord, QuizMode, WordRecord};

/// Errors from the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreError {
    #[error("word {0} not found")]
    NotFound(String),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Change notification. The engine treats every event the same way:
/// the pool changed, re-derive eligibility at the next round boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreEvent {
    Created(String),
    Updated(String),
    Deleted(String),
}

/// Partial update applied to a stored word. Unset fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    /// Replaces the stat for one mode, leaving other modes intact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stat: Option<(QuizMode, ModeStat)>,
}

impl WordPatch {
    /// Patch carrying a single mode's stat.
    pub fn stat(mode: QuizMode, stat: ModeStat) -> Self {
        Self {
            stat: Some((mode, stat)),
            ..Self::default()
        }
    }
}

/// Persistence collaborator for word records.
///
/// The engine never constructs storage paths or queries; it receives
/// already-scoped collections. `list` is expected to return one
/// language's records newest first.
pub trait WordStore {
    /// All records for one language, newest first.
    fn list(&self, language: Language) -> Vec<WordRecord>;

    /// Insert a new record and return its id.
    fn create(&mut self, word: NewWord) -> Result<String, StoreError>;

    /// Apply a partial update to a record.
    fn update(&mut self, id: &str, patch: WordPatch) -> Result<(), StoreError>;

    /// Remove a record.
    fn delete(&mut self, id: &str) -> Result<(), StoreError>;

    /// Change-notification stream.
    fn subscribe(&mut self) -> Receiver<StoreEvent>;
}

/// In-memory store backing tests and single-process hosts.
#[derive(Default)]
pub struct MemoryWordStore {
    words: Vec<WordRecord>,
    subscribers: Vec<Sender<StoreEvent>>,
}

impl MemoryWordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records across all languages.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Look up one record by id.
    pub fn get(&self, id: &str) -> Option<&WordRecord> {
        self.words.iter().find(|w| w.id == id)
    }

    fn notify(&mut self, event: StoreEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl WordStore for MemoryWordStore {
    fn list(&self, language: Language) -> Vec<WordRecord> {
        // Stable sort over reversed insertion order keeps records created
        // in the same instant newest first.
        let mut words: Vec<WordRecord> = self
            .words
            .iter()
            .rev()
            .filter(|w| w.language == language)
            .cloned()
            .collect();
        words.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        words
    }

    fn create(&mut self, word: NewWord) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        self.words.push(WordRecord {
            id: id.clone(),
            term: word.term,
            definition: word.definition,
            language: word.language,
            created_at: Utc::now(),
            stats: word.stats,
        });
        self.notify(StoreEvent::Created(id.clone()));
        Ok(id)
    }

    fn update(&mut self, id: &str, patch: WordPatch) -> Result<(), StoreError> {
        let word = self
            .words
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if let Some(term) = patch.term {
            word.term = term;
        }
        if let Some(definition) = patch.definition {
            word.definition = definition;
        }
        if let Some((mode, stat)) = patch.stat {
            word.stats.insert(mode, stat);
        }
        self.notify(StoreEvent::Updated(id.to_string()));
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let count_before = self.words.len();
        self.words.retain(|w| w.id != id);
        if self.words.len() == count_before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.notify(StoreEvent::Deleted(id.to_string()));
        Ok(())
    }

    fn subscribe(&mut self) -> Receiver<StoreEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }
}
