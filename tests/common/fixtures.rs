//! Test fixtures and factory functions for creating word pools.

use std::sync::mpsc::Receiver;

use rand::rngs::StdRng;
use rand::SeedableRng;

use vocabhunter_core::{
    Language, MemoryWordStore, ModeStat, NewWord, QuizMode, QuizSession, SessionConfig,
    StoreError, StoreEvent, WordPatch, WordRecord, WordStore,
};

/// Creation fields with all-zero stats for every supported mode.
pub fn new_word(term: &str, definition: &str, language: Language) -> NewWord {
    NewWord {
        term: term.to_string(),
        definition: definition.to_string(),
        language,
        stats: QuizMode::ALL
            .iter()
            .map(|&mode| (mode, ModeStat::default()))
            .collect(),
    }
}

/// Store preloaded with `(term, definition)` entries for one language.
/// Returns the minted ids in insertion order.
pub fn seeded_store(language: Language, entries: &[(&str, &str)]) -> (MemoryWordStore, Vec<String>) {
    let mut store = MemoryWordStore::new();
    let ids = entries
        .iter()
        .map(|(term, definition)| {
            store
                .create(new_word(term, definition, language))
                .expect("seeding the in-memory store cannot fail")
        })
        .collect();
    (store, ids)
}

/// A stat one correct answer away from archiving under default thresholds.
pub fn near_archive_stat() -> ModeStat {
    ModeStat {
        correct: 4,
        total: 5,
        archived: false,
    }
}

/// An already-archived stat.
pub fn archived_stat() -> ModeStat {
    ModeStat {
        correct: 5,
        total: 6,
        archived: true,
    }
}

/// Set one word's stat for a mode directly on the store.
pub fn set_stat(store: &mut MemoryWordStore, id: &str, mode: QuizMode, stat: ModeStat) {
    store
        .update(id, WordPatch::stat(mode, stat))
        .expect("seeded word must exist");
}

/// Deterministic session for the default English multiple-choice setup.
pub fn seeded_session(mode: QuizMode, seed: u64) -> QuizSession {
    QuizSession::with_rng(
        Language::En,
        mode,
        SessionConfig::default(),
        StdRng::seed_from_u64(seed),
    )
}

/// Store wrapper whose updates fail while `fail_updates` is set, keeping
/// reads and creates intact.
pub struct FlakyStore {
    pub inner: MemoryWordStore,
    pub fail_updates: bool,
}

impl FlakyStore {
    pub fn new(inner: MemoryWordStore) -> Self {
        Self {
            inner,
            fail_updates: false,
        }
    }
}

impl WordStore for FlakyStore {
    fn list(&self, language: Language) -> Vec<WordRecord> {
        self.inner.list(language)
    }

    fn create(&mut self, word: NewWord) -> Result<String, StoreError> {
        self.inner.create(word)
    }

    fn update(&mut self, id: &str, patch: WordPatch) -> Result<(), StoreError> {
        if self.fail_updates {
            return Err(StoreError::Backend("simulated outage".to_string()));
        }
        self.inner.update(id, patch)
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        self.inner.delete(id)
    }

    fn subscribe(&mut self) -> Receiver<StoreEvent> {
        self.inner.subscribe()
    }
}
