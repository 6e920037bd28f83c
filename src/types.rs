//! Core types for the vocabulary trainer.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Language a word belongs to. Partitions the whole system: word lists,
/// quizzes, and progress are always per-language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Language {
    En,
    Jp,
}

impl Default for Language {
    fn default() -> Self {
        Self::En
    }
}

impl Language {
    /// All supported languages.
    pub const ALL: [Language; 2] = [Language::En, Language::Jp];

    /// Get the language tag as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "EN",
            Self::Jp => "JP",
        }
    }

    /// Parse from a language tag.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "EN" => Some(Self::En),
            "JP" => Some(Self::Jp),
            _ => None,
        }
    }

    /// BCP 47 tag handed to the speech collaborator.
    pub fn speech_tag(&self) -> &'static str {
        match self {
            Self::En => "en-US",
            Self::Jp => "ja-JP",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Practice format with independently tracked mastery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QuizMode {
    #[serde(rename = "mc")]
    MultipleChoice,
    #[serde(rename = "fib")]
    FillInBlank,
}

impl Default for QuizMode {
    fn default() -> Self {
        Self::MultipleChoice
    }
}

impl QuizMode {
    /// All supported practice formats.
    pub const ALL: [QuizMode; 2] = [QuizMode::MultipleChoice, QuizMode::FillInBlank];

    /// Get the mode key as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "mc",
            Self::FillInBlank => "fib",
        }
    }

    /// Parse from a mode key.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "mc" => Some(Self::MultipleChoice),
            "fib" => Some(Self::FillInBlank),
            _ => None,
        }
    }
}

/// Per-mode answer statistics.
///
/// `archived` is a one-way ratchet: once a word is archived for a mode,
/// the engine never clears the flag (only deleting the word removes it).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeStat {
    pub correct: u32,
    pub total: u32,
    pub archived: bool,
}

impl ModeStat {
    /// Fraction of attempts answered correctly, 0.0 when unattempted.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.correct) / f64::from(self.total)
        }
    }
}

/// A vocabulary word with its per-mode statistics.
///
/// Field names follow the stored document shape (`lang`, `createdAt` in
/// epoch milliseconds, stat keys `mc` / `fib`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRecord {
    pub id: String,
    pub term: String,
    pub definition: String,
    #[serde(rename = "lang")]
    pub language: Language,
    #[serde(rename = "createdAt", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub stats: BTreeMap<QuizMode, ModeStat>,
}

impl WordRecord {
    /// Statistics for one mode, all-zero if never attempted.
    pub fn stat(&self, mode: QuizMode) -> ModeStat {
        self.stats.get(&mode).copied().unwrap_or_default()
    }

    /// Whether the word is mastered for one mode.
    pub fn is_archived(&self, mode: QuizMode) -> bool {
        self.stat(mode).archived
    }

    /// Whether the word can be presented in a round. A record with a
    /// blank term or definition is skipped rather than rejected.
    pub fn has_usable_text(&self) -> bool {
        !self.term.trim().is_empty() && !self.definition.trim().is_empty()
    }
}

/// Fields for creating a word. The store mints the id and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWord {
    pub term: String,
    pub definition: String,
    #[serde(rename = "lang")]
    pub language: Language,
    #[serde(default)]
    pub stats: BTreeMap<QuizMode, ModeStat>,
}

/// One presentation of a target word awaiting a judged answer.
///
/// `options` is `None` for fill-in-blank rounds; for multiple choice it
/// holds the shuffled definitions with no fixed position for the correct
/// one. The round itself carries no mutable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub target: WordRecord,
    pub options: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn language_tags_round_trip() {
        for lang in Language::ALL {
            assert_eq!(Language::from_str(lang.as_str()), Some(lang));
        }
        assert_eq!(Language::from_str("FR"), None);
    }

    #[test]
    fn speech_tags_match_locale() {
        assert_eq!(Language::En.speech_tag(), "en-US");
        assert_eq!(Language::Jp.speech_tag(), "ja-JP");
    }

    #[test]
    fn mode_keys_round_trip() {
        for mode in QuizMode::ALL {
            assert_eq!(QuizMode::from_str(mode.as_str()), Some(mode));
        }
        assert_eq!(QuizMode::from_str("typed"), None);
    }

    #[test]
    fn missing_stat_defaults_to_zero() {
        let word = WordRecord {
            id: "w1".to_string(),
            term: "chien".to_string(),
            definition: "狗".to_string(),
            language: Language::En,
            created_at: Utc::now(),
            stats: BTreeMap::new(),
        };
        assert_eq!(word.stat(QuizMode::MultipleChoice), ModeStat::default());
        assert!(!word.is_archived(QuizMode::MultipleChoice));
    }

    #[test]
    fn accuracy_handles_zero_attempts() {
        assert_eq!(ModeStat::default().accuracy(), 0.0);
        let stat = ModeStat {
            correct: 5,
            total: 8,
            archived: false,
        };
        assert_eq!(stat.accuracy(), 0.625);
    }

    #[test]
    fn blank_text_is_not_usable() {
        let mut word = WordRecord {
            id: "w1".to_string(),
            term: "chien".to_string(),
            definition: "狗".to_string(),
            language: Language::En,
            created_at: Utc::now(),
            stats: BTreeMap::new(),
        };
        assert!(word.has_usable_text());
        word.definition = "   ".to_string();
        assert!(!word.has_usable_text());
    }

    #[test]
    fn stored_document_shape_round_trips() {
        let json = serde_json::json!({
            "id": "abc123",
            "term": "chien",
            "definition": "狗、dog",
            "lang": "EN",
            "createdAt": 1_700_000_000_000_i64,
            "stats": {
                "mc": { "correct": 5, "total": 7, "archived": true }
            }
        });

        let word: WordRecord = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(word.language, Language::En);
        assert_eq!(word.created_at.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(
            word.stat(QuizMode::MultipleChoice),
            ModeStat {
                correct: 5,
                total: 7,
                archived: true
            }
        );
        assert_eq!(word.stat(QuizMode::FillInBlank), ModeStat::default());

        assert_eq!(serde_json::to_value(&word).unwrap(), json);
    }

    #[test]
    fn documents_without_stats_still_deserialize() {
        let word: WordRecord = serde_json::from_value(serde_json::json!({
            "id": "x",
            "term": "猫",
            "definition": "cat",
            "lang": "JP",
            "createdAt": 0
        }))
        .unwrap();
        assert!(word.stats.is_empty());
        assert_eq!(word.language, Language::Jp);
    }
}
