//! FAQ knowledge base and matcher.
//!
//! The knowledge base is a per-language list of canned question/answer
//! pairs, loaded once at startup and immutable afterwards. Matching is
//! a word-overlap score normalized by the stored question's word count:
//! precision over recall, so ambiguous queries fall through to the
//! generative backend instead of returning a wrong canned answer.

use crate::lang::Language;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while loading the knowledge base.
#[derive(Debug, Error)]
pub enum FaqError {
    /// The FAQ file could not be read.
    #[error("FAQ file error: {0}")]
    Io(#[from] std::io::Error),
    /// The FAQ file is not valid YAML or has the wrong shape.
    #[error("FAQ format error: {0}")]
    Format(String),
}

/// A single canned question/answer pair.
#[derive(Debug, Clone)]
pub struct FaqEntry {
    /// Canonical question text.
    pub question: String,
    /// Canned answer text.
    pub answer: String,
}

/// Transient result of an FAQ lookup.
#[derive(Debug, Clone)]
pub struct ScoredMatch {
    /// The stored answer.
    pub answer: String,
    /// Overlap score in `[0, 1]`.
    pub score: f64,
}

/// Immutable per-language FAQ store. Entry order follows the source
/// file, which fixes the tie-breaking order of the matcher.
#[derive(Debug, Default)]
pub struct KnowledgeBase {
    entries: HashMap<Language, Vec<FaqEntry>>,
}

impl KnowledgeBase {
    /// Load the knowledge base from a YAML file mapping language codes
    /// to `question: answer` mappings.
    ///
    /// # Errors
    ///
    /// Returns a `FaqError` if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FaqError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let kb = Self::from_yaml_str(&raw)?;
        info!(
            path = %path.as_ref().display(),
            entries = kb.len(),
            "FAQ knowledge base loaded"
        );
        Ok(kb)
    }

    /// Parse a knowledge base from YAML text.
    ///
    /// Unknown language codes are rejected so a typo in the data file
    /// fails loudly at startup rather than silently dropping answers.
    ///
    /// # Errors
    ///
    /// Returns a `FaqError` if the YAML is malformed or a key is not a
    /// supported language code.
    pub fn from_yaml_str(raw: &str) -> Result<Self, FaqError> {
        let root: serde_yaml::Value =
            serde_yaml::from_str(raw).map_err(|e| FaqError::Format(e.to_string()))?;
        let mapping = root
            .as_mapping()
            .ok_or_else(|| FaqError::Format("top level must be a mapping".to_string()))?;

        let mut entries: HashMap<Language, Vec<FaqEntry>> = HashMap::new();
        for (key, value) in mapping {
            let code = key
                .as_str()
                .ok_or_else(|| FaqError::Format("language key must be a string".to_string()))?;
            let language = Language::parse(code)
                .ok_or_else(|| FaqError::Format(format!("unsupported language code: {code}")))?;
            let pairs = value.as_mapping().ok_or_else(|| {
                FaqError::Format(format!("entries for '{code}' must be a mapping"))
            })?;

            // serde_yaml mappings preserve file order, which makes the
            // matcher's tie-break deterministic across runs.
            let list = entries.entry(language).or_default();
            for (question, answer) in pairs {
                let (Some(question), Some(answer)) = (question.as_str(), answer.as_str()) else {
                    return Err(FaqError::Format(format!(
                        "'{code}' entries must map strings to strings"
                    )));
                };
                list.push(FaqEntry {
                    question: question.to_string(),
                    answer: answer.to_string(),
                });
            }
        }
        Ok(Self { entries })
    }

    /// Total number of entries across all languages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Returns true if no entries are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }

    /// Score `query` against every entry in the given language and
    /// return the best match at or above `threshold`.
    ///
    /// The score is `|query_words ∩ entry_words| / max(1, |entry_words|)`
    /// over lowercase whitespace tokens. Exact ties keep the first entry
    /// encountered. Entries with zero tokens never match.
    #[must_use]
    pub fn best_match(
        &self,
        query: &str,
        language: Language,
        threshold: f64,
    ) -> Option<ScoredMatch> {
        let query_words = tokenize(query);
        let mut best: Option<ScoredMatch> = None;

        for entry in self.entries.get(&language)? {
            let entry_words = tokenize(&entry.question);
            let overlap = query_words.intersection(&entry_words).count();
            let score = overlap as f64 / entry_words.len().max(1) as f64;
            // Strictly greater keeps the first entry on exact ties.
            if best.as_ref().is_none_or(|b| score > b.score) {
                best = Some(ScoredMatch {
                    answer: entry.answer.clone(),
                    score,
                });
            }
        }

        best.filter(|m| m.score >= threshold)
    }
}

fn tokenize(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect()
}
