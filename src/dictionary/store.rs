//! Named dictionaries with a merged lookup view and fuzzy suggestion.
//!
//! The store holds many named dictionaries at once and derives two combined
//! sets for O(1) membership: a case-folded set for ordinary entries and an
//! exact set for case-sensitive ones. Mutation takes the write lock and
//! rebuilds the combined sets; `contains`/`suggest` only take the read lock,
//! so no lock is ever held across an analysis call.

use std::collections::{BTreeSet, HashMap, HashSet};

use edit_distance::edit_distance;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::errors::{Result, RunelintError};

/// One known-good word in a named dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    /// The word itself
    pub word: String,

    /// Optional language tag (e.g. "en")
    #[serde(default)]
    pub language: Option<String>,

    /// Optional domain tag (e.g. "javascript")
    #[serde(default)]
    pub domain: Option<String>,

    /// Match this entry exactly rather than case-folded
    #[serde(default)]
    pub case_sensitive: bool,
}

impl DictionaryEntry {
    /// Create a plain case-insensitive entry.
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            language: None,
            domain: None,
            case_sensitive: false,
        }
    }

    /// Mark this entry as case-sensitive.
    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.word.trim().is_empty() {
            return Err(RunelintError::dictionary("Dictionary word must not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct StoreInner {
    /// Named dictionaries
    dictionaries: HashMap<String, Vec<DictionaryEntry>>,

    /// Case-folded combined set for case-insensitive entries
    folded: HashSet<String>,

    /// Exact combined set for case-sensitive entries
    exact: HashSet<String>,
}

impl StoreInner {
    /// Rebuild both combined sets from the named dictionaries.
    fn rebuild_combined(&mut self) {
        self.folded.clear();
        self.exact.clear();
        for entries in self.dictionaries.values() {
            for entry in entries {
                if entry.case_sensitive {
                    self.exact.insert(entry.word.clone());
                } else {
                    self.folded.insert(entry.word.to_lowercase());
                }
            }
        }
    }
}

/// In-memory store of named dictionaries with a merged lookup view.
#[derive(Debug, Default)]
pub struct DictionaryStore {
    inner: RwLock<StoreInner>,
}

impl DictionaryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace or create a named dictionary and merge its words into the
    /// combined lookup set. Fails only on malformed entries.
    pub fn load(&self, name: impl Into<String>, entries: Vec<DictionaryEntry>) -> Result<()> {
        let name = name.into();
        for entry in &entries {
            entry.validate().map_err(|_| {
                RunelintError::dictionary_named("Dictionary word must not be empty", name.clone())
            })?;
        }

        let mut inner = self.inner.write();
        debug!(dictionary = %name, words = entries.len(), "loading dictionary");
        inner.dictionaries.insert(name, entries);
        inner.rebuild_combined();
        Ok(())
    }

    /// Add one word to a named dictionary, creating the dictionary if absent.
    pub fn add(&self, word: impl Into<String>, dictionary_name: &str) -> Result<()> {
        let entry = DictionaryEntry::new(word);
        entry
            .validate()
            .map_err(|_| {
                RunelintError::dictionary_named(
                    "Dictionary word must not be empty",
                    dictionary_name,
                )
            })?;

        let mut inner = self.inner.write();
        inner
            .dictionaries
            .entry(dictionary_name.to_string())
            .or_default()
            .push(entry);
        inner.rebuild_combined();
        Ok(())
    }

    /// Remove one word from a named dictionary. No-op if the word or the
    /// dictionary is absent.
    pub fn remove(&self, word: &str, dictionary_name: &str) {
        let mut inner = self.inner.write();
        if let Some(entries) = inner.dictionaries.get_mut(dictionary_name) {
            entries.retain(|entry| entry.word != word);
        }
        inner.rebuild_combined();
    }

    /// Case-folded membership test against the combined set; case-sensitive
    /// entries must match exactly.
    pub fn contains(&self, word: &str) -> bool {
        let inner = self.inner.read();
        inner.folded.contains(&word.to_lowercase()) || inner.exact.contains(word)
    }

    /// Names of the loaded dictionaries, sorted.
    pub fn dictionary_names(&self) -> Vec<String> {
        let inner = self.inner.read();
        let mut names: Vec<String> = inner.dictionaries.keys().cloned().collect();
        names.sort();
        names
    }

    /// Total number of words across the combined sets.
    pub fn combined_len(&self) -> usize {
        let inner = self.inner.read();
        inner.folded.len() + inner.exact.len()
    }

    /// Fuzzy suggestions for `word`, ranked ascending by
    /// `(edit distance, lexicographic order)` and capped at `limit`.
    ///
    /// Candidates are kept when their Levenshtein distance is within
    /// `max(1, word_chars / 3)`. This is a full scan of the combined set,
    /// O(D * L1 * L2); acceptable at the dictionary sizes we target.
    pub fn suggest(&self, word: &str, limit: usize) -> Vec<String> {
        if limit == 0 || word.is_empty() {
            return Vec::new();
        }

        let threshold = suggestion_threshold(word);
        let folded_query = word.to_lowercase();

        let inner = self.inner.read();
        let mut ranked: BTreeSet<(usize, &str)> = BTreeSet::new();
        for candidate in inner.folded.iter().chain(inner.exact.iter()) {
            if candidate.as_str() == word || candidate.as_str() == folded_query {
                continue;
            }
            let distance = edit_distance(&folded_query, &candidate.to_lowercase());
            if distance <= threshold {
                ranked.insert((distance, candidate.as_str()));
            }
        }

        ranked
            .into_iter()
            .take(limit)
            .map(|(_, candidate)| candidate.to_string())
            .collect()
    }
}

/// Maximum edit distance accepted for suggestions on `word`.
pub fn suggestion_threshold(word: &str) -> usize {
    (word.chars().count() / 3).max(1)
}
