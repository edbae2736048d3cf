//! POS pattern dictionary
//!
//! Maps a POS-tag sequence (tags joined by `/`) to its noun count. Loaded from JSON records:
//!
//! ```json
//! [{ "pattern": "NN/NN", "nounCount": 2 }, { "pattern": "JJ/NN", "nounCount": 1 }]
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Language;
use crate::errors::PatternError;

/// Separator between tags in a pattern key.
pub const TAG_SEPARATOR: char = '/';

const BUILT_IN_EN: &str = include_str!("../../data/patterns/en.json");
const BUILT_IN_JA: &str = include_str!("../../data/patterns/ja.json");

/// One record of a pattern file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternRecord {
  /// Tags joined by `/`, e.g. `"JJ/NN"`
  pub pattern: String,
  /// Number of noun-class tags in the pattern. `0` keeps the pattern known but emits nothing.
  pub noun_count: u32,
}

/// POS pattern → noun count lookup table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternDictionary {
  entries: HashMap<String, u32>,
  max_len: usize,
}

impl PatternDictionary {
  /// Builds a dictionary from records. A pattern listed twice keeps the later noun count.
  ///
  /// # Errors
  /// `PatternError::InvalidPattern` for an empty pattern or an empty tag (`"NN//NN"`).
  pub fn from_records(
    records: impl IntoIterator<Item = PatternRecord>,
  ) -> Result<Self, PatternError> {
    let mut dictionary = Self::default();
    for record in records {
      dictionary.insert(&record.pattern, record.noun_count)?;
    }
    Ok(dictionary)
  }

  /// Parses JSON records. `origin` names the source in error messages.
  ///
  /// # Errors
  /// `PatternError::Parse` for malformed JSON, `PatternError::InvalidPattern` for bad records.
  pub fn from_json_str(json: &str, origin: &str) -> Result<Self, PatternError> {
    let records: Vec<PatternRecord> =
      serde_json::from_str(json).map_err(|e| PatternError::Parse {
        origin: origin.to_string(),
        source: Arc::new(e),
      })?;
    Self::from_records(records)
  }

  /// Reads a pattern file.
  ///
  /// # Errors
  /// `PatternError::Io` if the file cannot be read, otherwise as [`from_json_str`](Self::from_json_str).
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PatternError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| PatternError::Io {
      path: path.to_path_buf(),
      source: Arc::new(e),
    })?;
    Self::from_json_str(&json, &path.display().to_string())
  }

  /// Dictionary bundled with the crate.
  ///
  /// - English: Penn Treebank tags (`NN`, `NNS`, `NNP`, `JJ`, ...)
  /// - Japanese: IPADIC top-level POS (`名詞`, `接頭詞`, `形容詞`, ...)
  pub fn built_in(language: Language) -> Result<Self, PatternError> {
    let json = match language {
      Language::En => BUILT_IN_EN,
      Language::Ja => BUILT_IN_JA,
    };
    Self::from_json_str(json, &format!("built-in:{}", language.code()))
  }

  /// Adds or replaces a pattern.
  ///
  /// # Errors
  /// `PatternError::InvalidPattern` for an empty pattern or an empty tag.
  pub fn insert(&mut self, pattern: &str, noun_count: u32) -> Result<(), PatternError> {
    if pattern.is_empty() {
      return Err(PatternError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: "empty pattern".to_string(),
      });
    }
    let len = pattern.split(TAG_SEPARATOR).count();
    if pattern.split(TAG_SEPARATOR).any(str::is_empty) {
      return Err(PatternError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: "empty tag".to_string(),
      });
    }

    self.max_len = self.max_len.max(len);
    self.entries.insert(pattern.to_string(), noun_count);
    Ok(())
  }

  /// Noun count of a joined pattern key.
  pub fn noun_count(&self, key: &str) -> Option<u32> {
    self.entries.get(key).copied()
  }

  /// Noun count of a tag sequence.
  pub fn lookup<S: AsRef<str>>(&self, tags: &[S]) -> Option<u32> {
    self.noun_count(&Self::key_of(tags))
  }

  /// Joins tags into a pattern key.
  pub fn key_of<S: AsRef<str>>(tags: &[S]) -> String {
    let mut key = String::new();
    for (i, tag) in tags.iter().enumerate() {
      if i > 0 {
        key.push(TAG_SEPARATOR);
      }
      key.push_str(tag.as_ref());
    }
    key
  }

  /// Length (in tags) of the longest pattern.
  pub fn max_len(&self) -> usize {
    self.max_len
  }

  /// Number of patterns.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Whether no pattern is registered.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}
