// crates/keygram/src/config.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vibrato_rkyv::dictionary::PresetDictionaryKind;

use crate::errors::ConfigError;
use crate::models::gram::{FREQUENCY, HEIGHT, LIFESPAN, NOUN_VALUE};

/// Supported language types.
///
/// Each sentence is routed to the candidate generator that declares its language,
/// and the language decides how token texts are joined into a gram surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
  /// Japanese (Morphological Analysis: VibratoTagger)
  Ja,
  /// English (pre-tagged tokens, Penn Treebank tags)
  En,
}

impl Language {
  /// Returns the language code.
  ///
  /// # Examples
  /// - `Language::Ja` → `"ja"`
  /// - `Language::En` → `"en"`
  pub fn code(&self) -> &'static str {
    match self {
      Language::Ja => "ja",
      Language::En => "en",
    }
  }

  /// Returns the separator placed between token texts when a surface is rebuilt.
  ///
  /// - Japanese: `""` (no word spacing)
  /// - English: `" "`
  pub fn token_separator(&self) -> &'static str {
    match self {
      Language::Ja => "",
      Language::En => " ",
    }
  }
}

impl std::fmt::Display for Language {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.code())
  }
}

/// Default maximum gram width (tokens).
pub const DEFAULT_MAX_WIDTH: usize = 4;
/// Upper bound accepted for `generator.max_width`.
pub const MAX_WIDTH_LIMIT: usize = 8;
/// Default number of keyphrases returned.
pub const DEFAULT_LIMIT: usize = 10;

/// Top-level configuration for keygram.
#[derive(Debug, Clone, Deserialize)]
pub struct KeygramConfig {
  /// [generator] section
  #[serde(default)]
  pub generator: GeneratorConfig,
  /// [scoring] section
  #[serde(default)]
  pub scoring: ScoringConfig,
  /// [dictionary] section (Japanese tagger). `None` disables tagging of raw Japanese text.
  #[serde(default)]
  pub dictionary: Option<DictionaryConfig>,
  /// [logging] section
  #[serde(default)]
  pub logging: LoggingConfig,
}

/// [generator] section configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
  /// Largest window width of the sliding-window scanner
  #[serde(default = "default_max_width")]
  pub max_width: usize,
  /// Languages handled by the built-in n-gram generator (e.g., ["en", "ja"])
  #[serde(default = "default_languages")]
  pub languages: Vec<Language>,
  /// POS pattern dictionaries overriding the built-in ones, per language
  #[serde(default)]
  pub pattern_files: HashMap<Language, PathBuf>,
}

/// [scoring] section configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
  /// Feature name → weight. Features without a weight do not contribute.
  #[serde(default = "default_weights")]
  pub weights: HashMap<String, f64>,
  /// Default number of keyphrases returned
  #[serde(default = "default_limit")]
  pub limit: usize,
}

/// [dictionary] section configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DictionaryConfig {
  /// Preset dictionary type: "ipadic" | "unidic-cwj" | "unidic-csj"
  pub preset: DictionaryPreset,
  /// Dictionary cache directory.
  ///
  /// If omitted, the OS cache directory chosen by `DictionaryManager` is used.
  #[serde(default)]
  pub cache_dir: Option<PathBuf>,
}

/// Preset dictionary type.
///
/// `PresetDictionaryKind` from vibrato-rkyv does not implement `Deserialize`, and the orphan
/// rule prevents adding it here, so the configuration uses this enum and converts with `.into()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DictionaryPreset {
  /// IpaDic: The smallest
  Ipadic,
  /// Unidic for written language
  UnidicCwj,
  /// Unidic for spoken language
  UnidicCsj,
}

/// [logging] section configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
  /// Log level: "trace" | "debug" | "info" | "warn" | "error"
  #[serde(default)]
  pub level: LogLevel,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
  /// trace
  Trace,

  /// debug
  Debug,

  /// info
  #[default]
  Info,

  /// warn
  Warn,

  ///error
  Error,
}

impl LogLevel {
  /// Directive string understood by `tracing_subscriber::EnvFilter`.
  pub fn as_directive(&self) -> &'static str {
    match self {
      LogLevel::Trace => "trace",
      LogLevel::Debug => "debug",
      LogLevel::Info => "info",
      LogLevel::Warn => "warn",
      LogLevel::Error => "error",
    }
  }
}

fn default_max_width() -> usize {
  DEFAULT_MAX_WIDTH
}

/// Default language list (English only)
fn default_languages() -> Vec<Language> {
  vec![Language::En]
}

/// Default weights favouring repeated, long-lived, noun-heavy phrases
fn default_weights() -> HashMap<String, f64> {
  HashMap::from([
    (FREQUENCY.to_string(), 1.0),
    (LIFESPAN.to_string(), 1.0),
    (HEIGHT.to_string(), 0.5),
    (NOUN_VALUE.to_string(), 0.25),
  ])
}

fn default_limit() -> usize {
  DEFAULT_LIMIT
}

impl Default for GeneratorConfig {
  fn default() -> Self {
    Self {
      max_width: default_max_width(),
      languages: default_languages(),
      pattern_files: HashMap::new(),
    }
  }
}

impl Default for ScoringConfig {
  fn default() -> Self {
    Self {
      weights: default_weights(),
      limit: default_limit(),
    }
  }
}

impl Default for KeygramConfig {
  fn default() -> Self {
    Self {
      generator: GeneratorConfig::default(),
      scoring: ScoringConfig::default(),
      dictionary: None,
      logging: LoggingConfig::default(),
    }
  }
}

// ===== Loading =====

impl KeygramConfig {
  /// Parses a JSON configuration. Missing sections fall back to their defaults.
  ///
  /// # Errors
  /// `ConfigError::Parse` if the JSON is malformed.
  pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
    serde_json::from_str(json).map_err(|e| ConfigError::Parse(Arc::new(e)))
  }

  /// Reads and parses a JSON configuration file.
  ///
  /// # Errors
  /// `ConfigError::Io` if the file cannot be read, `ConfigError::Parse` if it is malformed.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
      path: path.to_path_buf(),
      source: Arc::new(e),
    })?;
    Self::from_json_str(&json)
  }
}

// ===== Accessor Methods =====

impl KeygramConfig {
  /// Returns the maximum gram width.
  pub fn max_width(&self) -> usize {
    self.generator.max_width
  }

  /// Returns the list of languages handled by the n-gram generator.
  pub fn supported_languages(&self) -> &[Language] {
    &self.generator.languages
  }

  /// Returns the pattern file override for a language.
  pub fn pattern_file(&self, language: Language) -> Option<&Path> {
    self.generator.pattern_files.get(&language).map(PathBuf::as_path)
  }

  /// Returns the feature weights.
  pub fn weights(&self) -> &HashMap<String, f64> {
    &self.scoring.weights
  }

  /// Returns the default number of keyphrases returned.
  pub fn default_limit(&self) -> usize {
    self.scoring.limit
  }

  /// Returns the preset dictionary type for the Japanese tagger, if configured.
  pub fn dictionary_preset(&self) -> Option<PresetDictionaryKind> {
    self.dictionary.as_ref().map(|d| d.preset.into())
  }

  /// Returns the configured dictionary cache directory.
  pub fn dictionary_cache_dir(&self) -> Option<&Path> {
    self.dictionary.as_ref().and_then(|d| d.cache_dir.as_deref())
  }

  /// Returns the log level.
  pub fn log_level(&self) -> LogLevel {
    self.logging.level
  }

  /// Validates the configuration.
  ///
  /// # Validation Items
  /// - `generator.languages` is not empty
  /// - `generator.max_width` is within 1..=8
  /// - every `generator.pattern_files` entry points to an existing file
  /// - every `scoring.weights` value is finite
  /// - `scoring.limit` >= 1
  /// - `dictionary.cache_dir` exists or can be created
  ///
  /// # Errors
  /// Returns the first failing check as a `ConfigError`.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.generator.languages.is_empty() {
      return Err(ConfigError::EmptyLanguages);
    }

    if !(1..=MAX_WIDTH_LIMIT).contains(&self.generator.max_width) {
      return Err(ConfigError::InvalidMaxWidth {
        min: 1,
        max: MAX_WIDTH_LIMIT,
        actual: self.generator.max_width,
      });
    }

    // sorted so the reported file does not depend on HashMap order
    let mut pattern_files: Vec<_> = self.generator.pattern_files.iter().collect();
    pattern_files.sort_by_key(|(language, _)| **language);
    for (language, path) in pattern_files {
      if !path.is_file() {
        return Err(ConfigError::PatternFileNotFound {
          language: *language,
          path: path.clone(),
        });
      }
    }

    let mut weights: Vec<_> = self.scoring.weights.iter().collect();
    weights.sort_by(|a, b| a.0.cmp(b.0));
    for (feature, value) in weights {
      if !value.is_finite() {
        return Err(ConfigError::InvalidWeight {
          feature: feature.clone(),
          value: *value,
        });
      }
    }

    if self.scoring.limit < 1 {
      return Err(ConfigError::InvalidLimit {
        actual: self.scoring.limit,
      });
    }

    if let Some(cache_dir) = self.dictionary_cache_dir() {
      if cache_dir.exists() {
        if !cache_dir.is_dir() {
          return Err(ConfigError::InvalidDictionaryCacheDir {
            path: cache_dir.to_path_buf(),
          });
        }
      } else if let Err(e) = std::fs::create_dir_all(cache_dir) {
        return Err(ConfigError::DictionaryCacheDirCreationFailed {
          path: cache_dir.to_path_buf(),
          source: Arc::new(e),
        });
      }
    }

    Ok(())
  }
}

impl From<DictionaryPreset> for PresetDictionaryKind {
  fn from(preset: DictionaryPreset) -> Self {
    match preset {
      DictionaryPreset::Ipadic => PresetDictionaryKind::Ipadic,
      DictionaryPreset::UnidicCwj => PresetDictionaryKind::UnidicCwj,
      DictionaryPreset::UnidicCsj => PresetDictionaryKind::UnidicCsj,
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test Module
// ─────────────────────────────────────────────────────────────────────────────
