//! Sliding-window n-gram candidate generator

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::blackboard::Blackboard;
use crate::config::{DEFAULT_MAX_WIDTH, KeygramConfig, Language};
use crate::document::ComponentId;
use crate::errors::{KeygramResult, PatternError, StructureError};
use crate::generator::CandidateGenerator;
use crate::generator::patterns::PatternDictionary;
use crate::models::gram::{Gram, NOUN_VALUE};
use crate::models::token::Token;
use crate::pipeline::Annotator;

/// Lazily loaded dictionary slot. Load errors are cached like successes.
type DictionarySlot = OnceLock<Result<Arc<PatternDictionary>, PatternError>>;

/// Emits every token window whose POS sequence is a known pattern with a positive noun count.
///
/// One buffer per width `1..=max_width` slides over each sentence; widths are independent, so
/// overlapping candidates ("software" and "software engineering") are all emitted.
pub struct NgramGenerator {
  max_width: usize,
  languages: Vec<Language>,
  pattern_files: HashMap<Language, PathBuf>,
  dictionaries: HashMap<Language, DictionarySlot>,
}

impl NgramGenerator {
  /// Creates a generator using the built-in dictionaries of `languages`.
  pub fn new(max_width: usize, languages: Vec<Language>) -> Self {
    let dictionaries = languages.iter().map(|l| (*l, OnceLock::new())).collect();
    Self {
      max_width,
      languages,
      pattern_files: HashMap::new(),
      dictionaries,
    }
  }

  /// Creates a generator from the `[generator]` section.
  pub fn from_config(config: &KeygramConfig) -> Self {
    let mut generator = Self::new(config.max_width(), config.supported_languages().to_vec());
    for (language, path) in &config.generator.pattern_files {
      generator = generator.with_pattern_file(*language, path.clone());
    }
    generator
  }

  /// Builder that reads the dictionary of `language` from a file instead of the built-in one.
  #[must_use]
  pub fn with_pattern_file(mut self, language: Language, path: impl Into<PathBuf>) -> Self {
    self.pattern_files.insert(language, path.into());
    self.dictionaries.insert(language, OnceLock::new());
    self
  }

  /// Builder that installs an already loaded dictionary for `language`.
  #[must_use]
  pub fn with_dictionary(mut self, language: Language, dictionary: PatternDictionary) -> Self {
    self.dictionaries.insert(language, OnceLock::from(Ok(Arc::new(dictionary))));
    self
  }

  /// Maximum window width.
  pub fn max_width(&self) -> usize {
    self.max_width
  }

  /// Dictionary of `language`, loaded on first use.
  ///
  /// # Errors
  /// `PatternError::MissingDictionary` for an undeclared language, or the cached load error.
  pub fn dictionary(&self, language: Language) -> Result<Arc<PatternDictionary>, PatternError> {
    let slot = self
      .dictionaries
      .get(&language)
      .ok_or(PatternError::MissingDictionary { language })?;
    slot.get_or_init(|| self.load_dictionary(language).map(Arc::new)).clone()
  }

  fn load_dictionary(&self, language: Language) -> Result<PatternDictionary, PatternError> {
    let dictionary = match self.pattern_files.get(&language) {
      Some(path) => PatternDictionary::from_path(path)?,
      None => PatternDictionary::built_in(language)?,
    };
    debug!(
      language = %language,
      patterns = dictionary.len(),
      "pattern dictionary loaded"
    );
    Ok(dictionary)
  }

  /// Scans one token sequence and returns the candidates in emission order.
  ///
  /// Tokens without a POS tag never match, so they break every window they are in.
  pub fn scan(
    &self,
    tokens: &[Token],
    dictionary: &PatternDictionary,
    language: Language,
  ) -> Vec<Gram> {
    let widths = self.max_width.min(dictionary.max_len());
    let mut buffers: Vec<VecDeque<&Token>> =
      (1..=widths).map(VecDeque::with_capacity).collect();
    let mut candidates = Vec::new();

    for token in tokens {
      for (idx, buffer) in buffers.iter_mut().enumerate() {
        let width = idx + 1;
        buffer.push_back(token);
        if buffer.len() > width {
          buffer.pop_front();
        }
        if buffer.len() < width {
          continue;
        }

        let tags: Vec<&str> = buffer.iter().map(|t| t.pos().unwrap_or_default()).collect();
        match dictionary.lookup(tags.as_slice()) {
          Some(noun_count) if noun_count > 0 => {
            let window: Vec<Token> = buffer.iter().map(|t| (*t).clone()).collect();
            let gram = Gram::from_tokens(window, language.token_separator())
              .with_feature(NOUN_VALUE, f64::from(noun_count));
            debug!(
              signature = gram.signature(),
              width,
              noun_count,
              "candidate found"
            );
            candidates.push(gram);
          }
          _ => {}
        }
      }
    }

    candidates
  }

  /// Language used for a sentence: its own or inherited tag, else the first declared language.
  fn effective_language(
    &self,
    blackboard: &Blackboard,
    sentence: ComponentId,
  ) -> Option<Language> {
    blackboard
      .root()
      .and_then(|root| root.language_of(sentence))
      .or_else(|| self.languages.first().copied())
  }
}

impl CandidateGenerator for NgramGenerator {
  fn supported_languages(&self) -> &[Language] {
    &self.languages
  }

  fn set_languages(&mut self, languages: Vec<Language>) {
    for language in &languages {
      self.dictionaries.entry(*language).or_default();
    }
    self.languages = languages;
  }

  fn generate(&self, blackboard: &mut Blackboard, component: ComponentId) -> KeygramResult<usize> {
    let sentence_ids = blackboard.component(component)?.sentence_ids();
    let mut emitted = 0;

    for sentence_id in sentence_ids {
      let Some(language) = self.effective_language(blackboard, sentence_id) else {
        continue;
      };
      if !self.supports(language) {
        debug!(sentence = %sentence_id, language = %language, "language not supported, skipped");
        continue;
      }

      let dictionary = self.dictionary(language)?;
      let candidates = {
        let sentence = blackboard
          .component(sentence_id)?
          .as_sentence()
          .ok_or(StructureError::GramOnComposite {
            component: sentence_id,
          })?;
        self.scan(sentence.tokens(), &dictionary, language)
      };

      for gram in candidates {
        blackboard.add_gram(sentence_id, gram)?;
        emitted += 1;
      }
    }

    Ok(emitted)
  }
}

impl Annotator for NgramGenerator {
  fn name(&self) -> &str {
    "ngram"
  }

  fn annotate(&self, blackboard: &mut Blackboard, component: ComponentId) -> KeygramResult<()> {
    self.generate(blackboard, component).map(|_| ())
  }
}

impl Default for NgramGenerator {
  fn default() -> Self {
    Self::new(DEFAULT_MAX_WIDTH, vec![Language::En])
  }
}

impl fmt::Debug for NgramGenerator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("NgramGenerator")
      .field("max_width", &self.max_width)
      .field("languages", &self.languages)
      .field("pattern_files", &self.pattern_files)
      .field(
        "loaded",
        &self
          .dictionaries
          .iter()
          .filter(|(_, slot)| slot.get().is_some())
          .map(|(language, _)| *language)
          .collect::<Vec<_>>(),
      )
      .finish()
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test Module
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use crate::document::DocumentBuilder;
  use crate::errors::KeygramError;

  // ─── Test Helpers ─────────────────────────────────────────────────────

  fn tagged(words: &[(&str, &str)]) -> Vec<Token> {
    words.iter().map(|(text, pos)| Token::new(*text).with_pos(*pos)).collect()
  }

  fn dictionary(patterns: &[(&str, u32)]) -> PatternDictionary {
    let mut dict = PatternDictionary::default();
    for (pattern, count) in patterns {
      dict.insert(pattern, *count).unwrap();
    }
    dict
  }

  /// Loads a one-section document and returns the blackboard plus the root id.
  fn load(sentences: Vec<Vec<Token>>) -> (Blackboard, ComponentId) {
    let mut builder = DocumentBuilder::new();
    let children = sentences.into_iter().map(|tokens| builder.sentence("", tokens)).collect();
    let root = builder.composite("", children);
    let root_id = root.id();

    let mut bb = Blackboard::new();
    bb.create_document("", root).unwrap();
    (bb, root_id)
  }

  fn signatures(bb: &Blackboard) -> Vec<String> {
    bb.grams().map(|(_, g)| g.signature().to_string()).collect()
  }

  // ─── scan ─────────────────────────────────────────────────────────────

  #[test]
  fn only_matching_width_is_emitted() {
    let generator = NgramGenerator::new(3, vec![Language::En]);
    let dict = dictionary(&[("NN/NN", 2)]);
    let tokens = tagged(&[("software", "NN"), ("engineering", "NN"), ("rocks", "VB")]);

    let grams = generator.scan(&tokens, &dict, Language::En);
    assert_eq!(grams.len(), 1);
    assert_eq!(grams[0].surface(), "software engineering");
    assert_eq!(grams[0].feature(NOUN_VALUE), Some(2.0));
  }

  #[test]
  fn overlapping_widths_are_all_emitted() {
    let generator = NgramGenerator::new(3, vec![Language::En]);
    let dict = dictionary(&[("NN", 1), ("NN/NN", 2)]);
    let tokens = tagged(&[("software", "NN"), ("engineering", "NN")]);

    let surfaces: Vec<_> = generator
      .scan(&tokens, &dict, Language::En)
      .iter()
      .map(|g| g.surface().to_string())
      .collect();
    assert_eq!(surfaces, vec!["software", "engineering", "software engineering"]);
  }

  #[test]
  fn zero_noun_count_emits_nothing() {
    let generator = NgramGenerator::new(2, vec![Language::En]);
    let dict = dictionary(&[("JJ", 0)]);
    let grams = generator.scan(&tagged(&[("great", "JJ")]), &dict, Language::En);
    assert!(grams.is_empty());
  }

  #[test]
  fn windows_wider_than_max_width_are_ignored() {
    let generator = NgramGenerator::new(2, vec![Language::En]);
    let dict = dictionary(&[("NN/NN/NN", 3)]);
    let tokens = tagged(&[("a", "NN"), ("b", "NN"), ("c", "NN")]);
    assert!(generator.scan(&tokens, &dict, Language::En).is_empty());
  }

  #[test]
  fn untagged_token_breaks_windows() {
    let generator = NgramGenerator::new(2, vec![Language::En]);
    let dict = dictionary(&[("NN/NN", 2)]);
    let mut tokens = tagged(&[("a", "NN")]);
    tokens.push(Token::new("-"));
    tokens.extend(tagged(&[("b", "NN")]));
    assert!(generator.scan(&tokens, &dict, Language::En).is_empty());
  }

  #[test]
  fn japanese_surface_has_no_spaces() {
    let generator = NgramGenerator::new(2, vec![Language::Ja]);
    let dict = dictionary(&[("名詞/名詞", 2)]);
    let tokens = tagged(&[("東京", "名詞"), ("タワー", "名詞")]);

    let grams = generator.scan(&tokens, &dict, Language::Ja);
    assert_eq!(grams[0].surface(), "東京タワー");
  }

  // ─── generate ─────────────────────────────────────────────────────────

  #[test]
  fn buffers_reset_between_sentences() {
    let generator =
      NgramGenerator::new(2, vec![Language::En]).with_dictionary(Language::En, dictionary(&[("NN/NN", 2)]));
    let (mut bb, root) = load(vec![tagged(&[("data", "NN")]), tagged(&[("science", "NN")])]);

    let emitted = generator.generate(&mut bb, root).unwrap();
    assert_eq!(emitted, 0);
    assert_eq!(bb.gram_count(), 0);
  }

  #[test]
  fn candidates_are_registered_on_their_sentence() {
    let generator =
      NgramGenerator::new(2, vec![Language::En]).with_dictionary(Language::En, dictionary(&[("NN", 1)]));
    let (mut bb, root) = load(vec![
      tagged(&[("Graph", "NN"), ("is", "VB")]),
      tagged(&[("graph", "NN")]),
    ]);

    assert_eq!(generator.generate(&mut bb, root).unwrap(), 2);
    assert_eq!(signatures(&bb), vec!["graph"]);
    let gram = bb.gram_by_signature("graph").unwrap();
    assert_eq!(gram.appearances().len(), 2);
  }

  #[test]
  fn unsupported_language_is_skipped() {
    let generator =
      NgramGenerator::new(2, vec![Language::En]).with_dictionary(Language::En, dictionary(&[("名詞", 1)]));
    let mut builder = DocumentBuilder::new();
    let s = builder.sentence("東京", tagged(&[("東京", "名詞")])).with_language(Language::Ja);
    let root = builder.composite("東京", vec![s]);
    let root_id = root.id();
    let mut bb = Blackboard::new();
    bb.create_document("東京", root).unwrap();

    assert_eq!(generator.generate(&mut bb, root_id).unwrap(), 0);
  }

  #[test]
  fn dictionary_load_error_is_cached_and_returned() {
    let generator = NgramGenerator::new(2, vec![Language::En])
      .with_pattern_file(Language::En, "/nonexistent/keygram/patterns.json");
    let (mut bb, root) = load(vec![tagged(&[("graph", "NN")])]);

    let err = generator.generate(&mut bb, root).unwrap_err();
    assert!(matches!(err, KeygramError::Pattern(PatternError::Io { .. })));
    assert!(matches!(
      generator.dictionary(Language::En),
      Err(PatternError::Io { .. })
    ));
  }

  #[test]
  fn undeclared_language_has_no_dictionary() {
    let generator = NgramGenerator::new(2, vec![Language::En]);
    assert!(matches!(
      generator.dictionary(Language::Ja),
      Err(PatternError::MissingDictionary { language: Language::Ja })
    ));
  }

  #[test]
  fn set_languages_prepares_new_dictionaries() {
    let mut generator = NgramGenerator::new(2, vec![Language::En]);
    generator.set_languages(vec![Language::Ja]);
    assert_eq!(generator.supported_languages(), &[Language::Ja]);
    assert!(generator.supports(Language::Ja));
    assert!(!generator.supports(Language::En));
    assert!(generator.dictionary(Language::Ja).is_ok());
  }

  #[test]
  fn built_in_dictionary_is_used_by_default() {
    let generator = NgramGenerator::default();
    let (mut bb, root) = load(vec![tagged(&[("neural", "JJ"), ("network", "NN")])]);
    generator.generate(&mut bb, root).unwrap();
    let found = signatures(&bb);
    assert!(found.contains(&"neural network".to_string()));
    assert!(found.contains(&"network".to_string()));
  }
}
