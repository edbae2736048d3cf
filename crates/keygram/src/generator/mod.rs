//! 候補生成モジュール
//!
//! 品詞パターン辞書に一致するトークン列を Gram 候補として Blackboard に登録する。
//! 複数のジェネレーターが登録されている場合、文の言語に対応する最初のものが使われる。

pub mod ngram;
pub mod patterns;

use tracing::debug;

use crate::blackboard::Blackboard;
use crate::config::Language;
use crate::document::ComponentId;
use crate::errors::{AnnotatorError, KeygramResult};
use crate::pipeline::Annotator;

/// Re-exports
pub use ngram::NgramGenerator;
pub use patterns::{PatternDictionary, PatternRecord};

/// An annotator that proposes candidate grams for the sentences of a component.
pub trait CandidateGenerator: Annotator {
  /// Languages this generator handles.
  fn supported_languages(&self) -> &[Language];

  /// Replaces the handled languages.
  fn set_languages(&mut self, languages: Vec<Language>);

  /// Registers candidates for every sentence under `component` and returns how many
  /// occurrences were handed to the blackboard.
  ///
  /// # Errors
  /// Dictionary load failures and blackboard structure errors.
  fn generate(&self, blackboard: &mut Blackboard, component: ComponentId) -> KeygramResult<usize>;

  /// Whether `language` is handled.
  fn supports(&self, language: Language) -> bool {
    self.supported_languages().contains(&language)
  }
}

/// Routes each sentence to the first generator that supports its language.
///
/// Sentences without any language tag go to the first generator.
#[derive(Default)]
pub struct GeneratorSet {
  generators: Vec<Box<dyn CandidateGenerator>>,
}

impl GeneratorSet {
  /// Creates an empty set.
  pub fn new() -> Self {
    Self::default()
  }

  /// Builder that appends a generator.
  #[must_use]
  pub fn with(mut self, generator: impl CandidateGenerator + 'static) -> Self {
    self.generators.push(Box::new(generator));
    self
  }

  /// Appends a generator.
  pub fn push(&mut self, generator: Box<dyn CandidateGenerator>) {
    self.generators.push(generator);
  }

  /// Number of generators.
  pub fn len(&self) -> usize {
    self.generators.len()
  }

  /// Whether the set has no generator.
  pub fn is_empty(&self) -> bool {
    self.generators.is_empty()
  }

  /// First generator supporting `language`.
  pub fn select(&self, language: Language) -> Option<&dyn CandidateGenerator> {
    self
      .generators
      .iter()
      .find(|g| g.supports(language))
      .map(|g| g.as_ref())
  }

  fn select_for(&self, language: Option<Language>) -> Option<&dyn CandidateGenerator> {
    match language {
      Some(language) => self.select(language),
      None => self.generators.first().map(|g| g.as_ref()),
    }
  }
}

impl Annotator for GeneratorSet {
  fn name(&self) -> &str {
    "generators"
  }

  fn annotate(&self, blackboard: &mut Blackboard, component: ComponentId) -> KeygramResult<()> {
    let sentence_ids = blackboard.component(component)?.sentence_ids();

    for sentence_id in sentence_ids {
      let language = blackboard.root().and_then(|root| root.language_of(sentence_id));
      let Some(generator) = self.select_for(language) else {
        debug!(sentence = %sentence_id, language = ?language, "no generator for language");
        continue;
      };
      // inner failures keep the concrete generator name
      generator
        .generate(blackboard, sentence_id)
        .map_err(|e| AnnotatorError::wrap(generator.name(), e))?;
    }
    Ok(())
  }
}

impl std::fmt::Debug for GeneratorSet {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let names: Vec<_> = self.generators.iter().map(|g| g.name()).collect();
    f.debug_struct("GeneratorSet").field("generators", &names).finish()
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test Module
// ─────────────────────────────────────────────────────────────────────────────
