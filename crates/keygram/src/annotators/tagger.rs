//! Japanese morphological tagger using vibrato

use std::sync::Arc;

use tracing::debug;
use vibrato_rkyv::Dictionary;
use vibrato_rkyv::Tokenizer as VibratoImpl;

use crate::blackboard::Blackboard;
use crate::config::Language;
use crate::document::ComponentId;
use crate::errors::{KeygramResult, TokenizerError};
use crate::models::token::Token;
use crate::pipeline::Annotator;

/// Placeholder for an empty field in IPADIC / UniDic feature strings.
const EMPTY_FIELD: &str = "*";

/// Index of the base form in an IPADIC feature string.
const BASE_FORM_FIELD: usize = 6;

/// POS and lemma read from one feature string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenFeature {
  /// Top-level part of speech (`名詞`, `助詞`, ...)
  pub pos: String,
  /// Base form, the surface when the dictionary has none
  pub lemma: String,
}

/// Splits a feature string such as `名詞,固有名詞,地域,一般,*,*,東京,トウキョウ,トーキョー`.
///
/// Symbols and particles are kept: they carry their own tag and break candidate windows.
pub fn parse_feature(surface: &str, feature: &str) -> TokenFeature {
  let fields: Vec<&str> = feature.split(',').collect();
  let pos = fields.first().copied().filter(|f| !f.is_empty()).unwrap_or(EMPTY_FIELD);
  let lemma = fields
    .get(BASE_FORM_FIELD)
    .copied()
    .filter(|f| !f.is_empty() && *f != EMPTY_FIELD)
    .unwrap_or(surface);

  TokenFeature {
    pos: pos.to_string(),
    lemma: lemma.to_string(),
  }
}

/// Tags Japanese sentences that have no tokens yet.
///
/// - Stateless (only holds the dictionary reference), `Send + Sync`
/// - Each token gets `pos` (top-level POS), `lemma` and `stem` (both the base form)
#[derive(Clone)]
pub struct VibratoTagger {
  inner: VibratoImpl,
}

impl VibratoTagger {
  /// Builds a tagger from an already loaded dictionary.
  pub fn from_dictionary(dict: Dictionary) -> Self {
    Self {
      inner: VibratoImpl::new(dict),
    }
  }

  /// Builds a tagger from a shared dictionary, e.g. the one returned by
  /// `DictionaryManager::load()`.
  ///
  /// # Examples
  /// ```rust,no_run
  /// # use keygram::dictionary::DictionaryManager;
  /// # use keygram::annotators::VibratoTagger;
  /// # use vibrato_rkyv::dictionary::PresetDictionaryKind;
  /// let manager = DictionaryManager::with_preset(PresetDictionaryKind::Ipadic).unwrap();
  /// let dict = manager.load().unwrap();
  /// let tagger = VibratoTagger::from_shared_dictionary(dict);
  /// ```
  pub fn from_shared_dictionary(dict: Arc<Dictionary>) -> Self {
    Self {
      inner: VibratoImpl::from_shared_dictionary(dict),
    }
  }

  /// Runs morphological analysis on `text`.
  ///
  /// # Errors
  /// `TokenizerError::InvalidInput` for text containing NUL characters.
  pub fn tag(&self, text: &str) -> Result<Vec<Token>, TokenizerError> {
    if text.contains('\0') {
      return Err(TokenizerError::InvalidInput {
        reason: "text contains a NUL character".to_string(),
      });
    }

    // worker holds the lattice; created per call
    let mut worker = self.inner.new_worker();
    worker.reset_sentence(text);
    worker.tokenize();

    let mut tokens = Vec::with_capacity(worker.num_tokens());
    for token in worker.token_iter() {
      let surface = token.surface();
      let feature = parse_feature(surface, token.feature());
      debug!(surface = %surface, pos = %feature.pos, lemma = %feature.lemma, "token");

      tokens.push(
        Token::new(surface)
          .with_pos(feature.pos)
          .with_stem(feature.lemma.clone())
          .with_lemma(feature.lemma),
      );
    }

    debug!(input_text = %text, tokens = tokens.len(), "morphological analysis completed");
    Ok(tokens)
  }
}

impl Annotator for VibratoTagger {
  fn name(&self) -> &str {
    "vibrato-tagger"
  }

  fn annotate(&self, blackboard: &mut Blackboard, component: ComponentId) -> KeygramResult<()> {
    let sentence_ids = blackboard.component(component)?.sentence_ids();

    for sentence_id in sentence_ids {
      let language = blackboard.root().and_then(|root| root.language_of(sentence_id));
      if language != Some(Language::Ja) {
        continue;
      }

      let sentence = blackboard.component_mut(sentence_id)?;
      if !sentence.tokens().is_empty() {
        continue;
      }
      let tokens = self.tag(sentence.preprocessed_text())?;
      if let Some(leaf) = sentence.as_sentence_mut() {
        leaf.tokens_mut().extend(tokens);
      }
    }
    Ok(())
  }
}

impl std::fmt::Debug for VibratoTagger {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("VibratoTagger").finish_non_exhaustive()
  }
}
