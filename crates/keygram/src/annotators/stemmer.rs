//! Snowball stemming of English tokens

use rust_stemmers::{Algorithm, Stemmer};
use tracing::debug;

use crate::blackboard::Blackboard;
use crate::config::Language;
use crate::document::ComponentId;
use crate::errors::KeygramResult;
use crate::pipeline::Annotator;

/// Fills the missing `stem` annotation of English tokens with the Snowball stem of the
/// lowercased text.
///
/// Sentences tagged (or inheriting) another language are left alone; untagged sentences are
/// treated as English. Existing stems are never overwritten.
pub struct SnowballStemmer {
  stemmer: Stemmer,
}

impl SnowballStemmer {
  /// English Snowball stemmer.
  pub fn english() -> Self {
    Self {
      stemmer: Stemmer::create(Algorithm::English),
    }
  }

  /// Stem of one word.
  pub fn stem(&self, word: &str) -> String {
    self.stemmer.stem(&word.to_lowercase()).into_owned()
  }
}

impl Default for SnowballStemmer {
  fn default() -> Self {
    Self::english()
  }
}

impl std::fmt::Debug for SnowballStemmer {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SnowballStemmer").field("algorithm", &"english").finish()
  }
}

impl Annotator for SnowballStemmer {
  fn name(&self) -> &str {
    "snowball-stemmer"
  }

  fn annotate(&self, blackboard: &mut Blackboard, component: ComponentId) -> KeygramResult<()> {
    let sentence_ids = blackboard.component(component)?.sentence_ids();
    let mut stemmed = 0usize;

    for sentence_id in sentence_ids {
      let language = blackboard.root().and_then(|root| root.language_of(sentence_id));
      if language.is_some_and(|l| l != Language::En) {
        continue;
      }

      let Some(sentence) = blackboard.component_mut(sentence_id)?.as_sentence_mut() else {
        continue;
      };
      for token in sentence.tokens_mut().iter_mut().filter(|t| !t.has_stem()) {
        let stem = self.stem(token.text());
        token.set_stem(stem);
        stemmed += 1;
      }
    }

    debug!(tokens = stemmed, "stems written");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::document::DocumentBuilder;
  use crate::models::token::Token;

  #[test]
  fn stems_are_lowercased_snowball_stems() {
    let stemmer = SnowballStemmer::english();
    assert_eq!(stemmer.stem("Engineering"), "engin");
    assert_eq!(stemmer.stem("networks"), "network");
  }

  #[test]
  fn fills_only_missing_english_stems() {
    let mut builder = DocumentBuilder::new();
    let en = builder.sentence(
      "Running networks",
      vec![Token::new("Running"), Token::new("networks").with_stem("custom")],
    );
    let ja = builder
      .sentence("走る", vec![Token::new("走る")])
      .with_language(Language::Ja);
    let en_id = en.id();
    let ja_id = ja.id();
    let root = builder.composite("", vec![en, ja]);
    let root_id = root.id();
    let mut bb = Blackboard::new();
    bb.create_document("", root).unwrap();

    SnowballStemmer::english().annotate(&mut bb, root_id).unwrap();

    let tokens = bb.component(en_id).unwrap().tokens();
    assert_eq!(tokens[0].stem(), "run");
    assert_eq!(tokens[1].stem(), "custom");
    assert!(!bb.component(ja_id).unwrap().tokens()[0].has_stem());
  }
}
