//! Token: the smallest annotable unit

use std::borrow::Cow;

use crate::models::annotation::{Annotable, Annotation, AnnotationTable};

/// Annotator id of the stem annotation.
pub const STEM: &str = "stem";

/// Annotator id of the part-of-speech annotation.
pub const POS: &str = "pos";

/// Annotator id of the lemma annotation.
pub const LEMMA: &str = "lemma";

/// A token of a sentence.
///
/// Identity is the surface text; stem, POS and lemma are ordinary annotations so that
/// tagging backends write them the same way any other annotator does.
///
/// Equality compares `(text, stem, pos)` only: two tokens taken from different
/// sentences with the same linguistic identity are equal.
#[derive(Debug, Clone)]
pub struct Token {
  text: String,
  annotations: AnnotationTable,
}

impl Token {
  /// Creates a token without annotations.
  pub fn new(text: impl Into<String>) -> Self {
    Self {
      text: text.into(),
      annotations: AnnotationTable::new(),
    }
  }

  /// Builder that sets the part-of-speech tag.
  #[must_use]
  pub fn with_pos(mut self, pos: impl Into<String>) -> Self {
    self.set_pos(pos);
    self
  }

  /// Builder that sets the stem.
  #[must_use]
  pub fn with_stem(mut self, stem: impl Into<String>) -> Self {
    self.set_stem(stem);
    self
  }

  /// Builder that sets the lemma.
  #[must_use]
  pub fn with_lemma(mut self, lemma: impl Into<String>) -> Self {
    self.annotations.add(Annotation::trusted(LEMMA, lemma.into()));
    self
  }

  /// Surface text.
  pub fn text(&self) -> &str {
    &self.text
  }

  /// Part-of-speech tag, if tagged.
  pub fn pos(&self) -> Option<&str> {
    self.string_annotation(POS)
  }

  /// Lemma, if lemmatized.
  pub fn lemma(&self) -> Option<&str> {
    self.string_annotation(LEMMA)
  }

  /// Stem used for gram signatures.
  ///
  /// Falls back to the lowercased surface text when no stem annotation exists.
  pub fn stem(&self) -> Cow<'_, str> {
    match self.string_annotation(STEM) {
      Some(stem) => Cow::Borrowed(stem),
      None => Cow::Owned(self.text.to_lowercase()),
    }
  }

  /// Whether a stem annotation exists (the fallback does not count).
  pub fn has_stem(&self) -> bool {
    self.annotations.contains(STEM)
  }

  /// Overwrites the part-of-speech tag.
  pub fn set_pos(&mut self, pos: impl Into<String>) {
    self.annotations.add(Annotation::trusted(POS, pos.into()));
  }

  /// Overwrites the stem.
  pub fn set_stem(&mut self, stem: impl Into<String>) {
    self.annotations.add(Annotation::trusted(STEM, stem.into()));
  }

  fn string_annotation(&self, annotator: &str) -> Option<&str> {
    self.annotations.get(annotator).and_then(|a| a.str_at(0).ok())
  }
}

impl PartialEq for Token {
  fn eq(&self, other: &Self) -> bool {
    self.text == other.text && self.stem() == other.stem() && self.pos() == other.pos()
  }
}

impl Eq for Token {}

impl Annotable for Token {
  fn identifier(&self) -> String {
    self.text.clone()
  }

  fn annotations(&self) -> &AnnotationTable {
    &self.annotations
  }

  fn annotations_mut(&mut self) -> &mut AnnotationTable {
    &mut self.annotations
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn stem_falls_back_to_lowercased_text() {
    let token = Token::new("Software");
    assert_eq!(token.stem(), "software");
    assert!(!token.has_stem());

    let token = token.with_stem("softwar");
    assert_eq!(token.stem(), "softwar");
    assert!(token.has_stem());
  }

  #[test]
  fn equality_uses_text_stem_and_pos() {
    let a = Token::new("runs").with_pos("VBZ").with_stem("run");
    let b = Token::new("runs").with_pos("VBZ").with_stem("run").with_lemma("run");
    assert_eq!(a, b, "lemma and other annotations are not part of identity");

    let c = Token::new("runs").with_pos("NNS").with_stem("run");
    assert_ne!(a, c);

    let d = Token::new("Runs").with_pos("VBZ").with_stem("run");
    assert_ne!(a, d);
  }

  #[test]
  fn pos_and_lemma_are_annotations() {
    let token = Token::new("engineering").with_pos("NN").with_lemma("engineering");
    assert_eq!(token.pos(), Some("NN"));
    assert_eq!(token.lemma(), Some("engineering"));
    assert!(token.has_annotation(POS));
    assert!(token.has_annotation(LEMMA));
    assert_eq!(token.identifier(), "engineering");
  }

  #[test]
  fn set_pos_overwrites() {
    let mut token = Token::new("book").with_pos("NN");
    token.set_pos("VB");
    assert_eq!(token.pos(), Some("VB"));
    assert_eq!(token.annotations().len(), 1);
  }
}
