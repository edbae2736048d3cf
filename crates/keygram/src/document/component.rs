//! Document component tree
//!
//! A document is a tree of [`DocumentComponent`]s: composites (sections, the document
//! root) own ordered children, sentences (leaves) own tokens and the grams found in them.

use serde::{Deserialize, Serialize};

use crate::config::Language;
use crate::errors::StructureError;
use crate::models::annotation::{Annotable, AnnotationTable};
use crate::models::gram::GramId;
use crate::models::token::Token;

/// Unique identifier of a component within one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(u32);

impl ComponentId {
  /// Wraps a raw id.
  pub const fn new(raw: u32) -> Self {
    Self(raw)
  }

  /// Raw id.
  pub fn get(&self) -> u32 {
    self.0
  }
}

impl std::fmt::Display for ComponentId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// Leaf payload: tokens and the grams registered on this sentence.
#[derive(Debug, Clone, Default)]
pub struct Sentence {
  tokens: Vec<Token>,
  /// One entry per occurrence; the gram objects live in the blackboard registry.
  grams: Vec<GramId>,
}

impl Sentence {
  /// Tokens in order.
  pub fn tokens(&self) -> &[Token] {
    &self.tokens
  }

  /// Mutable tokens, for taggers and stemmers.
  pub fn tokens_mut(&mut self) -> &mut Vec<Token> {
    &mut self.tokens
  }

  /// Grams registered on this sentence, one entry per occurrence.
  pub fn grams(&self) -> &[GramId] {
    &self.grams
  }
}

/// Composite or leaf.
#[derive(Debug, Clone)]
pub enum ComponentKind {
  /// Ordered children, no own tokens or grams.
  Composite(Vec<DocumentComponent>),
  /// Leaf with tokens and grams.
  Sentence(Sentence),
}

/// Node of the document tree.
#[derive(Debug, Clone)]
pub struct DocumentComponent {
  id: ComponentId,
  text: String,
  preprocessed_text: Option<String>,
  language: Option<Language>,
  annotations: AnnotationTable,
  kind: ComponentKind,
}

impl DocumentComponent {
  /// Creates a composite component.
  pub fn composite(
    id: ComponentId,
    text: impl Into<String>,
    children: Vec<DocumentComponent>,
  ) -> Self {
    Self::with_kind(id, text.into(), ComponentKind::Composite(children))
  }

  /// Creates a sentence (leaf) component.
  pub fn sentence(id: ComponentId, text: impl Into<String>, tokens: Vec<Token>) -> Self {
    Self::with_kind(
      id,
      text.into(),
      ComponentKind::Sentence(Sentence {
        tokens,
        grams: Vec::new(),
      }),
    )
  }

  fn with_kind(id: ComponentId, text: String, kind: ComponentKind) -> Self {
    Self {
      id,
      text,
      preprocessed_text: None,
      language: None,
      annotations: AnnotationTable::new(),
      kind,
    }
  }

  /// Builder that sets the language tag.
  #[must_use]
  pub fn with_language(mut self, language: Language) -> Self {
    self.language = Some(language);
    self
  }

  /// Builder that sets the preprocessed text.
  #[must_use]
  pub fn with_preprocessed_text(mut self, text: impl Into<String>) -> Self {
    self.preprocessed_text = Some(text.into());
    self
  }

  /// Identifier.
  pub fn id(&self) -> ComponentId {
    self.id
  }

  /// Raw text.
  pub fn text(&self) -> &str {
    &self.text
  }

  /// Preprocessed text; the raw text when no preprocessing was recorded.
  pub fn preprocessed_text(&self) -> &str {
    self.preprocessed_text.as_deref().unwrap_or(&self.text)
  }

  /// Own language tag.
  pub fn language(&self) -> Option<Language> {
    self.language
  }

  /// Composite or leaf payload.
  pub fn kind(&self) -> &ComponentKind {
    &self.kind
  }

  /// `true` for composites (even an empty one), `false` for sentences.
  pub fn has_children(&self) -> bool {
    matches!(self.kind, ComponentKind::Composite(_))
  }

  /// Direct children; empty for sentences.
  pub fn children(&self) -> &[DocumentComponent] {
    match &self.kind {
      ComponentKind::Composite(children) => children,
      ComponentKind::Sentence(_) => &[],
    }
  }

  /// Appends a child to a composite.
  ///
  /// Does not check id uniqueness; trees loaded into a blackboard grow through
  /// [`Blackboard::add_child`](crate::blackboard::Blackboard::add_child).
  ///
  /// # Errors
  /// `ChildOnSentence` when called on a sentence.
  pub(crate) fn add_child(&mut self, child: DocumentComponent) -> Result<(), StructureError> {
    match &mut self.kind {
      ComponentKind::Composite(children) => {
        children.push(child);
        Ok(())
      }
      ComponentKind::Sentence(_) => Err(StructureError::ChildOnSentence { component: self.id }),
    }
  }

  /// Leaf payload, if this is a sentence.
  pub fn as_sentence(&self) -> Option<&Sentence> {
    match &self.kind {
      ComponentKind::Sentence(sentence) => Some(sentence),
      ComponentKind::Composite(_) => None,
    }
  }

  /// Mutable leaf payload, if this is a sentence.
  pub fn as_sentence_mut(&mut self) -> Option<&mut Sentence> {
    match &mut self.kind {
      ComponentKind::Sentence(sentence) => Some(sentence),
      ComponentKind::Composite(_) => None,
    }
  }

  /// Own tokens; empty for composites.
  pub fn tokens(&self) -> &[Token] {
    self.as_sentence().map(Sentence::tokens).unwrap_or(&[])
  }

  /// Own grams; empty for composites.
  pub fn grams(&self) -> &[GramId] {
    self.as_sentence().map(Sentence::grams).unwrap_or(&[])
  }

  /// Registers a gram occurrence on this sentence.
  ///
  /// # Errors
  /// `GramOnComposite` when called on a composite.
  pub(crate) fn add_gram(&mut self, gram: GramId) -> Result<(), StructureError> {
    match &mut self.kind {
      ComponentKind::Sentence(sentence) => {
        sentence.grams.push(gram);
        Ok(())
      }
      ComponentKind::Composite(_) => Err(StructureError::GramOnComposite { component: self.id }),
    }
  }

  /// Drops every gram entry in the subtree. Ids from another registry are meaningless here.
  pub(crate) fn clear_grams(&mut self) {
    match &mut self.kind {
      ComponentKind::Sentence(sentence) => sentence.grams.clear(),
      ComponentKind::Composite(children) => children.iter_mut().for_each(Self::clear_grams),
    }
  }

  /// Removes every occurrence of `gram` from this sentence and returns how many were removed.
  ///
  /// # Errors
  /// `GramRemovalOnComposite` when called on a composite.
  pub fn remove_gram(&mut self, gram: GramId) -> Result<usize, StructureError> {
    match &mut self.kind {
      ComponentKind::Sentence(sentence) => {
        let before = sentence.grams.len();
        sentence.grams.retain(|g| *g != gram);
        Ok(before - sentence.grams.len())
      }
      ComponentKind::Composite(_) => {
        Err(StructureError::GramRemovalOnComposite { component: self.id })
      }
    }
  }

  // ===== Traversal =====

  /// Sentences under this component (itself if it is one), in document order.
  pub fn sentences(&self) -> Vec<&DocumentComponent> {
    let mut out = Vec::new();
    self.collect_sentences(&mut out);
    out
  }

  fn collect_sentences<'a>(&'a self, out: &mut Vec<&'a DocumentComponent>) {
    match &self.kind {
      ComponentKind::Sentence(_) => out.push(self),
      ComponentKind::Composite(children) => {
        for child in children {
          child.collect_sentences(out);
        }
      }
    }
  }

  /// Ids of the sentences under this component, in document order.
  pub fn sentence_ids(&self) -> Vec<ComponentId> {
    self.sentences().into_iter().map(DocumentComponent::id).collect()
  }

  /// All tokens under this component, in document order.
  pub fn all_tokens(&self) -> Vec<&Token> {
    self.sentences().into_iter().flat_map(|s| s.tokens().iter()).collect()
  }

  /// All gram occurrences under this component, in document order.
  pub fn all_grams(&self) -> Vec<GramId> {
    self.sentences().into_iter().flat_map(|s| s.grams().iter().copied()).collect()
  }

  /// Ids of every component in the subtree (pre-order).
  pub fn ids(&self) -> Vec<ComponentId> {
    let mut out = vec![self.id];
    for child in self.children() {
      out.extend(child.ids());
    }
    out
  }

  /// Finds a component in the subtree.
  pub fn find(&self, id: ComponentId) -> Option<&DocumentComponent> {
    if self.id == id {
      return Some(self);
    }
    self.children().iter().find_map(|child| child.find(id))
  }

  /// Finds a component in the subtree (mutable).
  pub fn find_mut(&mut self, id: ComponentId) -> Option<&mut DocumentComponent> {
    if self.id == id {
      return Some(self);
    }
    match &mut self.kind {
      ComponentKind::Composite(children) => children.iter_mut().find_map(|c| c.find_mut(id)),
      ComponentKind::Sentence(_) => None,
    }
  }

  /// Effective language of a component: its own tag or the nearest ancestor's.
  pub fn language_of(&self, id: ComponentId) -> Option<Language> {
    self.language_of_inner(id, None).flatten()
  }

  /// `None` = not found in this subtree, `Some(lang)` = found with effective language.
  fn language_of_inner(
    &self,
    id: ComponentId,
    inherited: Option<Language>,
  ) -> Option<Option<Language>> {
    let effective = self.language.or(inherited);
    if self.id == id {
      return Some(effective);
    }
    self.children().iter().find_map(|child| child.language_of_inner(id, effective))
  }
}

impl Annotable for DocumentComponent {
  fn identifier(&self) -> String {
    self.id.to_string()
  }

  fn annotations(&self) -> &AnnotationTable {
    &self.annotations
  }

  fn annotations_mut(&mut self) -> &mut AnnotationTable {
    &mut self.annotations
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test Module
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn sample_tree() -> DocumentComponent {
    let s1 = DocumentComponent::sentence(
      ComponentId::new(2),
      "Rust is fast.",
      vec![Token::new("Rust"), Token::new("is"), Token::new("fast")],
    );
    let s2 = DocumentComponent::sentence(ComponentId::new(3), "Really.", vec![Token::new("Really")])
      .with_language(Language::En);
    let section = DocumentComponent::composite(ComponentId::new(1), "Rust is fast. Really.", vec![s1, s2]);
    let s3 = DocumentComponent::sentence(ComponentId::new(5), "東京です", vec![Token::new("東京")])
      .with_language(Language::Ja);
    let section2 = DocumentComponent::composite(ComponentId::new(4), "東京です", vec![s3]);
    DocumentComponent::composite(ComponentId::new(0), "whole", vec![section, section2])
      .with_language(Language::En)
  }

  #[test]
  fn has_children_distinguishes_composites() {
    let tree = sample_tree();
    assert!(tree.has_children());
    assert!(!tree.find(ComponentId::new(2)).unwrap().has_children());

    let empty = DocumentComponent::composite(ComponentId::new(9), "", Vec::new());
    assert!(empty.has_children());
  }

  #[test]
  fn sentences_are_in_document_order() {
    let tree = sample_tree();
    assert_eq!(
      tree.sentence_ids(),
      vec![ComponentId::new(2), ComponentId::new(3), ComponentId::new(5)]
    );
    let texts: Vec<_> = tree.all_tokens().iter().map(|t| t.text().to_string()).collect();
    assert_eq!(texts, vec!["Rust", "is", "fast", "Really", "東京"]);
  }

  #[test]
  fn ids_are_pre_order() {
    let tree = sample_tree();
    let ids: Vec<u32> = tree.ids().iter().map(ComponentId::get).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
  }

  #[test]
  fn adding_gram_to_composite_fails() {
    let mut tree = sample_tree();
    let err = tree.add_gram(GramId(0)).unwrap_err();
    assert_eq!(
      err,
      StructureError::GramOnComposite {
        component: ComponentId::new(0)
      }
    );
    let err = tree.remove_gram(GramId(0)).unwrap_err();
    assert!(matches!(err, StructureError::GramRemovalOnComposite { .. }));
  }

  #[test]
  fn sentence_grams_track_every_occurrence() {
    let mut tree = sample_tree();
    let sentence = tree.find_mut(ComponentId::new(2)).unwrap();
    sentence.add_gram(GramId(0)).unwrap();
    sentence.add_gram(GramId(1)).unwrap();
    sentence.add_gram(GramId(0)).unwrap();
    assert_eq!(sentence.grams(), &[GramId(0), GramId(1), GramId(0)]);

    assert_eq!(sentence.remove_gram(GramId(0)).unwrap(), 2);
    assert_eq!(sentence.grams(), &[GramId(1)]);
    assert_eq!(tree.all_grams(), vec![GramId(1)]);
  }

  #[test]
  fn add_child_only_on_composites() {
    let mut tree = sample_tree();
    let extra = DocumentComponent::sentence(ComponentId::new(6), "x", vec![]);
    tree.add_child(extra.clone()).unwrap();
    assert_eq!(tree.children().len(), 3);

    let sentence = tree.find_mut(ComponentId::new(6)).unwrap();
    let err = sentence.add_child(extra).unwrap_err();
    assert!(matches!(err, StructureError::ChildOnSentence { .. }));
  }

  #[test]
  fn language_is_inherited_from_ancestors() {
    let tree = sample_tree();
    assert_eq!(tree.language_of(ComponentId::new(2)), Some(Language::En));
    assert_eq!(tree.language_of(ComponentId::new(5)), Some(Language::Ja));
    assert_eq!(tree.language_of(ComponentId::new(42)), None);

    let untagged = DocumentComponent::sentence(ComponentId::new(0), "x", vec![]);
    assert_eq!(untagged.language_of(ComponentId::new(0)), None);
  }

  #[test]
  fn preprocessed_text_falls_back_to_raw_text() {
    let s = DocumentComponent::sentence(ComponentId::new(0), "Raw  text", vec![]);
    assert_eq!(s.preprocessed_text(), "Raw  text");
    let s = s.with_preprocessed_text("raw text");
    assert_eq!(s.preprocessed_text(), "raw text");
    assert_eq!(s.text(), "Raw  text");
  }

  #[test]
  fn identifier_is_component_id() {
    let s = DocumentComponent::sentence(ComponentId::new(7), "x", vec![]);
    assert_eq!(s.identifier(), "#7");
  }
}
