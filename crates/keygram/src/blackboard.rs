//! Blackboard: per-document shared state
//!
//! Holds the document tree and the canonical gram registry. Every candidate found by a
//! generator goes through [`Blackboard::add_gram`], which guarantees that one signature maps
//! to exactly one canonical [`Gram`] no matter how many times it occurs.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::document::{ComponentId, DocumentComponent};
use crate::errors::{KeygramResult, StructureError};
use crate::models::annotation::{Annotable, AnnotationTable};
use crate::models::gram::{Gram, GramId};

/// Per-document shared state.
///
/// Grams live in a slab indexed by [`GramId`]; sentences only store ids. Removed grams leave an
/// empty slot so ids handed out earlier never point at a different gram.
#[derive(Debug, Default)]
pub struct Blackboard {
  raw_text: String,
  root: Option<DocumentComponent>,
  grams: Vec<Option<Gram>>,
  index: HashMap<String, GramId>,
  annotations: AnnotationTable,
}

impl Blackboard {
  /// Creates an empty blackboard with no document loaded.
  pub fn new() -> Self {
    Self::default()
  }

  /// Loads a document, discarding every gram and annotation of the previous one.
  ///
  /// # Errors
  /// `DuplicateComponentId` if two components of the tree share an id. The previous state is
  /// kept in that case.
  pub fn create_document(
    &mut self,
    raw_text: impl Into<String>,
    root: DocumentComponent,
  ) -> Result<(), StructureError> {
    let mut seen = HashSet::new();
    for id in root.ids() {
      if !seen.insert(id) {
        return Err(StructureError::DuplicateComponentId { component: id });
      }
    }

    self.raw_text = raw_text.into();
    self.root = Some(root);
    self.grams.clear();
    self.index.clear();
    self.annotations = AnnotationTable::new();
    Ok(())
  }

  /// Raw text of the loaded document.
  pub fn raw_text(&self) -> &str {
    &self.raw_text
  }

  /// Root of the document tree, if a document is loaded.
  pub fn root(&self) -> Option<&DocumentComponent> {
    self.root.as_ref()
  }

  /// Looks up a component of the loaded document.
  ///
  /// # Errors
  /// `NoDocument` or `ComponentNotFound`.
  pub fn component(&self, id: ComponentId) -> Result<&DocumentComponent, StructureError> {
    self
      .root
      .as_ref()
      .ok_or(StructureError::NoDocument)?
      .find(id)
      .ok_or(StructureError::ComponentNotFound { component: id })
  }

  /// Mutable variant of [`component`](Self::component).
  ///
  /// Gram lists and children cannot be edited through this handle; use
  /// [`add_gram`](Self::add_gram), [`remove_gram`](Self::remove_gram) and
  /// [`add_child`](Self::add_child).
  pub fn component_mut(
    &mut self,
    id: ComponentId,
  ) -> Result<&mut DocumentComponent, StructureError> {
    self
      .root
      .as_mut()
      .ok_or(StructureError::NoDocument)?
      .find_mut(id)
      .ok_or(StructureError::ComponentNotFound { component: id })
  }

  /// Appends `child` (and its subtree) under the composite `parent` of the loaded document.
  ///
  /// Gram entries carried by `child` are dropped; grams enter the document only through
  /// [`add_gram`](Self::add_gram). The tree is unchanged on error.
  ///
  /// # Errors
  /// - `NoDocument` or `ComponentNotFound` for `parent`
  /// - `DuplicateComponentId` if an id of the subtree is already in the document or repeats
  ///   inside the subtree
  /// - `ChildOnSentence` if `parent` is a sentence
  pub fn add_child(
    &mut self,
    parent: ComponentId,
    mut child: DocumentComponent,
  ) -> Result<(), StructureError> {
    let root = self.root.as_mut().ok_or(StructureError::NoDocument)?;
    let mut seen: HashSet<ComponentId> = root.ids().into_iter().collect();
    for id in child.ids() {
      if !seen.insert(id) {
        return Err(StructureError::DuplicateComponentId { component: id });
      }
    }

    let target = root
      .find_mut(parent)
      .ok_or(StructureError::ComponentNotFound { component: parent })?;
    child.clear_grams();
    debug!(parent = %parent, child = %child.id(), "appending component");
    target.add_child(child)
  }

  // ===== Gram registry =====

  /// Registers one gram occurrence found in `component` and returns the canonical id.
  ///
  /// Unknown signatures make `gram` canonical. Known signatures merge `gram` into the
  /// canonical one (see [`Gram`] merge rules): annotations and features already present on
  /// the canonical gram win, surfaces accumulate counts.
  ///
  /// # Errors
  /// - `NoDocument` if no document is loaded
  /// - `ComponentNotFound` if `component` is not in the tree
  /// - `GramOnComposite` if `component` is not a sentence
  ///
  /// The registry is left untouched on error.
  pub fn add_gram(&mut self, component: ComponentId, gram: Gram) -> KeygramResult<GramId> {
    let root = self.root.as_mut().ok_or(StructureError::NoDocument)?;
    let sentence = root
      .find_mut(component)
      .ok_or(StructureError::ComponentNotFound { component })?;
    if sentence.has_children() {
      return Err(StructureError::GramOnComposite { component }.into());
    }

    let id = match self.index.get(gram.signature()).copied() {
      Some(id) => {
        debug!(signature = gram.signature(), component = %component, "merging gram occurrence");
        if let Some(canonical) = self.grams[id.0].as_mut() {
          canonical.absorb(gram);
        }
        id
      }
      None => {
        let id = GramId(self.grams.len());
        debug!(signature = gram.signature(), component = %component, "registering new gram");
        self.index.insert(gram.signature().to_string(), id);
        self.grams.push(Some(gram));
        id
      }
    };

    if let Some(canonical) = self.grams[id.0].as_mut() {
      canonical.add_appearance(component);
    }
    sentence.add_gram(id)?;
    Ok(id)
  }

  /// Drops a gram from the registry and from every sentence that referenced it.
  ///
  /// Returns the removed gram, or `None` if the signature is unknown.
  pub fn remove_gram(&mut self, signature: &str) -> Option<Gram> {
    let id = self.index.remove(signature)?;
    if let Some(root) = self.root.as_mut() {
      for sentence_id in root.sentence_ids() {
        if let Some(sentence) = root.find_mut(sentence_id) {
          // sentences only, so this cannot fail
          let _ = sentence.remove_gram(id);
        }
      }
    }
    self.grams.get_mut(id.0).and_then(Option::take)
  }

  /// Canonical gram by id.
  pub fn gram(&self, id: GramId) -> Option<&Gram> {
    self.grams.get(id.0).and_then(Option::as_ref)
  }

  /// Mutable canonical gram by id, for annotators writing features.
  pub fn gram_mut(&mut self, id: GramId) -> Option<&mut Gram> {
    self.grams.get_mut(id.0).and_then(Option::as_mut)
  }

  /// Id of the canonical gram for a signature.
  pub fn gram_id(&self, signature: &str) -> Option<GramId> {
    self.index.get(signature).copied()
  }

  /// Canonical gram for a signature.
  pub fn gram_by_signature(&self, signature: &str) -> Option<&Gram> {
    self.gram_id(signature).and_then(|id| self.gram(id))
  }

  /// Canonical grams in insertion order.
  pub fn grams(&self) -> impl Iterator<Item = (GramId, &Gram)> {
    self
      .grams
      .iter()
      .enumerate()
      .filter_map(|(i, slot)| slot.as_ref().map(|g| (GramId(i), g)))
  }

  /// Ids of the canonical grams in insertion order.
  pub fn gram_ids(&self) -> Vec<GramId> {
    self.grams().map(|(id, _)| id).collect()
  }

  /// Number of canonical grams.
  pub fn gram_count(&self) -> usize {
    self.index.len()
  }

  // ===== Document-wide annotations =====

  /// Annotations attached to the document as a whole.
  pub fn document_annotations(&self) -> &AnnotationTable {
    &self.annotations
  }

  /// Mutable document-wide annotations.
  pub fn document_annotations_mut(&mut self) -> &mut AnnotationTable {
    &mut self.annotations
  }
}

impl Annotable for Blackboard {
  fn identifier(&self) -> String {
    self
      .root
      .as_ref()
      .map(|root| root.id().to_string())
      .unwrap_or_default()
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
  use crate::errors::KeygramError;
  use crate::models::annotation::Annotation;
  use crate::models::gram::{NOUN_VALUE, WIKIFLAG};
  use crate::models::token::Token;

  // ─── Test Helpers ─────────────────────────────────────────────────────

  const ROOT: ComponentId = ComponentId::new(0);
  const S1: ComponentId = ComponentId::new(1);
  const S2: ComponentId = ComponentId::new(2);

  fn loaded() -> Blackboard {
    let s1 = DocumentComponent::sentence(S1, "Software engineering.", vec![]);
    let s2 = DocumentComponent::sentence(S2, "Software Engineering!", vec![]);
    let root = DocumentComponent::composite(ROOT, "doc", vec![s1, s2]);

    let mut bb = Blackboard::new();
    bb.create_document("doc", root).unwrap();
    bb
  }

  fn gram(words: &[&str]) -> Gram {
    let tokens = words
      .iter()
      .map(|w| Token::new(*w).with_pos("NN").with_stem(w.to_lowercase()))
      .collect();
    Gram::from_tokens(tokens, " ")
  }

  // ─── Registry ─────────────────────────────────────────────────────────

  #[test]
  fn same_signature_yields_one_canonical_gram() {
    let mut bb = loaded();
    let a = bb.add_gram(S1, gram(&["software", "engineering"])).unwrap();
    let b = bb.add_gram(S2, gram(&["Software", "Engineering"])).unwrap();

    assert_eq!(a, b);
    assert_eq!(bb.gram_count(), 1);

    let canonical = bb.gram(a).unwrap();
    assert_eq!(canonical.surfaces().len(), 2);
    assert_eq!(canonical.appearances(), &[S1, S2]);
    assert_eq!(bb.component(S1).unwrap().grams(), &[a]);
    assert_eq!(bb.component(S2).unwrap().grams(), &[a]);
  }

  #[test]
  fn multi_word_token_does_not_merge_with_token_pair() {
    let mut bb = loaded();
    let single = Gram::from_tokens(vec![Token::new("New York").with_pos("NNP")], " ")
      .with_feature(NOUN_VALUE, 1.0);
    let pair = Gram::from_tokens(
      vec![Token::new("New").with_pos("NNP"), Token::new("York").with_pos("NNP")],
      " ",
    )
    .with_feature(NOUN_VALUE, 2.0);

    let a = bb.add_gram(S1, single).unwrap();
    let b = bb.add_gram(S2, pair).unwrap();

    assert_ne!(a, b);
    assert_eq!(bb.gram_count(), 2);
    let pair = bb.gram_by_signature("new york").unwrap();
    assert_eq!(pair.tokens().len(), 2);
    assert_eq!(pair.feature(NOUN_VALUE), Some(2.0));
  }

  #[test]
  fn repeated_occurrence_in_one_sentence_is_listed_twice() {
    let mut bb = loaded();
    let id = bb.add_gram(S1, gram(&["graph"])).unwrap();
    bb.add_gram(S1, gram(&["graph"])).unwrap();

    assert_eq!(bb.component(S1).unwrap().grams(), &[id, id]);
    assert_eq!(bb.gram(id).unwrap().appearances(), &[S1]);
    assert_eq!(bb.gram(id).unwrap().occurrences(), 2);
  }

  #[test]
  fn merge_keeps_canonical_features_and_annotations() {
    let mut bb = loaded();
    let mut first = gram(&["graph"]).with_feature(NOUN_VALUE, 1.0);
    first.add_annotation(Annotation::single("source", "first").unwrap());
    let id = bb.add_gram(S1, first).unwrap();

    let mut second = gram(&["graph"]).with_feature(NOUN_VALUE, 9.0).with_feature(WIKIFLAG, 1.0);
    second.add_annotation(Annotation::single("source", "second").unwrap());
    second.add_annotation(Annotation::single("extra", 2.0).unwrap());
    bb.add_gram(S2, second).unwrap();

    let canonical = bb.gram(id).unwrap();
    assert_eq!(canonical.feature(NOUN_VALUE), Some(1.0));
    assert_eq!(canonical.feature(WIKIFLAG), Some(1.0));
    assert_eq!(canonical.get_annotation("source").unwrap().str_at(0).unwrap(), "first");
    assert_eq!(canonical.get_annotation("extra").unwrap().num_at(0).unwrap(), 2.0);
  }

  #[test]
  fn add_gram_to_composite_leaves_registry_untouched() {
    let mut bb = loaded();
    let err = bb.add_gram(ROOT, gram(&["graph"])).unwrap_err();
    assert!(matches!(
      err,
      KeygramError::Structure(StructureError::GramOnComposite { .. })
    ));
    assert_eq!(bb.gram_count(), 0);
  }

  #[test]
  fn add_gram_to_unknown_component_fails() {
    let mut bb = loaded();
    let err = bb.add_gram(ComponentId::new(99), gram(&["graph"])).unwrap_err();
    assert!(matches!(
      err,
      KeygramError::Structure(StructureError::ComponentNotFound { .. })
    ));
  }

  #[test]
  fn add_gram_without_document_fails() {
    let mut bb = Blackboard::new();
    let err = bb.add_gram(S1, gram(&["graph"])).unwrap_err();
    assert!(matches!(
      err,
      KeygramError::Structure(StructureError::NoDocument)
    ));
  }

  #[test]
  fn grams_iterate_in_insertion_order() {
    let mut bb = loaded();
    bb.add_gram(S1, gram(&["zeta"])).unwrap();
    bb.add_gram(S1, gram(&["alpha"])).unwrap();
    bb.add_gram(S2, gram(&["zeta"])).unwrap();

    let signatures: Vec<_> = bb.grams().map(|(_, g)| g.signature().to_string()).collect();
    assert_eq!(signatures, vec!["zeta", "alpha"]);
  }

  #[test]
  fn remove_gram_clears_sentences() {
    let mut bb = loaded();
    let zeta = bb.add_gram(S1, gram(&["zeta"])).unwrap();
    let alpha = bb.add_gram(S1, gram(&["alpha"])).unwrap();
    bb.add_gram(S2, gram(&["zeta"])).unwrap();

    let removed = bb.remove_gram("zeta").unwrap();
    assert_eq!(removed.occurrences(), 2);
    assert!(bb.gram(zeta).is_none());
    assert!(bb.gram_by_signature("zeta").is_none());
    assert_eq!(bb.component(S1).unwrap().grams(), &[alpha]);
    assert!(bb.component(S2).unwrap().grams().is_empty());
    assert!(bb.remove_gram("zeta").is_none());

    // a new occurrence gets a fresh canonical gram
    let again = bb.add_gram(S2, gram(&["zeta"])).unwrap();
    assert_ne!(again, zeta);
    assert_eq!(bb.gram_ids(), vec![alpha, again]);
  }

  // ─── Document lifecycle ───────────────────────────────────────────────

  #[test]
  fn create_document_discards_previous_state() {
    let mut bb = loaded();
    bb.add_gram(S1, gram(&["graph"])).unwrap();
    bb.document_annotations_mut().add(Annotation::single("lang", "en").unwrap());

    let root = DocumentComponent::composite(ROOT, "other", vec![]);
    bb.create_document("other", root).unwrap();

    assert_eq!(bb.raw_text(), "other");
    assert_eq!(bb.gram_count(), 0);
    assert!(bb.document_annotations().is_empty());
    assert!(bb.component(S1).is_err());
  }

  #[test]
  fn create_document_rejects_duplicate_ids() {
    let mut bb = loaded();
    let s = DocumentComponent::sentence(S1, "a", vec![]);
    let root = DocumentComponent::composite(ROOT, "dup", vec![s.clone(), s]);

    let err = bb.create_document("dup", root).unwrap_err();
    assert_eq!(err, StructureError::DuplicateComponentId { component: S1 });
    // previous document still loaded
    assert!(bb.component(S2).is_ok());
  }

  #[test]
  fn add_child_extends_loaded_document() {
    let mut bb = loaded();
    let s3 = ComponentId::new(3);
    bb.add_child(ROOT, DocumentComponent::sentence(s3, "Graphs.", vec![])).unwrap();

    assert_eq!(bb.root().unwrap().sentence_ids(), vec![S1, S2, s3]);
    let id = bb.add_gram(s3, gram(&["graph"])).unwrap();
    assert_eq!(bb.component(s3).unwrap().grams(), &[id]);
  }

  #[test]
  fn add_child_rejects_id_already_in_document() {
    let mut bb = loaded();
    let dup = DocumentComponent::sentence(S1, "again", vec![]);

    let err = bb.add_child(ROOT, dup).unwrap_err();
    assert_eq!(err, StructureError::DuplicateComponentId { component: S1 });
    // tree untouched, grams still land on the original sentence
    assert_eq!(bb.root().unwrap().sentence_ids(), vec![S1, S2]);
    let id = bb.add_gram(S1, gram(&["graph"])).unwrap();
    assert_eq!(bb.component(S1).unwrap().grams(), &[id]);
    assert_eq!(bb.component(S1).unwrap().text(), "Software engineering.");
  }

  #[test]
  fn add_child_rejects_duplicates_inside_subtree() {
    let mut bb = loaded();
    let s = DocumentComponent::sentence(ComponentId::new(4), "a", vec![]);
    let section = DocumentComponent::composite(ComponentId::new(3), "sec", vec![s.clone(), s]);

    let err = bb.add_child(ROOT, section).unwrap_err();
    assert_eq!(
      err,
      StructureError::DuplicateComponentId {
        component: ComponentId::new(4)
      }
    );
    assert_eq!(bb.root().unwrap().children().len(), 2);
  }

  #[test]
  fn add_child_checks_parent() {
    let mut bb = loaded();
    let child = || DocumentComponent::sentence(ComponentId::new(7), "x", vec![]);

    assert_eq!(
      bb.add_child(S1, child()).unwrap_err(),
      StructureError::ChildOnSentence { component: S1 }
    );
    assert_eq!(
      bb.add_child(ComponentId::new(99), child()).unwrap_err(),
      StructureError::ComponentNotFound {
        component: ComponentId::new(99)
      }
    );
    assert_eq!(
      Blackboard::new().add_child(ROOT, child()).unwrap_err(),
      StructureError::NoDocument
    );
  }

  #[test]
  fn add_child_drops_foreign_gram_entries() {
    let mut other = loaded();
    other.add_gram(S1, gram(&["graph"])).unwrap();
    let copied = other.component(S1).unwrap().clone();
    assert_eq!(copied.grams().len(), 1);
    let section = DocumentComponent::composite(ComponentId::new(3), "sec", vec![copied]);

    let mut bb = Blackboard::new();
    bb.create_document("", DocumentComponent::composite(ROOT, "", vec![])).unwrap();
    bb.add_child(ROOT, section).unwrap();
    assert!(bb.component(S1).unwrap().grams().is_empty());
  }

  #[test]
  fn component_lookup_without_document() {
    let bb = Blackboard::new();
    assert_eq!(bb.component(ROOT).unwrap_err(), StructureError::NoDocument);
    assert!(bb.root().is_none());
  }
}
