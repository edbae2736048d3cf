//! Gram / keyphrase model
//!
//! A [`Gram`] is a candidate phrase identified by its stemmed signature. It keeps every
//! surface form it was observed with, so the same object also serves as the output keyphrase.

use std::collections::HashMap;

use crate::document::ComponentId;
use crate::models::annotation::{Annotable, AnnotationTable};
use crate::models::token::Token;

/// Score written by the linear evaluator.
pub const SCORE: &str = "Score";
/// Normalized index of the last sentence the gram appeared in.
pub const DEPTH: &str = "Depth";
/// `1 - depth` of the first occurrence.
pub const HEIGHT: &str = "Height";
/// Occurrence count.
pub const FREQUENCY: &str = "Freq";
/// Normalized span between first and last occurrence.
pub const LIFESPAN: &str = "LifeSpan";
/// Number of noun-class tags in the POS pattern that produced the gram.
pub const NOUN_VALUE: &str = "NounValue";
/// Knowledge-base flag, written by external annotators.
pub const WIKIFLAG: &str = "Wikiflag";

/// Feature names owned by the engine. External annotators should not write them
/// unless they mean to overwrite them.
pub const RESERVED_FEATURES: [&str; 7] =
  [SCORE, DEPTH, HEIGHT, FREQUENCY, LIFESPAN, NOUN_VALUE, WIKIFLAG];

/// Separator between token stems in a signature.
const SIGNATURE_SEPARATOR: &str = " ";

/// Escape prefix for characters that would make stem boundaries ambiguous.
const SIGNATURE_ESCAPE: char = '%';

/// Handle of a canonical gram inside a [`Blackboard`](crate::blackboard::Blackboard).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GramId(pub(crate) usize);

impl GramId {
  /// Slot index in the registry.
  pub fn index(&self) -> usize {
    self.0
  }
}

/// One observed surface form of a gram.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
  text: String,
  tokens: Vec<Token>,
  count: usize,
}

impl Surface {
  /// Literal text as it appeared in the document.
  pub fn text(&self) -> &str {
    &self.text
  }

  /// Tokens of this surface.
  pub fn tokens(&self) -> &[Token] {
    &self.tokens
  }

  /// How many occurrences used this surface.
  pub fn count(&self) -> usize {
    self.count
  }
}

/// Candidate phrase.
#[derive(Debug, Clone)]
pub struct Gram {
  signature: String,
  surfaces: Vec<Surface>,
  features: HashMap<String, f64>,
  annotations: AnnotationTable,
  appearances: Vec<ComponentId>,
}

impl Gram {
  /// Creates a gram from one occurrence.
  ///
  /// The signature is derived from the token stems.
  pub fn new(surface: impl Into<String>, tokens: Vec<Token>) -> Self {
    let signature = Self::signature_of(&tokens);
    Self {
      signature,
      surfaces: vec![Surface {
        text: surface.into(),
        tokens,
        count: 1,
      }],
      features: HashMap::new(),
      annotations: AnnotationTable::new(),
      appearances: Vec::new(),
    }
  }

  /// Creates a gram whose surface is the token texts joined by `separator`.
  pub fn from_tokens(tokens: Vec<Token>, separator: &str) -> Self {
    let surface = tokens.iter().map(Token::text).collect::<Vec<_>>().join(separator);
    Self::new(surface, tokens)
  }

  /// Signature for a token sequence: lowercased stems joined by a single space.
  ///
  /// Whitespace and `%` inside a stem are written as `%XXXX` (hex code point), so the
  /// single token `New York` and the pair `New`, `York` get different signatures.
  pub fn signature_of(tokens: &[Token]) -> String {
    tokens
      .iter()
      .map(|t| escape_stem(&t.stem().to_lowercase()))
      .collect::<Vec<_>>()
      .join(SIGNATURE_SEPARATOR)
  }

  /// Builder that sets a feature.
  #[must_use]
  pub fn with_feature(mut self, name: impl Into<String>, value: f64) -> Self {
    self.set_feature(name, value);
    self
  }

  /// Identity key.
  pub fn signature(&self) -> &str {
    &self.signature
  }

  /// Displayed surface: the most frequent one, earliest inserted on ties.
  pub fn surface(&self) -> &str {
    let mut best = &self.surfaces[0];
    for candidate in &self.surfaces[1..] {
      if candidate.count > best.count {
        best = candidate;
      }
    }
    &best.text
  }

  /// All observed surfaces in insertion order.
  pub fn surfaces(&self) -> &[Surface] {
    &self.surfaces
  }

  /// Canonical token sequence (tokens of the first surface).
  pub fn tokens(&self) -> &[Token] {
    &self.surfaces[0].tokens
  }

  /// Number of tokens.
  pub fn len(&self) -> usize {
    self.tokens().len()
  }

  /// Whether the gram has no tokens.
  pub fn is_empty(&self) -> bool {
    self.tokens().is_empty()
  }

  /// Total number of merged occurrences.
  pub fn occurrences(&self) -> usize {
    self.surfaces.iter().map(Surface::count).sum()
  }

  /// Feature table.
  pub fn features(&self) -> &HashMap<String, f64> {
    &self.features
  }

  /// Value of a feature.
  pub fn feature(&self, name: &str) -> Option<f64> {
    self.features.get(name).copied()
  }

  /// Sets a feature, overwriting the previous value.
  pub fn set_feature(&mut self, name: impl Into<String>, value: f64) {
    self.features.insert(name.into(), value);
  }

  /// Components where the gram occurred, without duplicates, in first-seen order.
  pub fn appearances(&self) -> &[ComponentId] {
    &self.appearances
  }

  pub(crate) fn add_appearance(&mut self, component: ComponentId) {
    if !self.appearances.contains(&component) {
      self.appearances.push(component);
    }
  }

  /// Merges another occurrence with the same signature into this canonical gram.
  ///
  /// - token annotations: copied position by position, first writer wins per annotator id
  /// - surfaces: counts add up for identical text, new text is appended
  /// - features / gram annotations: only names missing here are taken over
  pub(crate) fn absorb(&mut self, occurrence: Gram) {
    debug_assert_eq!(self.signature, occurrence.signature);

    let canonical = &mut self.surfaces[0].tokens;
    for surface in &occurrence.surfaces {
      for (canonical_token, token) in canonical.iter_mut().zip(&surface.tokens) {
        for annotation in token.annotations().iter() {
          canonical_token.annotations_mut().add_if_absent(annotation.clone());
        }
      }
    }

    for surface in occurrence.surfaces {
      match self.surfaces.iter_mut().find(|s| s.text == surface.text) {
        Some(existing) => existing.count += surface.count,
        None => self.surfaces.push(surface),
      }
    }

    for (name, value) in occurrence.features {
      self.features.entry(name).or_insert(value);
    }

    for annotation in occurrence.annotations.iter() {
      self.annotations.add_if_absent(annotation.clone());
    }
  }
}

fn escape_stem(stem: &str) -> String {
  let mut out = String::with_capacity(stem.len());
  for c in stem.chars() {
    if c == SIGNATURE_ESCAPE || c.is_whitespace() {
      out.push_str(&format!("{SIGNATURE_ESCAPE}{:04X}", u32::from(c)));
    } else {
      out.push(c);
    }
  }
  out
}

impl Annotable for Gram {
  fn identifier(&self) -> String {
    self.signature.clone()
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
