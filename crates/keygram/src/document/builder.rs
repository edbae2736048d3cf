//! Allocates component ids while a document tree is being assembled.

use crate::document::component::{ComponentId, DocumentComponent};
use crate::models::token::Token;

/// Hands out sequential [`ComponentId`]s so that every component of one document is unique.
///
/// # Examples
/// ```
/// use keygram::document::DocumentBuilder;
/// use keygram::models::Token;
///
/// let mut builder = DocumentBuilder::new();
/// let s1 = builder.sentence("Rust is fast", vec![Token::new("Rust").with_pos("NNP")]);
/// let s2 = builder.sentence("It is safe", vec![Token::new("It").with_pos("PRP")]);
/// let root = builder.composite("Rust is fast. It is safe", vec![s1, s2]);
/// assert_eq!(root.sentences().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct DocumentBuilder {
  next_id: u32,
}

impl DocumentBuilder {
  /// Creates a builder starting at id 0.
  pub fn new() -> Self {
    Self::default()
  }

  /// Allocates the next id.
  pub fn next_id(&mut self) -> ComponentId {
    let id = ComponentId::new(self.next_id);
    self.next_id += 1;
    id
  }

  /// Creates a sentence with a fresh id.
  pub fn sentence(&mut self, text: impl Into<String>, tokens: Vec<Token>) -> DocumentComponent {
    let id = self.next_id();
    DocumentComponent::sentence(id, text, tokens)
  }

  /// Creates a composite with a fresh id.
  pub fn composite(
    &mut self,
    text: impl Into<String>,
    children: Vec<DocumentComponent>,
  ) -> DocumentComponent {
    let id = self.next_id();
    DocumentComponent::composite(id, text, children)
  }
}
