//! Annotation store
//!
//! Every annotable entity (token, sentence/section, gram) carries an
//! [`AnnotationTable`]: annotator id → typed value list. The set of annotators is open,
//! so the table is keyed by strings and validated on insertion instead of using fixed fields.

use serde::{Deserialize, Serialize};

use crate::errors::AnnotationError;

/// Annotator ids that collide with system columns when annotations are flattened.
pub const RESERVED_ANNOTATOR_IDS: [&str; 3] = ["id", "annotator", "name"];

/// Column that receives [`Annotable::identifier`] in [`to_row`].
pub const ID_COLUMN: &str = "id";

/// Separator between an annotator id and a value index in flattened column names (`pos$0`).
pub const COLUMN_INDEX_SEPARATOR: char = '$';

/// A single annotation value: either a string or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
  /// String value
  Str(String),
  /// Numeric value
  Num(f64),
}

impl Value {
  /// Type name used in error messages.
  pub fn kind_name(&self) -> &'static str {
    match self {
      Value::Str(_) => "string",
      Value::Num(_) => "number",
    }
  }

  /// Returns the string if this is a [`Value::Str`].
  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::Str(s) => Some(s),
      Value::Num(_) => None,
    }
  }

  /// Returns the number if this is a [`Value::Num`].
  pub fn as_num(&self) -> Option<f64> {
    match self {
      Value::Str(_) => None,
      Value::Num(n) => Some(*n),
    }
  }
}

impl From<&str> for Value {
  fn from(s: &str) -> Self {
    Value::Str(s.to_string())
  }
}

impl From<String> for Value {
  fn from(s: String) -> Self {
    Value::Str(s)
  }
}

impl From<f64> for Value {
  fn from(n: f64) -> Self {
    Value::Num(n)
  }
}

impl std::fmt::Display for Value {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Value::Str(s) => write!(f, "{s}"),
      Value::Num(n) => write!(f, "{n}"),
    }
  }
}

/// Checks an annotator id against the reserved names and forbidden characters.
///
/// # Errors
/// - `EmptyName` for `""`
/// - `ReservedName` for `id`, `annotator`, `name`
/// - `ForbiddenCharacter` for ids containing a control character
pub fn validate_annotator_id(name: &str) -> Result<(), AnnotationError> {
  if name.is_empty() {
    return Err(AnnotationError::EmptyName);
  }

  if RESERVED_ANNOTATOR_IDS.contains(&name) {
    return Err(AnnotationError::ReservedName {
      name: name.to_string(),
    });
  }

  if let Some(character) = name.chars().find(|c| c.is_control()) {
    return Err(AnnotationError::ForbiddenCharacter {
      name: name.to_string(),
      character,
    });
  }

  Ok(())
}

/// An immutable value list keyed by the id of the annotator that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
  annotator: String,
  values: Vec<Value>,
}

impl Annotation {
  /// Creates an annotation after validating the annotator id.
  ///
  /// # Errors
  /// See [`validate_annotator_id`].
  pub fn new<I>(annotator: impl Into<String>, values: I) -> Result<Self, AnnotationError>
  where
    I: IntoIterator<Item = Value>,
  {
    let annotator = annotator.into();
    validate_annotator_id(&annotator)?;
    Ok(Self {
      annotator,
      values: values.into_iter().collect(),
    })
  }

  /// Creates a single-valued annotation.
  ///
  /// # Errors
  /// See [`validate_annotator_id`].
  pub fn single(
    annotator: impl Into<String>,
    value: impl Into<Value>,
  ) -> Result<Self, AnnotationError> {
    Self::new(annotator, [value.into()])
  }

  /// Skips validation. Only for the crate's own constant ids (`stem`, `pos`, `lemma`).
  pub(crate) fn trusted(annotator: &str, value: impl Into<Value>) -> Self {
    debug_assert!(validate_annotator_id(annotator).is_ok());
    Self {
      annotator: annotator.to_string(),
      values: vec![value.into()],
    }
  }

  /// Annotator id.
  pub fn annotator(&self) -> &str {
    &self.annotator
  }

  /// All values in insertion order.
  pub fn values(&self) -> &[Value] {
    &self.values
  }

  /// Number of values.
  pub fn len(&self) -> usize {
    self.values.len()
  }

  /// Whether the value list is empty.
  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// Returns the value at `index`.
  ///
  /// # Errors
  /// `IndexOutOfRange` if `index >= len()`.
  pub fn value(&self, index: usize) -> Result<&Value, AnnotationError> {
    self.values.get(index).ok_or_else(|| AnnotationError::IndexOutOfRange {
      annotator: self.annotator.clone(),
      index,
      len: self.values.len(),
    })
  }

  /// Returns the string at `index`.
  ///
  /// # Errors
  /// `TypeMismatch` if the value is numeric, `IndexOutOfRange` past the end.
  pub fn str_at(&self, index: usize) -> Result<&str, AnnotationError> {
    match self.value(index)? {
      Value::Str(s) => Ok(s),
      other => Err(self.mismatch(index, "string", other)),
    }
  }

  /// Returns the number at `index`.
  ///
  /// # Errors
  /// `TypeMismatch` if the value is a string, `IndexOutOfRange` past the end.
  pub fn num_at(&self, index: usize) -> Result<f64, AnnotationError> {
    match self.value(index)? {
      Value::Num(n) => Ok(*n),
      other => Err(self.mismatch(index, "number", other)),
    }
  }

  fn mismatch(&self, index: usize, expected: &'static str, actual: &Value) -> AnnotationError {
    AnnotationError::TypeMismatch {
      annotator: self.annotator.clone(),
      index,
      expected,
      actual: actual.kind_name(),
    }
  }
}

/// Per-object annotation table.
///
/// At most one annotation per annotator id; iteration follows first insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationTable {
  entries: Vec<Annotation>,
}

impl AnnotationTable {
  /// Creates an empty table.
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds `annotation`, replacing any annotation with the same annotator id.
  pub fn add(&mut self, annotation: Annotation) {
    match self.position(annotation.annotator()) {
      Some(idx) => self.entries[idx] = annotation,
      None => self.entries.push(annotation),
    }
  }

  /// Adds `annotation` only if its annotator id is not present yet.
  ///
  /// Returns `true` when the annotation was inserted.
  pub fn add_if_absent(&mut self, annotation: Annotation) -> bool {
    if self.contains(annotation.annotator()) {
      return false;
    }
    self.entries.push(annotation);
    true
  }

  /// Returns the annotation produced by `annotator`.
  pub fn get(&self, annotator: &str) -> Option<&Annotation> {
    self.entries.iter().find(|a| a.annotator == annotator)
  }

  /// Whether an annotation from `annotator` exists.
  pub fn contains(&self, annotator: &str) -> bool {
    self.position(annotator).is_some()
  }

  /// Removes and returns the annotation produced by `annotator`.
  pub fn remove(&mut self, annotator: &str) -> Option<Annotation> {
    self.position(annotator).map(|idx| self.entries.remove(idx))
  }

  /// Iterates annotations in insertion order.
  pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
    self.entries.iter()
  }

  /// Number of annotations.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Whether the table is empty.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  fn position(&self, annotator: &str) -> Option<usize> {
    self.entries.iter().position(|a| a.annotator == annotator)
  }
}

/// Any object that carries annotations and can be exported as a table row.
pub trait Annotable {
  /// Identifier written to the [`ID_COLUMN`] of exported rows.
  fn identifier(&self) -> String;

  /// Annotation table (read).
  fn annotations(&self) -> &AnnotationTable;

  /// Annotation table (write).
  fn annotations_mut(&mut self) -> &mut AnnotationTable;

  /// Adds an annotation, overwriting the one with the same annotator id.
  fn add_annotation(&mut self, annotation: Annotation) {
    self.annotations_mut().add(annotation);
  }

  /// Adds an annotation unless one with the same annotator id exists. Returns `true` if added.
  fn add_annotation_if_absent(&mut self, annotation: Annotation) -> bool {
    self.annotations_mut().add_if_absent(annotation)
  }

  /// Returns the annotation produced by `annotator`.
  fn get_annotation(&self, annotator: &str) -> Option<&Annotation> {
    self.annotations().get(annotator)
  }

  /// Whether an annotation from `annotator` exists.
  fn has_annotation(&self, annotator: &str) -> bool {
    self.annotations().contains(annotator)
  }
}

/// Flattens an annotable object into `(column, value)` pairs.
///
/// - the identifier goes to the `id` column
/// - a single-valued annotation becomes one column named by its annotator id
/// - a multi-valued annotation becomes `annotator$0`, `annotator$1`, ...
/// - empty annotations produce no column
pub fn to_row<A: Annotable + ?Sized>(object: &A) -> Vec<(String, Value)> {
  let mut row = vec![(ID_COLUMN.to_string(), Value::Str(object.identifier()))];

  for annotation in object.annotations().iter() {
    match annotation.values() {
      [] => {}
      [single] => row.push((annotation.annotator().to_string(), single.clone())),
      many => {
        for (idx, value) in many.iter().enumerate() {
          row.push((
            format!("{}{}{}", annotation.annotator(), COLUMN_INDEX_SEPARATOR, idx),
            value.clone(),
          ));
        }
      }
    }
  }

  row
}

// ─────────────────────────────────────────────────────────────────────────────
// Test Module
// ─────────────────────────────────────────────────────────────────────────────
