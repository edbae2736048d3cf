//! errors module
pub mod error_definition;

/// Re-export major error types
pub use error_definition::{
  AnnotationError, AnnotatorError, ConfigError, DictionaryError, KeygramError, KeygramResult,
  PatternError, StructureError, TokenizerError,
};
