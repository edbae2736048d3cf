//! Data model: annotations, tokens and grams

pub mod annotation;
pub mod gram;
pub mod token;

/// Re-exports
pub use annotation::{Annotable, Annotation, AnnotationTable, Value, to_row};
pub use gram::{Gram, GramId, Surface};
pub use token::Token;
