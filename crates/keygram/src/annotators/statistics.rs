//! Positional and frequency statistics of grams

use std::collections::HashSet;

use tracing::debug;

use crate::blackboard::Blackboard;
use crate::document::ComponentId;
use crate::errors::KeygramResult;
use crate::models::gram::{DEPTH, FREQUENCY, GramId, HEIGHT, LIFESPAN};
use crate::pipeline::Annotator;

/// Writes `Depth`, `Height`, `LifeSpan` and `Freq` on every gram found under a component.
///
/// One forward pass over the sentences in document order, `count` being the 1-based sentence
/// index and `size` the number of sentences:
///
/// - `Depth = count / size`, rewritten on every occurrence (ends at the last occurrence)
/// - `Height = 1 - Depth`, written on the first occurrence only
/// - `LifeSpan = Depth + Height - 1`, i.e. the span between first and last occurrence
/// - `Freq` counts occurrences
///
/// A single-sentence document has `Depth = Height = LifeSpan = 1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticalAnnotator;

impl StatisticalAnnotator {
  /// Creates the annotator.
  pub fn new() -> Self {
    Self
  }
}

impl Annotator for StatisticalAnnotator {
  fn name(&self) -> &str {
    "statistics"
  }

  fn annotate(&self, blackboard: &mut Blackboard, component: ComponentId) -> KeygramResult<()> {
    let occurrences: Vec<Vec<GramId>> = blackboard
      .component(component)?
      .sentences()
      .into_iter()
      .map(|s| s.grams().to_vec())
      .collect();
    let size = occurrences.len();
    let mut seen = HashSet::new();

    for (idx, grams) in occurrences.iter().enumerate() {
      let depth = (idx + 1) as f64 / size as f64;
      for id in grams {
        let Some(gram) = blackboard.gram_mut(*id) else {
          continue;
        };

        gram.set_feature(DEPTH, depth);
        let first = seen.insert(*id);
        if first {
          let height = if size == 1 { 1.0 } else { 1.0 - depth };
          gram.set_feature(HEIGHT, height);
          gram.set_feature(FREQUENCY, 1.0);
        } else {
          let frequency = gram.feature(FREQUENCY).unwrap_or(0.0);
          gram.set_feature(FREQUENCY, frequency + 1.0);
        }
        let height = gram.feature(HEIGHT).unwrap_or(0.0);
        gram.set_feature(LIFESPAN, depth + height - 1.0);
      }
    }

    debug!(sentences = size, grams = seen.len(), "statistics computed");
    Ok(())
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test Module
// ─────────────────────────────────────────────────────────────────────────────
