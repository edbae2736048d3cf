//! Annotator trait and sequential pipeline

use std::time::Instant;

use tracing::{debug, info};

use crate::blackboard::Blackboard;
use crate::document::ComponentId;
use crate::errors::{AnnotatorError, KeygramResult};

/// A pluggable unit of work that reads and writes blackboard state.
///
/// Annotators are stateless with respect to documents (`&self`), so one instance can be
/// shared across threads that each own their [`Blackboard`].
pub trait Annotator: Send + Sync {
  /// Name used in logs and in [`AnnotatorError`].
  fn name(&self) -> &str;

  /// Processes `component` (and its subtree) on the blackboard.
  ///
  /// # Errors
  /// Any failure; the pipeline wraps it with this annotator's name.
  fn annotate(&self, blackboard: &mut Blackboard, component: ComponentId) -> KeygramResult<()>;
}

/// Ordered list of annotators run one after another.
///
/// The first failing stage aborts the run; its error is wrapped in
/// [`AnnotatorError`] carrying the stage name and the cause.
#[derive(Default)]
pub struct Pipeline {
  annotators: Vec<Box<dyn Annotator>>,
}

impl Pipeline {
  /// Creates an empty pipeline.
  pub fn new() -> Self {
    Self::default()
  }

  /// Builder that appends a stage.
  #[must_use]
  pub fn with(mut self, annotator: impl Annotator + 'static) -> Self {
    self.push(Box::new(annotator));
    self
  }

  /// Appends a stage.
  pub fn push(&mut self, annotator: Box<dyn Annotator>) {
    self.annotators.push(annotator);
  }

  /// Number of stages.
  pub fn len(&self) -> usize {
    self.annotators.len()
  }

  /// Whether the pipeline has no stage.
  pub fn is_empty(&self) -> bool {
    self.annotators.is_empty()
  }

  /// Stage names in execution order.
  pub fn names(&self) -> Vec<&str> {
    self.annotators.iter().map(|a| a.name()).collect()
  }

  /// Runs every stage on `component` in order.
  ///
  /// # Errors
  /// `KeygramError::Annotator` wrapping the first stage failure.
  pub fn run(&self, blackboard: &mut Blackboard, component: ComponentId) -> KeygramResult<()> {
    let start = Instant::now();
    info!(stages = self.annotators.len(), component = %component, "running pipeline");

    for annotator in &self.annotators {
      let stage_start = Instant::now();
      annotator
        .annotate(blackboard, component)
        .map_err(|e| AnnotatorError::wrap(annotator.name(), e))?;
      debug!(
        annotator = annotator.name(),
        elapsed_us = stage_start.elapsed().as_micros() as u64,
        "stage finished"
      );
    }

    info!(
      grams = blackboard.gram_count(),
      elapsed_ms = start.elapsed().as_millis() as u64,
      "pipeline finished"
    );
    Ok(())
  }
}

impl Annotator for Pipeline {
  fn name(&self) -> &str {
    "pipeline"
  }

  fn annotate(&self, blackboard: &mut Blackboard, component: ComponentId) -> KeygramResult<()> {
    self.run(blackboard, component)
  }
}

impl std::fmt::Debug for Pipeline {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Pipeline").field("annotators", &self.names()).finish()
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test Module
// ─────────────────────────────────────────────────────────────────────────────
