//! Linear feature-weighted scoring

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::blackboard::Blackboard;
use crate::document::ComponentId;
use crate::errors::KeygramResult;
use crate::models::gram::{FREQUENCY, Gram, SCORE};
use crate::pipeline::{Annotator, Pipeline};

/// One ranked keyphrase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedKeyphrase {
  /// Identity key
  pub signature: String,
  /// Most frequent surface
  pub surface: String,
  /// All observed surfaces, in first-seen order
  pub surfaces: Vec<String>,
  /// `Score` feature
  pub score: f64,
  /// Occurrence count (`Freq`, or the merged occurrence count when statistics did not run)
  pub frequency: f64,
  /// Every feature of the gram
  pub features: BTreeMap<String, f64>,
}

impl RankedKeyphrase {
  fn from_gram(gram: &Gram, score: f64) -> Self {
    Self {
      signature: gram.signature().to_string(),
      surface: gram.surface().to_string(),
      surfaces: gram.surfaces().iter().map(|s| s.text().to_string()).collect(),
      score,
      frequency: gram.feature(FREQUENCY).unwrap_or(gram.occurrences() as f64),
      features: gram.features().iter().map(|(k, v)| (k.clone(), *v)).collect(),
    }
  }
}

/// Scores every gram as `Σ weight[name] * feature[name]`.
///
/// Features without a weight are ignored, as is `Score` itself. The upstream pipeline
/// (generators, statistics, ...) runs first on every [`evaluate`](Self::evaluate).
#[derive(Debug)]
pub struct LinearEvaluator {
  /// sorted by name so the sum is computed in a fixed order
  weights: Vec<(String, f64)>,
  upstream: Pipeline,
}

impl LinearEvaluator {
  /// Creates an evaluator.
  pub fn new(weights: HashMap<String, f64>, upstream: Pipeline) -> Self {
    let mut weights: Vec<(String, f64)> =
      weights.into_iter().filter(|(name, _)| name != SCORE).collect();
    weights.sort_by(|a, b| a.0.cmp(&b.0));
    Self { weights, upstream }
  }

  /// Weight of a feature.
  pub fn weight(&self, feature: &str) -> Option<f64> {
    self.weights.iter().find(|(name, _)| name == feature).map(|(_, w)| *w)
  }

  /// Stages run before scoring.
  pub fn upstream(&self) -> &Pipeline {
    &self.upstream
  }

  /// Score of one gram.
  pub fn score(&self, gram: &Gram) -> f64 {
    self
      .weights
      .iter()
      .filter_map(|(name, weight)| gram.feature(name).map(|value| weight * value))
      .sum()
  }

  /// Runs the upstream pipeline on `component`, then writes `Score` on every gram.
  ///
  /// Returns signature → score.
  ///
  /// # Errors
  /// The wrapped error of the first failing upstream stage.
  pub fn evaluate(
    &self,
    blackboard: &mut Blackboard,
    component: ComponentId,
  ) -> KeygramResult<HashMap<String, f64>> {
    self.upstream.run(blackboard, component)?;

    let mut scores = HashMap::with_capacity(blackboard.gram_count());
    for id in blackboard.gram_ids() {
      if let Some(gram) = blackboard.gram_mut(id) {
        let score = self.score(gram);
        gram.set_feature(SCORE, score);
        scores.insert(gram.signature().to_string(), score);
      }
    }

    debug!(grams = scores.len(), "grams scored");
    Ok(scores)
  }

  /// Grams sorted by descending score, ties in insertion order, at most `limit` of them.
  ///
  /// Grams not scored yet are scored on the fly (without writing `Score`).
  pub fn rank(&self, blackboard: &Blackboard, limit: usize) -> Vec<RankedKeyphrase> {
    let mut ranked: Vec<RankedKeyphrase> = blackboard
      .grams()
      .map(|(_, gram)| {
        let score = gram.feature(SCORE).unwrap_or_else(|| self.score(gram));
        RankedKeyphrase::from_gram(gram, score)
      })
      .collect();

    // stable sort keeps insertion order among equal scores
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(limit);
    ranked
  }
}

impl Annotator for LinearEvaluator {
  fn name(&self) -> &str {
    "linear-evaluator"
  }

  fn annotate(&self, blackboard: &mut Blackboard, component: ComponentId) -> KeygramResult<()> {
    self.evaluate(blackboard, component).map(|_| ())
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test Module
// ─────────────────────────────────────────────────────────────────────────────
