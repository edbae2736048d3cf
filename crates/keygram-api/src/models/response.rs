//! Response Model Definition

use std::collections::BTreeMap;

use serde::Serialize;

use keygram::RankedKeyphrase;

/// Keyphrase Extraction Response
#[derive(Debug, Serialize)]
pub struct KeyphraseResponse {
  /// Keyphrases, best first
  pub keyphrases: Vec<KeyphraseDto>,
  /// Elapsed time (milliseconds)
  pub elapsed_ms: u64,
}

/// Ranked keyphrase (DTO)
#[derive(Debug, Clone, Serialize)]
pub struct KeyphraseDto {
  /// Stemmed identity key
  pub signature: String,
  /// Most frequent surface form
  pub surface: String,
  /// Every observed surface form
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub surfaces: Vec<String>,
  /// Linear score
  pub score: f64,
  /// Occurrence count
  pub frequency: f64,
  /// Every numeric feature of the gram
  pub features: BTreeMap<String, f64>,
}

impl From<RankedKeyphrase> for KeyphraseDto {
  fn from(keyphrase: RankedKeyphrase) -> Self {
    Self {
      signature: keyphrase.signature,
      surface: keyphrase.surface,
      surfaces: keyphrase.surfaces,
      score: keyphrase.score,
      frequency: keyphrase.frequency,
      features: keyphrase.features,
    }
  }
}
