//! Keyphrase Extraction Service

use std::time::Instant;

use keygram::KeygramService;

use crate::config::{Config, MAX_LIMIT, MAX_DOCUMENT_BYTES};
use crate::errors::{ApiError, Result};
use crate::models::{KeyphraseDto, KeyphraseRequest, KeyphraseResponse};

/// Common interface for keyphrase extraction service
///
/// This trait allows swapping production implementation (`KeygramApiServiceFull`) with
/// test stubs/mocks.
pub trait KeygramApiService: Send + Sync {
  /// Extracts ranked keyphrases from a document
  ///
  /// # Errors
  /// - Input error (no sentences, length exceeded, invalid limit, etc.)
  /// - Config error (pattern dictionary, Japanese dictionary)
  /// - Internal error
  fn extract(&self, request: KeyphraseRequest) -> Result<KeyphraseResponse>;
}

/// Validates the request before any annotation runs
fn validate_request(request: &KeyphraseRequest) -> Result<()> {
  if request.sentence_count() == 0 {
    return Err(ApiError::invalid_document("Document has no sentences"));
  }

  let text_bytes = request.text_len();
  if text_bytes > MAX_DOCUMENT_BYTES {
    return Err(ApiError::document_too_large(text_bytes, MAX_DOCUMENT_BYTES));
  }

  match request.limit {
    Some(0) => Err(ApiError::invalid_document("limit must be at least 1")),
    Some(limit) if limit > MAX_LIMIT => Err(ApiError::invalid_document(format!(
      "limit must be at most {MAX_LIMIT} (got {limit})"
    ))),
    _ => Ok(()),
  }
}

/// Keyphrase Extraction Service
///
/// Holds one `KeygramService`; each request gets its own blackboard inside it,
/// so the service is shared across blocking tasks without locking.
#[derive(Debug)]
pub struct KeygramApiServiceFull {
  inner: KeygramService,
}

impl KeygramApiServiceFull {
  /// Initializes the service
  ///
  /// # Arguments
  /// * `config` - Configuration (including the keygram engine configuration)
  ///
  /// # Errors
  /// Returns an error if the configuration is invalid or the dictionary load fails
  pub fn new(config: &Config) -> Result<Self> {
    let inner = KeygramService::init(&config.keygram)?;
    Ok(Self { inner })
  }

  /// Wraps an already assembled `KeygramService`
  #[must_use]
  pub fn from_service(inner: KeygramService) -> Self {
    Self { inner }
  }

  /// Extracts keyphrases
  ///
  /// # Arguments
  /// * `request` - Extraction request
  ///
  /// # Returns
  /// Ranked keyphrases and processing time
  ///
  /// # Errors
  /// - If the document has no sentences
  /// - If the text exceeds maximum length
  /// - If `limit` is out of range
  /// - If any annotator fails
  pub fn extract(&self, request: KeyphraseRequest) -> Result<KeyphraseResponse> {
    validate_request(&request)?;

    let start = Instant::now();

    let limit = request.limit;
    let (raw_text, root) = request.into_document();
    let ranked = self.inner.extract(&raw_text, root, limit)?;
    let keyphrases = ranked.into_iter().map(KeyphraseDto::from).collect();

    let elapsed_ms = start.elapsed().as_millis() as u64;

    Ok(KeyphraseResponse {
      keyphrases,
      elapsed_ms,
    })
  }
}

/// Production implementation of trait `KeygramApiService`
impl KeygramApiService for KeygramApiServiceFull {
  fn extract(&self, request: KeyphraseRequest) -> Result<KeyphraseResponse> {
    // Note: Writing `self.extract(...)` would recursively call the trait method,
    // so explicitly call the inherent method.
    KeygramApiServiceFull::extract(self, request)
  }
}
