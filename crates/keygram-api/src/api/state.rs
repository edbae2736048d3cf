//! API State Definition

use std::sync::Arc;

use crate::config::Config;
use crate::service::KeygramApiService;

/// Application State
///
/// State shared across the entire server.
#[derive(Clone)]
pub struct AppState {
  /// Configuration
  pub config: Config,
  /// Keyphrase Extraction Service
  ///
  /// - Production: `Arc::new(KeygramApiServiceFull::new(&config)?)`
  /// - Test: `Arc::new(StubKeygramApiService)`
  pub service: Arc<dyn KeygramApiService>,
}

impl AppState {
  /// Creates a new AppState
  #[must_use]
  pub fn new(config: Config, service: Arc<dyn KeygramApiService>) -> Self {
    Self { config, service }
  }
}
