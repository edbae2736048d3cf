//! keygram-api crate
//!
//! Web server providing keyphrase extraction as HTTP API.
//!
//! ## Endpoints
//! - `POST /keyphrases` - Keyphrase Extraction
//! - `GET /health` - Health Check
//!
//! ## Usage Example
//! ```bash
//! curl -X POST http://127.0.0.1:5530/keyphrases \
//!   -H "Content-Type: application/json" \
//!   -d '{"language": "en", "limit": 5, "sections": [{"sentences": [{"tokens": [
//!         {"text": "Software", "pos": "NN"}, {"text": "Engineering", "pos": "NN"}]}]}]}'
//! ```

pub mod api;
pub mod config;
pub mod errors;
pub mod models;
pub mod service;

pub use api::AppState;
pub use config::Config;
pub use errors::{ApiError, ApiErrorKind};
pub use models::{KeyphraseDto, KeyphraseRequest, KeyphraseResponse};
pub use service::KeygramApiServiceFull;
