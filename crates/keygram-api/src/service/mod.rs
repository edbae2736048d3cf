//! Service module

mod keygram_api_service;

pub use keygram_api_service::{KeygramApiService, KeygramApiServiceFull};
