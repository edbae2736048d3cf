//! Config module

mod constants;
mod env;

pub use constants::{
  DEFAULT_BIND_ADDR, ENV_BIND_ADDR, ENV_CONFIG_PATH, MAX_LIMIT, MAX_DOCUMENT_BYTES,
};
pub use env::Config;
