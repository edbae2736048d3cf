//! モデルモジュール

mod request;
mod response;

pub use request::{KeyphraseRequest, SectionDto, SentenceDto, TokenInputDto};
pub use response::{KeyphraseDto, KeyphraseResponse};
