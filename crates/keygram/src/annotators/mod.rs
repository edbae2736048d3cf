//! アノテーターモジュール
//!
//! - `statistics`: Depth / Height / LifeSpan / Freq の算出
//! - `stemmer`: rust-stemmers による英語トークンのステミング
//! - `tagger`: vibrato-rkyv による日本語の形態素解析
pub mod statistics;
pub mod stemmer;
pub mod tagger;

/// 再エクスポート
pub use statistics::StatisticalAnnotator;
pub use stemmer::SnowballStemmer;
pub use tagger::{TokenFeature, VibratoTagger, parse_feature};
