//! 辞書モジュール（日本語タガー用 vibrato-rkyv 辞書の管理）
pub mod dictionary_manager;

/// 再エクスポート
pub use dictionary_manager::DictionaryManager;
