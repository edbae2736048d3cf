//! document モジュール
//!
//! 複合コンポーネント（セクション）と文（葉）からなるドキュメント木を提供します。

pub mod builder;
pub mod component;

/// 主要な型を再エクスポート
pub use builder::DocumentBuilder;
pub use component::{ComponentId, ComponentKind, DocumentComponent, Sentence};
