//! keygram キーフレーズ抽出ライブラリー
//!
//! 品詞タグ付きのドキュメント木から複合語候補 (Gram) を抽出し、ドキュメント全体で重複を統合し、
//! 位置・頻度の統計量を付与して線形スコアで順位付けする。

/// アノテーターモジュール - 統計量、ステマー、日本語タガー
pub mod annotators;

/// Blackboard モジュール - ドキュメントごとの共有状態と Gram レジストリ
pub mod blackboard;

/// 設定モジュール - KeygramConfig, Language等の設定構造体を定義
pub mod config;

/// 辞書モジュール - 日本語タガー用辞書の管理・ロード機能を提供
pub mod dictionary;

/// ドキュメントモジュール - 複合・文コンポーネントからなるドキュメント木
pub mod document;

/// エラーモジュール - KeygramError, KeygramResult等のエラー型を定義
pub mod errors;

/// 評価モジュール - 素性の重み付き線形和によるスコアリング
pub mod evaluator;

/// 候補生成モジュール - 品詞パターンによるスライディングウィンドウ n-gram 抽出
pub mod generator;

/// ロギングモジュール - tracing-subscriber の初期化
pub mod logging;

/// データモデルモジュール - Annotation, Token, Gram等のデータ構造を定義
pub mod models;

/// パイプラインモジュール - Annotator トレイトと逐次実行
pub mod pipeline;

/// サービスモジュール - KeygramService等の上位レベルAPIを提供
pub mod service;

/// 再エクスポート
pub use blackboard::Blackboard;
pub use config::{KeygramConfig, Language};
pub use document::{ComponentId, DocumentBuilder, DocumentComponent};
pub use errors::{KeygramError, KeygramResult};
pub use evaluator::{LinearEvaluator, RankedKeyphrase};
pub use models::{Gram, Token};
pub use pipeline::{Annotator, Pipeline};
pub use service::KeygramService;
