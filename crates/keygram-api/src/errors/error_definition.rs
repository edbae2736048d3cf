//! APIエラー定義
//!
//! `POST /keyphrases` が返すエラーは次の 4 種類に分類される。
//! どれも `{"error": {"code", "message"}}` 形式の JSON で返る。
//!
//! | code | status | 主な原因 |
//! |---|---|---|
//! | `invalid_document` | 400 | 文がない、limit が範囲外、コンポーネント ID の重複 |
//! | `document_too_large` | 400 | 文テキストとトークンの合計が上限を超えた |
//! | `config_error` | 500 | 設定ファイル、品詞パターン辞書、形態素解析辞書 |
//! | `internal_error` | 500 | 上記以外（アノテーター独自の失敗など） |

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use keygram::errors::{AnnotatorError, KeygramError, TokenizerError};

/// エラー分類（レスポンスの `code` と HTTP ステータスを決める）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
  /// ドキュメントの構造や抽出パラメータが不正
  InvalidDocument,
  /// ドキュメントが処理上限を超えている
  DocumentTooLarge,
  /// 抽出パイプライン内部の失敗
  Internal,
  /// サーバー側の設定不備
  Config,
}

impl ApiErrorKind {
  /// レスポンスの `code` フィールド
  #[must_use]
  pub fn code(&self) -> &'static str {
    match self {
      Self::InvalidDocument => "invalid_document",
      Self::DocumentTooLarge => "document_too_large",
      Self::Internal => "internal_error",
      Self::Config => "config_error",
    }
  }

  /// クライアント起因なら 400、サーバー起因なら 500
  #[must_use]
  pub fn status(&self) -> StatusCode {
    match self {
      Self::InvalidDocument | Self::DocumentTooLarge => StatusCode::BAD_REQUEST,
      Self::Internal | Self::Config => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

/// キーフレーズ抽出 API のエラー
#[derive(Debug, Error)]
pub enum ApiError {
  /// 抽出を始められないドキュメント
  #[error("ドキュメントを処理できません: {0}")]
  InvalidDocument(String),

  /// 文テキストの合計サイズ超過
  #[error("ドキュメントが大きすぎます: 文テキスト合計 {bytes} バイト（上限 {max} バイト）")]
  DocumentTooLarge {
    /// リクエスト中の文テキストとトークンの合計バイト数
    bytes: usize,
    /// 許容される最大バイト数
    max: usize,
  },

  /// 抽出パイプラインの失敗
  #[error("キーフレーズ抽出に失敗しました: {0}")]
  Internal(String),

  /// サーバー設定の不備
  #[error("設定エラー: {0}")]
  Config(String),
}

impl ApiError {
  /// 分類
  #[must_use]
  pub fn kind(&self) -> ApiErrorKind {
    match self {
      Self::InvalidDocument(_) => ApiErrorKind::InvalidDocument,
      Self::DocumentTooLarge { .. } => ApiErrorKind::DocumentTooLarge,
      Self::Internal(_) => ApiErrorKind::Internal,
      Self::Config(_) => ApiErrorKind::Config,
    }
  }

  /// レスポンスの `code`
  #[must_use]
  pub fn code(&self) -> &'static str {
    self.kind().code()
  }

  /// レスポンスの HTTP ステータス
  #[must_use]
  pub fn status(&self) -> StatusCode {
    self.kind().status()
  }

  /// 文がない、limit が範囲外など、抽出前に弾くドキュメント
  #[must_use]
  pub fn invalid_document(reason: impl Into<String>) -> Self {
    Self::InvalidDocument(reason.into())
  }

  /// `bytes` が `max` を超えたドキュメント
  #[must_use]
  pub fn document_too_large(bytes: usize, max: usize) -> Self {
    Self::DocumentTooLarge { bytes, max }
  }

  /// パイプライン内部の失敗
  #[must_use]
  pub fn internal(message: impl Into<String>) -> Self {
    Self::Internal(message.into())
  }

  /// 起動時やパターン辞書ロード時の設定不備
  #[must_use]
  pub fn config(message: impl Into<String>) -> Self {
    Self::Config(message.into())
  }
}

/// エラーレスポンスのJSON構造
#[derive(Serialize)]
struct ErrorResponse {
  error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
  code: &'static str,
  message: String,
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let body = ErrorResponse {
      error: ErrorBody {
        code: self.code(),
        message: self.to_string(),
      },
    };

    (status, Json(body)).into_response()
  }
}

/// アノテーターに包まれたエラーは原因までたどって分類する
fn classify(err: &KeygramError) -> ApiErrorKind {
  match err {
    KeygramError::Annotator(AnnotatorError {
      source: Some(cause),
      ..
    }) => classify(cause),
    KeygramError::Structure(_)
    | KeygramError::Annotation(_)
    | KeygramError::Tokenizer(TokenizerError::InvalidInput { .. }) => ApiErrorKind::InvalidDocument,
    KeygramError::Config(_)
    | KeygramError::Pattern(_)
    | KeygramError::Dictionary(_)
    | KeygramError::Tokenizer(TokenizerError::Dictionary(_))
    | KeygramError::UnsupportedLanguage { .. } => ApiErrorKind::Config,
    // #[non_exhaustive] な enum のため、将来追加されるバリアントに対応
    _ => ApiErrorKind::Internal,
  }
}

/// 抽出エンジンのエラーを [`classify`] で分類し、メッセージはそのまま引き継ぐ。
///
/// アノテーターに包まれたエラーのメッセージには、失敗したアノテーター名が含まれる。
impl From<KeygramError> for ApiError {
  fn from(err: KeygramError) -> Self {
    let message = err.to_string();
    match classify(&err) {
      ApiErrorKind::InvalidDocument => ApiError::invalid_document(message),
      ApiErrorKind::Config => ApiError::config(message),
      ApiErrorKind::DocumentTooLarge | ApiErrorKind::Internal => ApiError::internal(message),
    }
  }
}

/// Result 型エイリアス
pub type Result<T> = std::result::Result<T, ApiError>;
