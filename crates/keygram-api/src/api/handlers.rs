//! HTTPハンドラー定義

use axum::{Json, extract::State};
use tracing::{debug, error, info};

use crate::errors::ApiError;
use crate::models::{KeyphraseRequest, KeyphraseResponse};

use super::state::AppState;

/// POST /keyphrases エンドポイント
///
/// ドキュメントからキーフレーズを抽出し、スコア順に返す。
///
/// # Request Body
/// ```json
/// {
///   "language": "en",
///   "limit": 10,
///   "sections": [
///     { "sentences": [ { "tokens": [ { "text": "Software", "pos": "NN" } ] } ] }
///   ]
/// }
/// ```
///
/// # Response
/// - 200 OK: 抽出成功
/// - 400 Bad Request: 入力エラー（文なし、テキスト長超過、limit 範囲外、構造エラー）
/// - 500 Internal Server Error: 設定エラー・内部エラー
pub async fn post_keyphrases(
  State(state): State<AppState>,
  Json(request): Json<KeyphraseRequest>,
) -> Result<Json<KeyphraseResponse>, ApiError> {
  debug!(
    sections = request.sections.len(),
    sentences = request.sentence_count(),
    limit = ?request.limit,
    "キーフレーズ抽出リクエストを受信"
  );

  // アノテーションは CPU バウンドなので spawn_blocking で実行
  let service = state.service.clone();

  let response =
    tokio::task::spawn_blocking(move || service.extract(request)).await.map_err(|e| {
      error!(error = %e, "spawn_blocking エラー");
      ApiError::internal("処理の実行に失敗しました")
    })??;

  info!(
    keyphrase_count = response.keyphrases.len(),
    elapsed_ms = response.elapsed_ms,
    "キーフレーズ抽出完了"
  );

  Ok(Json(response))
}

/// ヘルスチェックエンドポイント
///
/// サーバーが稼働しているかを確認する。
pub async fn health_check() -> &'static str {
  "OK"
}
