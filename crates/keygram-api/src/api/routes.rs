//! ルーター定義

use axum::{
  Router,
  routing::{get, post},
};
use tower_http::trace::TraceLayer;

use super::handlers::{health_check, post_keyphrases};
use super::state::AppState;
use crate::errors::ApiError;

/// APIルーターを作成する
///
/// # Arguments
/// * `state` - アプリケーション状態
pub fn create_router(state: AppState) -> Router {
  Router::new()
    .route("/keyphrases", post(post_keyphrases))
    .route("/health", get(health_check))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// サーバーを起動する
///
/// # Errors
/// バインドまたはサーバーの実行に失敗した場合にエラーを返す
pub async fn run_server(state: AppState) -> crate::errors::Result<()> {
  let addr = state.config.bind_addr.clone();
  let listener = tokio::net::TcpListener::bind(&addr)
    .await
    .map_err(|e| ApiError::config(format!("バインドに失敗しました ({addr}): {e}")))?;

  tracing::info!("サーバーを起動します: http://{}", addr);

  axum::serve(listener, create_router(state))
    .await
    .map_err(|e| ApiError::internal(format!("サーバーエラー: {e}")))?;

  Ok(())
}
