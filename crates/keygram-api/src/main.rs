//! keygram-api サーバーエントリーポイント

use std::sync::Arc;

use keygram_api::ApiError;
use keygram_api::api::AppState;
use keygram_api::api::run_server;
use keygram_api::config::Config;
use keygram_api::service::KeygramApiServiceFull;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
  // 設定の読み込み（ログレベルは設定ファイルから決まる）
  let config = Config::from_env()?;

  // ロギングの初期化
  keygram::logging::init(config.keygram.log_level());
  tracing::info!(
    bind_addr = %config.bind_addr,
    config_path = ?config.config_path,
    "設定を読み込みました"
  );

  // サービスの初期化
  let service = Arc::new(KeygramApiServiceFull::new(&config)?);
  tracing::info!("キーフレーズ抽出サービスを初期化しました");

  // アプリケーション状態の作成
  let state = AppState::new(config, service);

  // サーバー起動
  run_server(state).await
}
