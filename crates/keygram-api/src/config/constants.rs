//! API設定の定数定義

/// 1ドキュメントあたりの文テキストとトークンの合計の上限（バイト単位）
pub const MAX_DOCUMENT_BYTES: usize = 10_000_000;

/// 1リクエストで返却できるキーフレーズの最大件数
pub const MAX_LIMIT: usize = 1_000;

/// デフォルトのバインドアドレス
///
/// 開発環境での利用を想定した localhost の標準ポート。
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5530";

/// バインドアドレスを指定する環境変数
pub const ENV_BIND_ADDR: &str = "KEYGRAM_API_BIND_ADDR";

/// keygram 設定ファイル (JSON) のパスを指定する環境変数
pub const ENV_CONFIG_PATH: &str = "KEYGRAM_CONFIG";
