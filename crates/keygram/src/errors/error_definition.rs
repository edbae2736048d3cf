//! エラー定義

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use vibrato_rkyv::dictionary::PresetDictionaryKind;

use crate::config::Language;
use crate::document::ComponentId;

/// アノテーション関連のエラー
///
/// 予約名・禁止文字は Annotation の構築時に、型の不一致は値の参照時に検出される。
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum AnnotationError {
  /// アノテーター ID が空文字列
  #[error("アノテーター ID が空です")]
  EmptyName,

  /// アノテーター ID が予約名（id, annotator, name）と衝突している
  #[error("アノテーター ID は予約されています: {name}")]
  ReservedName {
    /// 指定された ID
    name: String,
  },

  /// アノテーター ID に制御文字が含まれている
  #[error("アノテーター ID に使用できない文字が含まれています: name={name:?}, character={character:?}")]
  ForbiddenCharacter {
    /// 指定された ID
    name: String,
    /// 検出された禁止文字
    character: char,
  },

  /// 文字列値を数値として（またはその逆で）参照した
  #[error(
    "アノテーション値の型が一致しません: annotator={annotator}, index={index}, \
     expected={expected}, actual={actual}"
  )]
  TypeMismatch {
    /// 対象アノテーター ID
    annotator: String,
    /// 参照したインデックス
    index: usize,
    /// 期待した型
    expected: &'static str,
    /// 実際の型
    actual: &'static str,
  },

  /// 値リストの範囲外を参照した
  #[error("アノテーション値のインデックスが範囲外です: annotator={annotator}, index={index}, len={len}")]
  IndexOutOfRange {
    /// 対象アノテーター ID
    annotator: String,
    /// 参照したインデックス
    index: usize,
    /// 値リストの長さ
    len: usize,
  },
}

/// ドキュメント木の構造に関するエラー
///
/// 呼び出し側のバグを示すため、回復は想定しない。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StructureError {
  /// 複合コンポーネントに Gram を追加しようとした
  #[error("複合コンポーネントには Gram を追加できません: component={component}")]
  GramOnComposite {
    /// 対象コンポーネント
    component: ComponentId,
  },

  /// 複合コンポーネントから Gram を削除しようとした
  #[error("複合コンポーネントから Gram は削除できません: component={component}")]
  GramRemovalOnComposite {
    /// 対象コンポーネント
    component: ComponentId,
  },

  /// 文（葉）コンポーネントに子コンポーネントを追加しようとした
  #[error("文コンポーネントには子を追加できません: component={component}")]
  ChildOnSentence {
    /// 対象コンポーネント
    component: ComponentId,
  },

  /// 指定されたコンポーネントがドキュメント木に存在しない
  #[error("コンポーネントが見つかりません: component={component}")]
  ComponentNotFound {
    /// 対象コンポーネント
    component: ComponentId,
  },

  /// ドキュメント木の中でコンポーネント ID が重複している
  #[error("コンポーネント ID が重複しています: component={component}")]
  DuplicateComponentId {
    /// 重複した ID
    component: ComponentId,
  },

  /// Blackboard にドキュメントがロードされていない
  #[error("ドキュメントがロードされていません")]
  NoDocument,
}

/// 品詞パターン辞書関連のエラー
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum PatternError {
  /// パターンファイルの読み込み失敗
  #[error("パターンファイルの読み込みに失敗しました: path={path:?}, error={source}")]
  Io {
    /// 対象パス
    path: PathBuf,
    /// 元となった IO エラー
    #[source]
    source: Arc<io::Error>,
  },

  /// パターン JSON のデシリアライズ失敗
  #[error("パターン辞書の解析に失敗しました: origin={origin}, error={source}")]
  Parse {
    /// 読み込み元（ファイルパスまたは "built-in:<lang>"）
    origin: String,
    /// 元となった JSON エラー
    #[source]
    source: Arc<serde_json::Error>,
  },

  /// パターン文字列が不正（空、空のタグを含む等）
  #[error("品詞パターンが不正です: pattern={pattern:?}, reason={reason}")]
  InvalidPattern {
    /// 対象パターン
    pattern: String,
    /// 不正の理由
    reason: String,
  },

  /// 指定言語のパターン辞書が設定されていない
  #[error("言語 {language} のパターン辞書がありません")]
  MissingDictionary {
    /// 対象言語
    language: Language,
  },
}

/// 設定（KeygramConfig）関連のエラー
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum ConfigError {
  /// generator.languages が空
  #[error("generator.languages に少なくとも1つの言語を指定してください")]
  EmptyLanguages,

  /// generator.max_width が許容範囲外
  #[error("generator.max_width は {min}〜{max} の範囲で指定してください: actual={actual}")]
  InvalidMaxWidth {
    /// 許容される最小値
    min: usize,
    /// 許容される最大値
    max: usize,
    /// 実際に指定された値
    actual: usize,
  },

  /// generator.pattern_files に指定されたファイルが存在しない
  #[error("パターンファイルが見つかりません: language={language}, path={path:?}")]
  PatternFileNotFound {
    /// 対象言語
    language: Language,
    /// 指定されたパス
    path: PathBuf,
  },

  /// scoring.weights に有限でない値がある
  #[error("scoring.weights の値は有限である必要があります: feature={feature}, value={value}")]
  InvalidWeight {
    /// 対象の素性名
    feature: String,
    /// 指定された値
    value: f64,
  },

  /// scoring.limit < 1
  #[error("scoring.limit は 1 以上である必要があります: actual={actual}")]
  InvalidLimit {
    /// 実際に指定された値
    actual: usize,
  },

  /// dictionary.cache_dir が「存在するディレクトリ」でない（ファイルである等）
  #[error("dictionary.cache_dir がディレクトリではありません: path={path:?}")]
  InvalidDictionaryCacheDir {
    /// 不正なパス
    path: PathBuf,
  },

  /// dictionary.cache_dir の作成に失敗
  #[error("dictionary.cache_dir の作成に失敗しました: path={path:?}, error={source}")]
  DictionaryCacheDirCreationFailed {
    /// 作成しようとしたパス
    path: PathBuf,
    /// 元となった IO エラー
    #[source]
    source: Arc<io::Error>,
  },

  /// 設定ファイルの読み込み失敗
  #[error("設定ファイルの読み込みに失敗しました: path={path:?}, error={source}")]
  Io {
    /// 対象パス
    path: PathBuf,
    /// 元となった IO エラー
    #[source]
    source: Arc<io::Error>,
  },

  /// 設定 JSON の解析失敗
  #[error("設定の解析に失敗しました: {0}")]
  Parse(Arc<serde_json::Error>),
}

/// 辞書関連のエラー
/// Vibrato では ipadic, unidic 等の辞書を使用可能
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum DictionaryError {
  /// キャッシュディレクトリーが見つからない
  #[error("辞書キャッシュディレクトリーが見つかりません")]
  CacheDirNotFound,

  /// キャッシュディレクトリーの作成失敗
  #[error("辞書キャッシュディレクトリーの作成に失敗しました: {0}")]
  CacheDirCreationFailed(Arc<io::Error>),

  /// 指定された辞書が見つからない
  #[error("指定された辞書が見つかりません: {0}")]
  DictionaryNotFound(String),

  /// 辞書パスが不正または辞書種別が不正
  #[error("辞書パスまたは辞書種別が不正です: path={0}, preset_kind={1:?}")]
  InvalidPathOrInvalidPresetKind(PathBuf, Option<PresetDictionaryKind>),

  /// vibrato-rkyv による辞書のロード失敗
  #[error("vibrato-rkyv 辞書ロードエラー: {0}")]
  VibratoLoad(Arc<dyn std::error::Error + Send + Sync + 'static>),

  /// vibrato-rkyv のプリセット辞書のダウンロード失敗
  #[error("vibrato-rkyv プリセット辞書ダウンロード失敗: {0}")]
  PresetDictDownloadFailed(Arc<dyn std::error::Error + Send + Sync + 'static>),
}

/// トークナイザー（形態素解析）関連エラー
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum TokenizerError {
  /// 辞書起因のエラー
  #[error("辞書エラー: {0}")]
  Dictionary(#[from] DictionaryError),

  /// 入力テキストが不正
  #[error("トークナイズ対象の入力テキストが不正: {reason}")]
  InvalidInput {
    /// 不正の理由
    reason: String,
  },
}

/// アノテーター実行時のエラー
///
/// パイプラインは失敗したアノテーターの名前と原因を付けてこのエラーに包み、
/// 残りのステージを中断する。
#[derive(Debug, Error, Clone)]
#[error("アノテーター {annotator} が失敗しました: {message}")]
pub struct AnnotatorError {
  /// 失敗したアノテーターの名前
  pub annotator: String,
  /// エラーメッセージ
  pub message: String,
  /// 原因となったエラー
  #[source]
  pub source: Option<Arc<KeygramError>>,
}

impl AnnotatorError {
  /// 原因なしのアノテーターエラーを作成
  pub fn new(annotator: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      annotator: annotator.into(),
      message: message.into(),
      source: None,
    }
  }

  /// 原因となったエラーを包んだアノテーターエラーを作成
  pub fn wrap(annotator: impl Into<String>, cause: KeygramError) -> Self {
    Self {
      annotator: annotator.into(),
      message: cause.to_string(),
      source: Some(Arc::new(cause)),
    }
  }
}

/// 統合エラー
/// 本クレートの外部に公開するエラー用 API はこのエラーを返すこと
/// `KeygramResult<T>` = `Result<T, KeygramError>` として使用する
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum KeygramError {
  /// アノテーション関連エラー
  #[error(transparent)]
  Annotation(#[from] AnnotationError),

  /// ドキュメント構造関連エラー
  #[error(transparent)]
  Structure(#[from] StructureError),

  /// 品詞パターン辞書関連エラー
  #[error(transparent)]
  Pattern(#[from] PatternError),

  /// 設定エラー
  #[error(transparent)]
  Config(#[from] ConfigError),

  /// 辞書関連エラー
  #[error(transparent)]
  Dictionary(#[from] DictionaryError),

  /// トークナイザー関連エラー
  #[error(transparent)]
  Tokenizer(#[from] TokenizerError),

  /// アノテーター実行エラー
  #[error(transparent)]
  Annotator(#[from] AnnotatorError),

  /// サポートされていない言語
  #[error("サポートされていない言語です: {language}")]
  UnsupportedLanguage {
    /// 指定された言語
    language: Language,
  },
}

/// keygram クレートの標準 Result 型エイリアス
pub type KeygramResult<T> = Result<T, KeygramError>;
