// crates/keygram/src/service.rs

//! KeygramService: keygram クレートの統合ファサード。
//!
//! - 日本語タガー (VibratoTagger) ※ dictionary 設定時のみ
//! - ステマー (SnowballStemmer)
//! - 候補生成 (GeneratorSet + NgramGenerator)
//! - 統計量 (StatisticalAnnotator)
//! - スコアリング (LinearEvaluator)
//!
//! 外部からは、この構造体だけを意識すればよい。ドキュメントごとに新しい Blackboard を作るため、
//! 1つのサービスを複数スレッドから共有できる。

use std::time::Instant;

use tracing::info;

use crate::annotators::{SnowballStemmer, StatisticalAnnotator, VibratoTagger};
use crate::blackboard::Blackboard;
use crate::config::KeygramConfig;
use crate::dictionary::DictionaryManager;
use crate::document::DocumentComponent;
use crate::errors::KeygramResult;
use crate::evaluator::{LinearEvaluator, RankedKeyphrase};
use crate::generator::{GeneratorSet, NgramGenerator};
use crate::pipeline::Pipeline;

/// keygram クレートの統合ファサード。
#[derive(Debug)]
pub struct KeygramService {
  /// 上流パイプラインを内包する評価器
  evaluator: LinearEvaluator,

  /// limit 未指定時の返却件数
  default_limit: usize,

  /// 辞書マネージャ（日本語タガー用）
  dictionary_manager: Option<DictionaryManager>,
}

impl KeygramService {
  /// 初期化（設定検証 + 辞書ロード + パイプライン構築）
  ///
  /// # 処理フロー
  /// 1. 設定の妥当性を検証
  /// 2. dictionary 設定がある場合のみ DictionaryManager を構築し、辞書をロード
  /// 3. tagger? → stemmer → generators → statistics の順でパイプラインを構築
  ///
  /// # エラー
  /// - 設定が不正
  /// - 辞書ロード失敗
  pub fn init(config: &KeygramConfig) -> KeygramResult<Self> {
    config.validate()?;

    let mut upstream = Pipeline::new();

    let dictionary_manager = match &config.dictionary {
      Some(dictionary) => {
        let manager = DictionaryManager::from_config(dictionary)?;
        let dict = manager.load()?;
        upstream.push(Box::new(VibratoTagger::from_shared_dictionary(dict)));
        Some(manager)
      }
      None => None,
    };

    upstream.push(Box::new(SnowballStemmer::english()));
    upstream.push(Box::new(
      GeneratorSet::new().with(NgramGenerator::from_config(config)),
    ));
    upstream.push(Box::new(StatisticalAnnotator::new()));

    info!(stages = ?upstream.names(), "keygram pipeline assembled");

    Ok(Self {
      evaluator: LinearEvaluator::new(config.weights().clone(), upstream),
      default_limit: config.default_limit(),
      dictionary_manager,
    })
  }

  /// 任意の評価器からサービスを構築する（独自のパイプライン構成用）。
  pub fn with_evaluator(evaluator: LinearEvaluator, default_limit: usize) -> Self {
    Self {
      evaluator,
      default_limit,
      dictionary_manager: None,
    }
  }

  /// 評価器への参照
  pub fn evaluator(&self) -> &LinearEvaluator {
    &self.evaluator
  }

  /// limit 未指定時の返却件数
  pub fn default_limit(&self) -> usize {
    self.default_limit
  }

  /// 辞書マネージャへの参照（日本語タガー無効時は None）
  pub fn dictionary_manager(&self) -> Option<&DictionaryManager> {
    self.dictionary_manager.as_ref()
  }

  /// ドキュメントからキーフレーズを抽出する。
  ///
  /// # 引数
  /// - `raw_text`: ドキュメント全体の元テキスト
  /// - `root`: ドキュメント木（コンポーネント ID は一意であること）
  /// - `limit`: 返却件数（None の場合は設定値）
  ///
  /// # エラー
  /// - コンポーネント ID の重複
  /// - いずれかのアノテーターの失敗（アノテーター名付きで返る）
  pub fn extract(
    &self,
    raw_text: &str,
    root: DocumentComponent,
    limit: Option<usize>,
  ) -> KeygramResult<Vec<RankedKeyphrase>> {
    let start = Instant::now();
    let root_id = root.id();

    let mut blackboard = Blackboard::new();
    blackboard.create_document(raw_text, root)?;
    self.evaluator.evaluate(&mut blackboard, root_id)?;

    let keyphrases = self.evaluator.rank(&blackboard, limit.unwrap_or(self.default_limit));
    info!(
      grams = blackboard.gram_count(),
      returned = keyphrases.len(),
      elapsed_ms = start.elapsed().as_millis() as u64,
      "keyphrases extracted"
    );
    Ok(keyphrases)
  }
}
