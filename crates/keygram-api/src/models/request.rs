//! リクエストモデル定義

use serde::Deserialize;

use keygram::{DocumentBuilder, DocumentComponent, Language, Token};

/// キーフレーズ抽出リクエスト
///
/// ドキュメント → セクション → 文 → トークンの木構造で受け取る。
/// 日本語の文はトークンを省略でき、その場合はサーバー側の形態素解析に任せる。
#[derive(Debug, Deserialize)]
pub struct KeyphraseRequest {
  /// ドキュメント全体の言語（未指定の場合はセクション・文の指定に従う）
  #[serde(default)]
  pub language: Option<Language>,
  /// セクションの並び
  pub sections: Vec<SectionDto>,
  /// 返却件数（未指定の場合は設定値）
  #[serde(default)]
  pub limit: Option<usize>,
}

/// セクション
#[derive(Debug, Deserialize)]
pub struct SectionDto {
  /// セクションの言語
  #[serde(default)]
  pub language: Option<Language>,
  /// 文の並び
  pub sentences: Vec<SentenceDto>,
}

/// 文
#[derive(Debug, Deserialize)]
pub struct SentenceDto {
  /// 文のテキスト（省略時はトークンから組み立てる）
  #[serde(default)]
  pub text: String,
  /// 品詞タグ付きトークン
  #[serde(default)]
  pub tokens: Vec<TokenInputDto>,
}

/// 入力トークン
#[derive(Debug, Deserialize)]
pub struct TokenInputDto {
  /// 表層形
  pub text: String,
  /// 品詞タグ
  #[serde(default)]
  pub pos: Option<String>,
  /// ステム（省略時は英語ステマーが補完する）
  #[serde(default)]
  pub stem: Option<String>,
  /// 原形
  #[serde(default)]
  pub lemma: Option<String>,
}

impl TokenInputDto {
  fn into_token(self) -> Token {
    let mut token = Token::new(self.text);
    if let Some(pos) = self.pos {
      token = token.with_pos(pos);
    }
    if let Some(stem) = self.stem {
      token = token.with_stem(stem);
    }
    if let Some(lemma) = self.lemma {
      token = token.with_lemma(lemma);
    }
    token
  }
}

impl KeyphraseRequest {
  /// 文の総数
  #[must_use]
  pub fn sentence_count(&self) -> usize {
    self.sections.iter().map(|s| s.sentences.len()).sum()
  }

  /// 文テキストとトークンテキストの合計バイト数
  #[must_use]
  pub fn text_len(&self) -> usize {
    self
      .sections
      .iter()
      .flat_map(|section| &section.sentences)
      .map(|sentence| {
        sentence.text.len() + sentence.tokens.iter().map(|t| t.text.len()).sum::<usize>()
      })
      .sum()
  }

  /// ドキュメント木に変換する。
  ///
  /// 戻り値は `(元テキスト, ルートコンポーネント)`。元テキストは文テキストを改行で連結したもの。
  /// コンポーネント ID は [`DocumentBuilder`] が連番で振るため重複しない。
  #[must_use]
  pub fn into_document(self) -> (String, DocumentComponent) {
    let mut builder = DocumentBuilder::new();
    let mut lines = Vec::with_capacity(self.sentence_count());
    let mut sections = Vec::with_capacity(self.sections.len());

    for section in self.sections {
      let language = section.language.or(self.language);
      let separator = language.unwrap_or(Language::En).token_separator();

      let mut sentences = Vec::with_capacity(section.sentences.len());
      for sentence in section.sentences {
        let text = if sentence.text.is_empty() {
          sentence.tokens.iter().map(|t| t.text.as_str()).collect::<Vec<_>>().join(separator)
        } else {
          sentence.text
        };
        lines.push(text.clone());

        let tokens = sentence.tokens.into_iter().map(TokenInputDto::into_token).collect();
        sentences.push(builder.sentence(text, tokens));
      }

      let mut composite = builder.composite("", sentences);
      if let Some(language) = section.language {
        composite = composite.with_language(language);
      }
      sections.push(composite);
    }

    let raw_text = lines.join("\n");
    let mut root = builder.composite(raw_text.clone(), sections);
    if let Some(language) = self.language {
      root = root.with_language(language);
    }
    (raw_text, root)
  }
}
