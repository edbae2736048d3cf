//! crates/keygram/tests/extraction_test.rs
//!
//! End-to-end integration test.
//! Verifies the entire flow: Build document -> Stem -> Generate candidates ->
//! Merge on the blackboard -> Statistics -> Score -> Rank.

use std::collections::HashMap;
use std::fs;

use tempfile::TempDir;

use keygram::annotators::{SnowballStemmer, StatisticalAnnotator};
use keygram::config::{KeygramConfig, Language};
use keygram::generator::{CandidateGenerator, GeneratorSet, NgramGenerator, PatternDictionary};
use keygram::models::annotation::{Annotable, Annotation};
use keygram::models::gram::{DEPTH, FREQUENCY, HEIGHT, LIFESPAN, NOUN_VALUE, SCORE};
use keygram::{Blackboard, DocumentBuilder, Gram, KeygramService, LinearEvaluator, Pipeline, Token};

// ─── Helpers ─────────────────────────────────────────────────────────────

fn tagged(words: &[(&str, &str)]) -> Vec<Token> {
  words.iter().map(|(text, pos)| Token::new(*text).with_pos(*pos)).collect()
}

fn nn_nn_dictionary() -> PatternDictionary {
  PatternDictionary::from_json_str(r#"[{"pattern": "NN/NN", "nounCount": 2}]"#, "test").unwrap()
}

/// stemmer -> generator -> statistics
fn upstream(generator: NgramGenerator) -> Pipeline {
  Pipeline::new()
    .with(SnowballStemmer::english())
    .with(GeneratorSet::new().with(generator))
    .with(StatisticalAnnotator::new())
}

// ─── Scenarios ───────────────────────────────────────────────────────────

/// Single-sentence document, `NN/NN -> 2` only.
#[test]
fn software_engineering_is_great() {
  let mut builder = DocumentBuilder::new();
  let sentence = builder.sentence(
    "Software Engineering is great",
    tagged(&[("Software", "NN"), ("Engineering", "NN"), ("is", "VB"), ("great", "JJ")]),
  );
  let root = builder.composite("Software Engineering is great", vec![sentence]);
  let root_id = root.id();

  let mut bb = Blackboard::new();
  bb.create_document("Software Engineering is great", root).unwrap();

  let generator =
    NgramGenerator::new(4, vec![Language::En]).with_dictionary(Language::En, nn_nn_dictionary());
  upstream(generator).run(&mut bb, root_id).unwrap();

  assert_eq!(bb.gram_count(), 1);
  let (_, gram) = bb.grams().next().unwrap();
  assert_eq!(gram.signature(), "softwar engin");
  assert_eq!(gram.surface(), "Software Engineering");
  assert_eq!(gram.feature(NOUN_VALUE), Some(2.0));
  assert_eq!(gram.feature(DEPTH), Some(1.0));
  assert_eq!(gram.feature(HEIGHT), Some(1.0));
  assert_eq!(gram.feature(LIFESPAN), Some(1.0));
  assert_eq!(gram.feature(FREQUENCY), Some(1.0));
}

/// `[NN, NN, VB]` with only `NN/NN` known: one width-2 candidate on tokens 0..2.
#[test]
fn only_the_width_two_window_is_emitted() {
  let generator = NgramGenerator::new(3, vec![Language::En]);
  let tokens = tagged(&[("data", "NN"), ("science", "NN"), ("matters", "VB")]);

  let grams = generator.scan(&tokens, &nn_nn_dictionary(), Language::En);
  assert_eq!(grams.len(), 1);
  assert_eq!(grams[0].tokens(), &tokens[0..2]);
}

/// Case variants across sections resolve to one canonical gram.
#[test]
fn occurrences_are_deduplicated_across_sections() {
  let mut builder = DocumentBuilder::new();
  let mut sections = Vec::new();
  let mut sentence_ids = Vec::new();
  for surface in [
    ("Software", "Engineering"),
    ("software", "engineering"),
    ("Software", "Engineering"),
    ("Software", "Engineering"),
  ] {
    let s = builder.sentence("", tagged(&[(surface.0, "NN"), (surface.1, "NN")]));
    sentence_ids.push(s.id());
    sections.push(builder.composite("", vec![s]));
  }
  let root = builder.composite("", sections);
  let root_id = root.id();

  let mut bb = Blackboard::new();
  bb.create_document("", root).unwrap();
  let generator =
    NgramGenerator::new(2, vec![Language::En]).with_dictionary(Language::En, nn_nn_dictionary());
  upstream(generator).run(&mut bb, root_id).unwrap();

  assert_eq!(bb.gram_count(), 1);
  let gram = bb.gram_by_signature("softwar engin").unwrap();
  assert_eq!(gram.appearances(), sentence_ids.as_slice());
  assert_eq!(gram.surface(), "Software Engineering");
  assert_eq!(gram.surfaces().len(), 2);
  assert_eq!(gram.feature(FREQUENCY), Some(4.0));
}

/// Token annotations of every merged occurrence end up on the canonical gram.
#[test]
fn merged_token_annotations_are_a_superset() {
  let mut builder = DocumentBuilder::new();
  let s1 = builder.sentence("", vec![]);
  let s2 = builder.sentence("", vec![]);
  let (id1, id2) = (s1.id(), s2.id());
  let root = builder.composite("", vec![s1, s2]);
  let mut bb = Blackboard::new();
  bb.create_document("", root).unwrap();

  let mut first = Token::new("graph").with_pos("NN");
  first.add_annotation(Annotation::single("ner", "O").unwrap());
  let mut second = Token::new("Graph").with_pos("NN");
  second.add_annotation(Annotation::single("coref", 7.0).unwrap());

  let id = bb.add_gram(id1, Gram::from_tokens(vec![first], " ")).unwrap();
  bb.add_gram(id2, Gram::from_tokens(vec![second], " ")).unwrap();

  let token = &bb.gram(id).unwrap().tokens()[0];
  assert!(token.has_annotation("ner"));
  assert!(token.has_annotation("coref"));
}

/// `{A: 2, B: 3}` weighted by `{A: 1.5}` scores 3.0.
#[test]
fn linear_score_ignores_unweighted_features() {
  let mut builder = DocumentBuilder::new();
  let s = builder.sentence("", vec![]);
  let sid = s.id();
  let root = builder.composite("", vec![s]);
  let root_id = root.id();
  let mut bb = Blackboard::new();
  bb.create_document("", root).unwrap();

  let gram = Gram::from_tokens(tagged(&[("x", "NN")]), " ")
    .with_feature("A", 2.0)
    .with_feature("B", 3.0);
  bb.add_gram(sid, gram).unwrap();

  let evaluator = LinearEvaluator::new(HashMap::from([("A".to_string(), 1.5)]), Pipeline::new());
  let scores = evaluator.evaluate(&mut bb, root_id).unwrap();
  assert_eq!(scores.get("x"), Some(&3.0));
  assert_eq!(bb.gram_by_signature("x").unwrap().feature(SCORE), Some(3.0));
}

/// Pattern file + config file on disk drive the whole service.
#[test]
fn service_uses_configured_pattern_file() {
  let temp_dir = TempDir::new().unwrap();
  let patterns = temp_dir.path().join("en.json");
  fs::write(&patterns, r#"[{"pattern": "NNP/NNP", "nounCount": 2}]"#).unwrap();
  let config_path = temp_dir.path().join("keygram.json");
  fs::write(
    &config_path,
    format!(
      r#"{{
        "generator": {{ "max_width": 2, "pattern_files": {{ "en": {patterns:?} }} }},
        "scoring": {{ "weights": {{ "Freq": 1.0 }}, "limit": 5 }}
      }}"#
    ),
  )
  .unwrap();

  let config = KeygramConfig::from_path(&config_path).unwrap();
  let service = KeygramService::init(&config).unwrap();

  let mut builder = DocumentBuilder::new();
  let s1 = builder.sentence(
    "New York is big",
    tagged(&[("New", "NNP"), ("York", "NNP"), ("is", "VBZ"), ("big", "JJ")]),
  );
  let s2 = builder.sentence(
    "I love New York",
    tagged(&[("I", "PRP"), ("love", "VBP"), ("New", "NNP"), ("York", "NNP")]),
  );
  let root = builder.composite("", vec![s1, s2]);

  let ranked = service.extract("", root, None).unwrap();
  assert_eq!(ranked.len(), 1);
  assert_eq!(ranked[0].surface, "New York");
  assert_eq!(ranked[0].score, 2.0);
  assert_eq!(ranked[0].frequency, 2.0);
}

/// Generators declare their languages; the set routes by sentence language.
#[test]
fn generator_languages_are_declared() {
  let mut generator = NgramGenerator::default();
  assert_eq!(generator.supported_languages(), &[Language::En]);
  generator.set_languages(vec![Language::En, Language::Ja]);
  assert!(generator.supports(Language::Ja));
}
