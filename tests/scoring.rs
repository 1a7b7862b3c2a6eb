//! Scoring pipeline tests: scenarios, stub embedders, rubric properties.

use introscore::analyzer::rules::{ClarityRule, CriterionRule, KeywordPresenceRule, RuleDetails};
use introscore::config::{Config, ScoringSettings};
use introscore::semantic::{Calibration, DisabledEmbedder, EmbedError, Embedder, SemanticScore};
use introscore::{Band, Criterion, NormalizedText, ScoringEngine};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const ASHA: &str = "Good morning everyone, my name is Asha, I am studying computer science, \
                    and I enjoy painting and reading.";

const FULL_INTRO: &str = "Hello everyone! I am excited to introduce myself. My name is Kiran \
    and my age is fourteen. I study in class nine at Green Valley School. I live with my \
    family in Mysore. My hobbies are cricket and drawing, and my interests include robotics. \
    My dream is to build helpful machines. I am proud of my first prize in the science \
    exhibition. Thank you!";

/// Maps each text to a vector keyed on its first letter, counting calls
struct CountingEmbedder {
    calls: Arc<AtomicUsize>,
}

impl Embedder for CountingEmbedder {
    fn id(&self) -> &str {
        "counting"
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let first = text.bytes().next().unwrap_or(b'a') as f32;
        Ok(vec![1.0, first / 255.0, 0.5])
    }
}

/// Fails every call
struct BrokenEmbedder;

impl Embedder for BrokenEmbedder {
    fn id(&self) -> &str {
        "broken"
    }

    fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbedError> {
        Err(EmbedError::Unavailable("model failed to load".to_string()))
    }
}

/// Serves the reference descriptions, then panics on the transcript
struct PanickingEmbedder;

impl Embedder for PanickingEmbedder {
    fn id(&self) -> &str {
        "panicking"
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        if Criterion::ALL.iter().any(|c| c.description() == text) {
            return Ok(vec![0.5, 0.5, 0.5]);
        }
        panic!("inference session poisoned");
    }
}

/// Panics before a single reference is embedded
struct PanicOnLoadEmbedder;

impl Embedder for PanicOnLoadEmbedder {
    fn id(&self) -> &str {
        "panic-on-load"
    }

    fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbedError> {
        panic!("weights file truncated");
    }
}

fn assert_rule_only(report: &introscore::ScoreReport) {
    assert!(!report.semantic.available);
    for c in &report.criteria {
        assert_eq!(c.semantic_score, None);
        assert_eq!(c.score, c.rule_score);
    }
}

fn rule_only() -> ScoringEngine {
    ScoringEngine::new(&ScoringSettings::default(), Box::new(DisabledEmbedder))
}

#[test]
fn asha_scenario() {
    let report = ScoringEngine::default().score(ASHA);
    assert_eq!(report.word_count, 18);
    assert_eq!(
        report.criterion(Criterion::Salutation).unwrap().rule_score,
        100.0
    );
    assert!(
        report
            .criterion(Criterion::KeywordPresence)
            .unwrap()
            .rule_score
            > 0.0
    );
    assert!(report.overall_score > 0.0 && report.overall_score < 100.0);
}

#[test]
fn empty_transcript_scenario() {
    let report = ScoringEngine::default().score("");
    assert_eq!(report.word_count, 0);
    assert_eq!(report.overall_score, 0.0);
    assert_eq!(report.criteria.len(), 8);
    for c in &report.criteria {
        assert_eq!(c.rule_score, 0.0, "{}", c.criterion);
    }
}

#[test]
fn filler_heavy_clarity_is_zero() {
    let report = rule_only().score("um um um um um um um um um um I went to school today");
    let clarity = report.criterion(Criterion::Clarity).unwrap();
    assert_eq!(clarity.rule_score, 0.0);
}

#[test]
fn overall_is_weighted_sum_of_combined() {
    let report = ScoringEngine::default().score(FULL_INTRO);
    let expected: f64 = report
        .criteria
        .iter()
        .map(|c| c.score * c.weight as f64 / 100.0)
        .sum();
    assert!((report.overall_score - expected).abs() < 1e-9);
    let weights: u32 = report.criteria.iter().map(|c| c.weight as u32).sum();
    assert_eq!(weights, 100);
}

#[test]
fn combined_follows_blend() {
    let report = ScoringEngine::default().score(FULL_INTRO);
    assert!(report.semantic.available);
    for c in &report.criteria {
        let semantic = c.semantic_score.expect("semantic score present");
        assert!((c.score - (0.6 * c.rule_score + 0.4 * semantic)).abs() < 1e-9);
    }
}

#[test]
fn complete_intro_beats_sparse_intro() {
    let engine = ScoringEngine::default();
    let full = engine.score(FULL_INTRO);
    let sparse = engine.score("I am Kiran.");
    assert!(full.overall_score > sparse.overall_score);
    assert!(matches!(full.band, Band::Good | Band::Excellent));
}

#[test]
fn scoring_is_idempotent() {
    let engine = ScoringEngine::default();
    let a = serde_json::to_string(&engine.score(FULL_INTRO)).unwrap();
    let b = serde_json::to_string(&engine.score(FULL_INTRO)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn reference_embeddings_computed_once_per_engine() {
    let calls = Arc::new(AtomicUsize::new(0));
    let engine = ScoringEngine::new(
        &ScoringSettings::default(),
        Box::new(CountingEmbedder {
            calls: Arc::clone(&calls),
        }),
    );
    assert_eq!(calls.load(Ordering::SeqCst), 8);

    engine.score(ASHA);
    engine.score(FULL_INTRO);
    assert_eq!(calls.load(Ordering::SeqCst), 10);
}

#[test]
fn broken_embedder_falls_back_to_rule_scores() {
    let engine = ScoringEngine::new(&ScoringSettings::default(), Box::new(BrokenEmbedder));
    let report = engine.score(FULL_INTRO);

    assert!(!report.semantic.available);
    assert_eq!(report.semantic.provider, "broken");
    assert!(report
        .semantic
        .reason
        .as_deref()
        .unwrap()
        .contains("model failed to load"));
    for c in &report.criteria {
        assert_eq!(c.semantic_score, None);
        assert_eq!(c.score, c.rule_score);
    }
}

#[test]
fn embedder_panic_on_transcript_falls_back_to_rule_scores() {
    let engine = ScoringEngine::new(&ScoringSettings::default(), Box::new(PanickingEmbedder));
    assert!(engine.semantic().is_available());

    let report = engine.score(FULL_INTRO);
    assert_rule_only(&report);
    assert!(report
        .semantic
        .reason
        .as_deref()
        .unwrap()
        .contains("inference session poisoned"));
    let expected = rule_only().score(FULL_INTRO);
    assert_eq!(report.overall_score, expected.overall_score);

    // The engine survives and serves the next request
    assert_rule_only(&engine.score(ASHA));
}

#[test]
fn embedder_panic_on_references_falls_back_to_rule_scores() {
    let engine = ScoringEngine::new(&ScoringSettings::default(), Box::new(PanicOnLoadEmbedder));
    assert!(!engine.semantic().is_available());
    let report = engine.score(FULL_INTRO);
    assert_rule_only(&report);
    assert!(report
        .semantic
        .reason
        .as_deref()
        .unwrap()
        .contains("weights file truncated"));
}

#[test]
fn inverted_calibration_falls_back_to_rule_scores() {
    let settings = ScoringSettings {
        calibration: Calibration::new(1.0, -1.0),
        ..ScoringSettings::default()
    };
    let engine = ScoringEngine::new(
        &settings,
        introscore::config::build_embedder(&Config::default().embedder_settings()),
    );
    let report = engine.score(FULL_INTRO);
    assert_rule_only(&report);
    assert!(report
        .semantic
        .reason
        .as_deref()
        .unwrap()
        .contains("invalid calibration"));
}

#[test]
fn narrow_calibration_changes_semantic_scores_only() {
    let wide = ScoringEngine::default().score(FULL_INTRO);
    let settings = ScoringSettings {
        calibration: Calibration::new(0.0, 0.5),
        ..ScoringSettings::default()
    };
    let narrow = ScoringEngine::new(
        &settings,
        introscore::config::build_embedder(&Config::default().embedder_settings()),
    )
    .score(FULL_INTRO);

    for (w, n) in wide.criteria.iter().zip(&narrow.criteria) {
        assert_eq!(w.rule_score, n.rule_score);
        let (wide_sim, narrow_sim) = match (&w.details.semantic, &n.details.semantic) {
            (
                SemanticScore::Available { similarity: a, .. },
                SemanticScore::Available { similarity: b, .. },
            ) => (*a, *b),
            _ => panic!("semantic scores should be available"),
        };
        // Calibration rescales the score, never the similarity
        assert_eq!(wide_sim, narrow_sim);
        assert_eq!(
            n.semantic_score.unwrap(),
            settings.calibration.normalize(narrow_sim)
        );
    }
}

#[test]
fn assumed_duration_changes_speech_rate() {
    let long = ScoringSettings {
        assumed_duration_secs: 30.0,
        ..ScoringSettings::default()
    };
    let default_report = rule_only().score(FULL_INTRO);
    let fast_report =
        ScoringEngine::new(&long, Box::new(DisabledEmbedder)).score(FULL_INTRO);

    let wpm = |r: &introscore::ScoreReport| match r
        .criterion(Criterion::SpeechRate)
        .unwrap()
        .details
        .rule
        .as_ref()
    {
        Some(RuleDetails::SpeechRate(d)) => d.wpm_estimate,
        _ => panic!("speech rate details missing"),
    };
    assert!((wpm(&fast_report) - 2.0 * wpm(&default_report)).abs() < 1e-9);
}

mod proptest_tests {
    use super::*;
    use introscore::analyzer::rules::clarity::FILLER_WORDS;
    use proptest::prelude::*;

    /// Fillers mixed with plain words, including the halves of multi-word fillers
    fn word_pool() -> Vec<&'static str> {
        let plain = ["my", "name", "is", "you", "know", "i", "mean", "sort", "of", "school", "ravi"];
        FILLER_WORDS.iter().copied().chain(plain).collect()
    }

    fn single_token_fillers() -> Vec<&'static str> {
        FILLER_WORDS
            .iter()
            .copied()
            .filter(|f| !f.contains(' '))
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn scores_stay_in_bounds(text in "[a-zA-Z ,.!?']{0,200}") {
            let report = rule_only().score(&text);
            prop_assert!((0.0..=100.0).contains(&report.overall_score));
            for c in &report.criteria {
                prop_assert!((0.0..=100.0).contains(&c.score));
                prop_assert!((0.0..=100.0).contains(&c.rule_score));
            }
        }

        #[test]
        fn appending_must_have_keyword_never_lowers_keyword_score(
            text in "[a-z ]{0,120}",
            keyword in prop::sample::select(vec!["name", "age", "class", "school", "family", "hobby"]),
        ) {
            let rule = KeywordPresenceRule::new();
            let before = rule.score(&NormalizedText::new(&text)).score;
            let after = rule.score(&NormalizedText::new(&format!("{} {}", text, keyword))).score;
            prop_assert!(after >= before);
        }

        #[test]
        fn inserting_filler_never_raises_clarity(
            words in prop::collection::vec(prop::sample::select(word_pool()), 1..30),
            filler in prop::sample::select(single_token_fillers()),
            position in any::<prop::sample::Index>(),
        ) {
            let rule = ClarityRule::new();
            let before = rule.score(&NormalizedText::new(&words.join(" "))).score;
            let mut padded = words.clone();
            padded.insert(position.index(words.len() + 1), filler);
            let after = rule.score(&NormalizedText::new(&padded.join(" "))).score;
            prop_assert!(after <= before, "{:?} -> {:?}", words, padded);
        }

        #[test]
        fn appending_any_filler_never_raises_clarity(
            words in prop::collection::vec(prop::sample::select(word_pool()), 1..30),
            filler in prop::sample::select(FILLER_WORDS.to_vec()),
        ) {
            let rule = ClarityRule::new();
            let text = words.join(" ");
            let before = rule.score(&NormalizedText::new(&text)).score;
            let after = rule.score(&NormalizedText::new(&format!("{} {}", text, filler))).score;
            prop_assert!(after <= before);
        }
    }
}
