//! Scoring engine - orchestrates the rule and semantic analyzers

use crate::config::{build_embedder, Config, ScoringSettings};
use crate::feedback::FeedbackGenerator;
use crate::semantic::{Embedder, SemanticAnalyzer};
use crate::{
    panic_message, AggregateStats, Band, Criterion, CriterionDetails, CriterionResult,
    NormalizedText, ScoreReport,
};
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, warn};

use super::rules::{rubric_rules, CriterionRule, RuleOutcome};
use super::scoring::{CriterionInput, ScoreCalculator};

/// Request-level scoring failure
#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    #[error("transcript is not valid UTF-8 text: {0}")]
    InvalidText(#[from] std::str::Utf8Error),
}

/// Main scoring engine. Holds the rule analyzers and the semantic analyzer
/// with its precomputed reference embeddings; scoring never mutates it, so
/// one engine can serve concurrent requests.
pub struct ScoringEngine {
    /// Rule analyzers in rubric order
    rules: Vec<Box<dyn CriterionRule>>,
    semantic: SemanticAnalyzer,
    feedback: FeedbackGenerator,
}

impl ScoringEngine {
    /// Create an engine with the given settings and embedding provider.
    /// Reference descriptions are embedded here, before the first request.
    pub fn new(settings: &ScoringSettings, embedder: Box<dyn Embedder>) -> Self {
        Self {
            rules: rubric_rules(settings.assumed_duration_secs),
            semantic: SemanticAnalyzer::new(embedder, settings.calibration),
            feedback: FeedbackGenerator::new(),
        }
    }

    /// Create an engine from a loaded config
    pub fn from_config(config: &Config) -> Self {
        let embedder = build_embedder(&config.embedder_settings());
        Self::new(&config.scoring_settings(), embedder)
    }

    /// Replace the rule analyzer for its criterion
    pub fn with_rule(mut self, rule: Box<dyn CriterionRule>) -> Self {
        let index = rule.criterion().index();
        self.rules[index] = rule;
        self
    }

    pub fn semantic(&self) -> &SemanticAnalyzer {
        &self.semantic
    }

    /// Score raw bytes; fails only when they are not UTF-8 text
    pub fn score_bytes(&self, bytes: &[u8]) -> Result<ScoreReport, ScoreError> {
        let transcript = std::str::from_utf8(bytes)?;
        Ok(self.score(transcript))
    }

    /// Score a transcript against the full rubric
    pub fn score(&self, transcript: &str) -> ScoreReport {
        let start = Instant::now();
        let text = NormalizedText::new(transcript);

        // Rules and the semantic analyzer share only the read-only text
        let (rule_outcomes, semantic) =
            rayon::join(|| self.run_rules(&text), || self.semantic.analyze(&text));

        let inputs: Vec<CriterionInput> = Criterion::ALL
            .iter()
            .map(|&c| CriterionInput {
                rule_score: rule_outcomes[c.index()]
                    .as_ref()
                    .map(|o| o.score)
                    .unwrap_or(0.0),
                semantic_score: semantic.scores[c.index()].score(),
                weight: c.weight(),
            })
            .collect();
        let aggregate = ScoreCalculator::aggregate(&inputs);

        let criteria: Vec<CriterionResult> = Criterion::ALL
            .iter()
            .zip(rule_outcomes)
            .zip(semantic.scores)
            .map(|((&criterion, outcome), semantic_score)| {
                let score = aggregate.combined[criterion.index()];
                let input = &inputs[criterion.index()];
                let (rule, error) = match outcome {
                    Ok(o) => (Some(o.details), None),
                    Err(e) => (None, Some(e)),
                };
                CriterionResult {
                    criterion,
                    score,
                    rule_score: ScoreCalculator::clamp_score(input.rule_score),
                    semantic_score: input.semantic_score,
                    weight: input.weight,
                    feedback: self.feedback.feedback(criterion, score, rule.as_ref()),
                    details: CriterionDetails {
                        rule,
                        semantic: semantic_score,
                        error,
                    },
                }
            })
            .collect();

        let recommendations = self.feedback.recommendations(&criteria);

        debug!(
            words = text.word_count(),
            overall = aggregate.overall,
            semantic = semantic.status.available,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "transcript scored"
        );

        ScoreReport {
            source: None,
            overall_score: aggregate.overall,
            band: Band::from_score(aggregate.overall),
            word_count: text.word_count(),
            semantic: semantic.status,
            criteria,
            recommendations,
        }
    }

    /// Run every rule; a panicking rule is reported as an error for its criterion only
    fn run_rules(&self, text: &NormalizedText) -> Vec<Result<RuleOutcome, String>> {
        self.rules
            .par_iter()
            .map(|rule| {
                panic::catch_unwind(AssertUnwindSafe(|| rule.score(text))).map_err(|payload| {
                    let message = panic_message(payload.as_ref());
                    warn!(criterion = %rule.criterion(), error = %message, "rule analyzer failed");
                    format!("analyzer failed: {}", message)
                })
            })
            .collect()
    }

    /// Get aggregate stats from multiple reports
    pub fn aggregate_stats(reports: &[ScoreReport]) -> AggregateStats {
        ScoreCalculator::aggregate_stats(reports)
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
