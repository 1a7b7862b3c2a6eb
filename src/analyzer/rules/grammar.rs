//! Heuristic sentence-structure score (no grammar checker involved)

use super::{CriterionRule, RuleDetails, RuleOutcome};
use crate::{Criterion, NormalizedText};
use serde::Serialize;

const BASELINE_SCORE: f64 = 100.0;

/// (average sentence length above, penalty), checked longest first
const LONG_SENTENCE_PENALTIES: &[(f64, f64)] = &[(25.0, 25.0), (18.0, 15.0), (12.0, 5.0)];
/// (average sentence length below, penalty), checked shortest first
const SHORT_SENTENCE_PENALTIES: &[(f64, f64)] = &[(3.0, 20.0), (5.0, 10.0)];
/// ("and" share of all words above, penalty), checked highest first
const AND_OVERUSE_PENALTIES: &[(f64, f64)] = &[(0.12, 20.0), (0.08, 10.0)];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrammarDetails {
    pub sentence_count: usize,
    pub avg_sentence_length: f64,
    pub and_count: usize,
    pub and_ratio: f64,
}

/// Rule penalizing run-on or fragmentary sentences and "and" chaining
pub struct GrammarRule;

impl GrammarRule {
    pub fn new() -> Self {
        Self
    }

    fn sentence_length_penalty(avg_len: f64) -> f64 {
        if let Some((_, penalty)) = LONG_SENTENCE_PENALTIES
            .iter()
            .find(|(limit, _)| avg_len > *limit)
        {
            return *penalty;
        }
        SHORT_SENTENCE_PENALTIES
            .iter()
            .find(|(limit, _)| avg_len < *limit)
            .map_or(0.0, |(_, penalty)| *penalty)
    }

    fn and_penalty(ratio: f64) -> f64 {
        AND_OVERUSE_PENALTIES
            .iter()
            .find(|(limit, _)| ratio > *limit)
            .map_or(0.0, |(_, penalty)| *penalty)
    }
}

impl Default for GrammarRule {
    fn default() -> Self {
        Self::new()
    }
}

impl CriterionRule for GrammarRule {
    fn criterion(&self) -> Criterion {
        Criterion::Grammar
    }

    fn score(&self, text: &NormalizedText) -> RuleOutcome {
        let word_count = text.word_count();
        let sentence_count = text.sentence_count();
        let and_count = text.words().iter().filter(|w| *w == "and").count();

        if word_count == 0 {
            return RuleOutcome {
                score: 0.0,
                details: RuleDetails::Grammar(GrammarDetails {
                    sentence_count,
                    avg_sentence_length: 0.0,
                    and_count,
                    and_ratio: 0.0,
                }),
            };
        }

        let avg_sentence_length = word_count as f64 / sentence_count.max(1) as f64;
        let and_ratio = and_count as f64 / word_count as f64;

        let score = (BASELINE_SCORE
            - Self::sentence_length_penalty(avg_sentence_length)
            - Self::and_penalty(and_ratio))
        .clamp(0.0, 100.0);

        RuleOutcome {
            score,
            details: RuleDetails::Grammar(GrammarDetails {
                sentence_count,
                avg_sentence_length,
                and_count,
                and_ratio,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(text: &str) -> (f64, GrammarDetails) {
        let outcome = GrammarRule::new().score(&NormalizedText::new(text));
        match outcome.details {
            RuleDetails::Grammar(d) => (outcome.score, d),
            other => panic!("unexpected details: {:?}", other),
        }
    }

    #[test]
    fn test_well_formed_sentences_score_full() {
        let (s, d) = score(
            "My name is Meera and I live in Chennai. I study in the seventh grade. \
             I like to read mystery novels on weekends.",
        );
        assert_eq!(d.sentence_count, 3);
        assert_eq!(s, 100.0);
    }

    #[test]
    fn test_long_run_on_sentence_penalized() {
        let text = "I live here and I study there and I play cricket and I read books \
                    and I watch films and I go out and I come back home late";
        let (s, d) = score(text);
        assert_eq!(d.sentence_count, 1);
        assert!(d.avg_sentence_length > 25.0);
        assert_eq!(d.and_count, 6);
        // -25 for length, -20 for "and" overuse
        assert_eq!(s, 55.0);
    }

    #[test]
    fn test_fragments_penalized() {
        let (s, d) = score("Hi. Me. Ravi. Ten. Yes.");
        assert_eq!(d.sentence_count, 5);
        assert_eq!(s, 80.0);
    }

    #[test]
    fn test_moderate_and_usage() {
        // 2 of 18 words (0.11) are "and"
        let (s, d) = score(
            "Good morning everyone, my name is Asha, I am studying computer science, \
             and I enjoy painting and reading.",
        );
        assert_eq!(d.and_count, 2);
        // -5 for 18-word sentence, -10 for "and" ratio
        assert_eq!(s, 85.0);
    }

    #[test]
    fn test_empty_transcript() {
        let (s, d) = score("");
        assert_eq!(s, 0.0);
        assert_eq!(d.and_count, 0);
        assert_eq!(d.sentence_count, 0);
    }
}
