//! Enthusiasm, measured by net positive-lexicon density

use super::{CriterionRule, RuleDetails, RuleOutcome};
use crate::{Criterion, NormalizedText};
use serde::Serialize;

pub const POSITIVE_WORDS: &[&str] = &[
    "happy",
    "excited",
    "glad",
    "enjoy",
    "enjoying",
    "love",
    "like",
    "confident",
    "grateful",
    "thankful",
    "proud",
    "interested",
    "passionate",
    "fun",
    "great",
    "eager",
    "thrilled",
];

pub const NEGATIVE_WORDS: &[&str] = &[
    "boring", "tired", "sad", "nervous", "scared", "anxious", "worried", "hate", "dislike",
];

/// Score points per unit of net positive density: four net positive
/// words per hundred reach the cap.
const DENSITY_SCALE: f64 = 2500.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementDetails {
    /// Distinct positive terms in order of first appearance
    pub positive_terms: Vec<String>,
    pub negative_terms: Vec<String>,
    pub positive_count: usize,
    pub negative_count: usize,
    /// (positive - negative) / word count
    pub density: f64,
}

pub struct EngagementRule;

impl EngagementRule {
    pub fn new() -> Self {
        Self
    }

    fn matches(text: &NormalizedText, lexicon: &[&str]) -> (Vec<String>, usize) {
        let mut terms: Vec<String> = Vec::new();
        let mut count = 0;
        for word in text.words() {
            if lexicon.contains(&word.as_str()) {
                count += 1;
                if !terms.contains(word) {
                    terms.push(word.clone());
                }
            }
        }
        (terms, count)
    }
}

impl Default for EngagementRule {
    fn default() -> Self {
        Self::new()
    }
}

impl CriterionRule for EngagementRule {
    fn criterion(&self) -> Criterion {
        Criterion::Engagement
    }

    fn score(&self, text: &NormalizedText) -> RuleOutcome {
        let (positive_terms, positive_count) = Self::matches(text, POSITIVE_WORDS);
        let (negative_terms, negative_count) = Self::matches(text, NEGATIVE_WORDS);

        let word_count = text.word_count();
        let density = if word_count == 0 {
            0.0
        } else {
            (positive_count as f64 - negative_count as f64) / word_count as f64
        };

        RuleOutcome {
            score: (density * DENSITY_SCALE).clamp(0.0, 100.0),
            details: RuleDetails::Engagement(EngagementDetails {
                positive_terms,
                negative_terms,
                positive_count,
                negative_count,
                density,
            }),
        }
    }
}
