//! Lexical variety via type-token ratio

use super::{CriterionRule, RuleDetails, RuleOutcome};
use crate::{Criterion, NormalizedText};
use serde::Serialize;

/// TTR at or above this maps to a full score. Short transcripts naturally
/// have a high TTR, so the scale saturates before 1.0.
const TTR_CEILING: f64 = 0.9;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VocabularyDetails {
    pub unique_words: usize,
    pub total_words: usize,
    pub ttr: f64,
}

pub struct VocabularyRule;

impl VocabularyRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for VocabularyRule {
    fn default() -> Self {
        Self::new()
    }
}

impl CriterionRule for VocabularyRule {
    fn criterion(&self) -> Criterion {
        Criterion::Vocabulary
    }

    fn score(&self, text: &NormalizedText) -> RuleOutcome {
        let total_words = text.word_count();
        let unique_words = text.unique_word_count();
        let ttr = if total_words == 0 {
            0.0
        } else {
            unique_words as f64 / total_words as f64
        };

        RuleOutcome {
            score: (ttr / TTR_CEILING * 100.0).clamp(0.0, 100.0),
            details: RuleDetails::Vocabulary(VocabularyDetails {
                unique_words,
                total_words,
                ttr,
            }),
        }
    }
}
