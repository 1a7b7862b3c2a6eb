//! Filler-word rate

use super::{CriterionRule, RuleDetails, RuleOutcome};
use crate::text::{count_sequence, tokenize};
use crate::{Criterion, NormalizedText};
use serde::Serialize;
use std::collections::BTreeMap;

pub const FILLER_WORDS: &[&str] = &[
    "um", "uh", "like", "you know", "so", "actually", "basically", "right", "i mean", "well",
    "kinda", "sort of", "okay", "ok", "hmm", "ah", "er", "erm",
];

/// Points lost per percentage point of filler words
const PENALTY_PER_FILLER_PERCENT: f64 = 6.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClarityDetails {
    pub filler_count: usize,
    pub filler_rate_percent: f64,
    /// Count per filler that occurred at least once
    pub fillers_found: BTreeMap<String, usize>,
}

pub struct ClarityRule;

impl ClarityRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ClarityRule {
    fn default() -> Self {
        Self::new()
    }
}

impl CriterionRule for ClarityRule {
    fn criterion(&self) -> Criterion {
        Criterion::Clarity
    }

    fn score(&self, text: &NormalizedText) -> RuleOutcome {
        let (single, multi): (Vec<&str>, Vec<&str>) = FILLER_WORDS
            .iter()
            .copied()
            .partition(|f| !f.contains(' '));

        let mut fillers_found: BTreeMap<String, usize> = single
            .iter()
            .map(|filler| (filler.to_string(), text.count_phrase(filler)))
            .collect();

        // Multi-word fillers are matched with single-token fillers removed,
        // so an inserted "um" cannot break up a "you know"
        let remaining: Vec<&str> = text
            .words()
            .iter()
            .map(String::as_str)
            .filter(|w| !single.contains(w))
            .collect();
        for filler in multi {
            let count = count_sequence(&remaining, &tokenize(filler));
            fillers_found.insert(filler.to_string(), count);
        }
        fillers_found.retain(|_, count| *count > 0);
        let filler_count: usize = fillers_found.values().sum();

        let word_count = text.word_count();
        let (score, filler_rate_percent) = if word_count == 0 {
            (0.0, 0.0)
        } else {
            let rate = filler_count as f64 / word_count as f64 * 100.0;
            (
                (100.0 - rate * PENALTY_PER_FILLER_PERCENT).clamp(0.0, 100.0),
                rate,
            )
        };

        RuleOutcome {
            score,
            details: RuleDetails::Clarity(ClarityDetails {
                filler_count,
                filler_rate_percent,
                fillers_found,
            }),
        }
    }
}
