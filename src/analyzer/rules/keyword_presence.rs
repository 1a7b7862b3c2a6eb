//! Coverage of the personal details an introduction is expected to mention

use super::{CriterionRule, RuleDetails, RuleOutcome};
use crate::{Criterion, NormalizedText};
use serde::Serialize;

pub const MUST_HAVE_KEYWORDS: &[&str] = &[
    "name", "age", "class", "school", "family", "hobby", "hobbies", "interests",
];

pub const GOOD_TO_HAVE_KEYWORDS: &[&str] = &[
    "from",
    "goal",
    "dream",
    "ambition",
    "unique",
    "strength",
    "achievement",
    "fun fact",
];

const MUST_HAVE_POINTS: u32 = 4;
const GOOD_TO_HAVE_POINTS: u32 = 2;
/// Points needed for a full score; all must-haves alone exceed it
const MAX_POINTS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordDetails {
    pub must_have_found: Vec<String>,
    pub must_have_missing: Vec<String>,
    pub good_to_have_found: Vec<String>,
    pub good_to_have_missing: Vec<String>,
    pub points: u32,
}

/// Rule for must-have / good-to-have keyword coverage (substring match)
pub struct KeywordPresenceRule;

impl KeywordPresenceRule {
    pub fn new() -> Self {
        Self
    }

    fn partition(text: &NormalizedText, keywords: &[&str]) -> (Vec<String>, Vec<String>) {
        let (found, missing): (Vec<&str>, Vec<&str>) = keywords
            .iter()
            .partition(|kw| !text.is_empty() && text.contains_substring(kw));
        (
            found.into_iter().map(String::from).collect(),
            missing.into_iter().map(String::from).collect(),
        )
    }
}

impl Default for KeywordPresenceRule {
    fn default() -> Self {
        Self::new()
    }
}

impl CriterionRule for KeywordPresenceRule {
    fn criterion(&self) -> Criterion {
        Criterion::KeywordPresence
    }

    fn score(&self, text: &NormalizedText) -> RuleOutcome {
        let (must_have_found, must_have_missing) = Self::partition(text, MUST_HAVE_KEYWORDS);
        let (good_to_have_found, good_to_have_missing) =
            Self::partition(text, GOOD_TO_HAVE_KEYWORDS);

        let points = (must_have_found.len() as u32 * MUST_HAVE_POINTS
            + good_to_have_found.len() as u32 * GOOD_TO_HAVE_POINTS)
            .min(MAX_POINTS);
        let score = (points as f64 / MAX_POINTS as f64 * 100.0).clamp(0.0, 100.0);

        RuleOutcome {
            score,
            details: RuleDetails::Keywords(KeywordDetails {
                must_have_found,
                must_have_missing,
                good_to_have_found,
                good_to_have_missing,
                points,
            }),
        }
    }
}
