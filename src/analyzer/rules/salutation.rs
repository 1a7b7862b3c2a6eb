//! Greeting detection at the opening of the introduction

use super::{CriterionRule, RuleDetails, RuleOutcome};
use crate::{Criterion, NormalizedText};
use serde::Serialize;

/// Plain one-word greetings
pub const NORMAL_GREETINGS: &[&str] = &["hi", "hello", "hey"];

/// Polite time-of-day greetings
pub const GOOD_GREETINGS: &[&str] = &[
    "good morning",
    "good afternoon",
    "good evening",
    "good day",
    "hello everyone",
    "greetings",
];

/// Enthusiastic openers
pub const EXCELLENT_GREETINGS: &[&str] = &[
    "i am excited to introduce",
    "i'm excited to introduce",
    "feeling great",
    "i am very excited",
    "i'm very excited",
];

/// A greeting starting within this many words counts as "at the start"
const OPENING_WINDOW_WORDS: usize = 5;
const GREETING_AT_START_SCORE: f64 = 100.0;
const GREETING_LATER_SCORE: f64 = 40.0;

/// Strength of the best greeting found
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum GreetingLevel {
    None,
    Normal,
    Good,
    Excellent,
}

impl std::fmt::Display for GreetingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GreetingLevel::None => write!(f, "None"),
            GreetingLevel::Normal => write!(f, "Normal"),
            GreetingLevel::Good => write!(f, "Good"),
            GreetingLevel::Excellent => write!(f, "Excellent"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalutationDetails {
    /// Earliest greeting phrase found
    pub matched: Option<String>,
    /// Word index of the earliest greeting
    pub position: Option<usize>,
    /// Best greeting level anywhere in the transcript
    pub level: GreetingLevel,
    pub at_start: bool,
}

/// A greeting phrase located in the transcript
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreetingMatch {
    pub phrase: &'static str,
    pub position: usize,
    pub level: GreetingLevel,
}

impl GreetingMatch {
    /// Word index just past the phrase
    pub fn end(&self) -> usize {
        self.position + crate::text::tokenize(self.phrase).len()
    }
}

fn greeting_tiers() -> [(&'static [&'static str], GreetingLevel); 3] {
    [
        (EXCELLENT_GREETINGS, GreetingLevel::Excellent),
        (GOOD_GREETINGS, GreetingLevel::Good),
        (NORMAL_GREETINGS, GreetingLevel::Normal),
    ]
}

/// All greeting phrases found, strongest tier first.
///
/// Phrases match whole-word token sequences rather than substrings, so "hi"
/// is never found inside "this" and "hey" never inside "they".
pub fn find_greetings(text: &NormalizedText) -> Vec<GreetingMatch> {
    let mut found = Vec::new();
    for (phrases, level) in greeting_tiers() {
        for phrase in phrases {
            if let Some(position) = text.find_phrase(phrase) {
                found.push(GreetingMatch {
                    phrase,
                    position,
                    level,
                });
            }
        }
    }
    found
}

/// Earliest greeting; ties go to the stronger tier
pub fn earliest_greeting(text: &NormalizedText) -> Option<GreetingMatch> {
    find_greetings(text).into_iter().min_by_key(|m| m.position)
}

/// Rule for the opening greeting
pub struct SalutationRule;

impl SalutationRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SalutationRule {
    fn default() -> Self {
        Self::new()
    }
}

impl CriterionRule for SalutationRule {
    fn criterion(&self) -> Criterion {
        Criterion::Salutation
    }

    fn score(&self, text: &NormalizedText) -> RuleOutcome {
        let greetings = find_greetings(text);
        let level = greetings
            .iter()
            .map(|m| m.level)
            .max()
            .unwrap_or(GreetingLevel::None);
        let earliest = greetings.iter().min_by_key(|m| m.position).copied();

        let at_start = earliest.is_some_and(|m| m.position < OPENING_WINDOW_WORDS);
        let score = match earliest {
            Some(_) if at_start => GREETING_AT_START_SCORE,
            Some(_) => GREETING_LATER_SCORE,
            None => 0.0,
        };

        RuleOutcome {
            score,
            details: RuleDetails::Salutation(SalutationDetails {
                matched: earliest.map(|m| m.phrase.to_string()),
                position: earliest.map(|m| m.position),
                level,
                at_start,
            }),
        }
    }
}
