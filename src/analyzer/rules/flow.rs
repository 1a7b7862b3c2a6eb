//! Structural order: greeting, then self-identification, then extra details

use super::salutation::{find_greetings, GreetingMatch};
use super::{CriterionRule, RuleDetails, RuleOutcome};
use crate::{Criterion, NormalizedText};
use serde::Serialize;

pub const IDENTIFICATION_CUES: &[&str] = &["my name is", "i am", "i'm", "myself", "this is"];

pub const EXTRA_DETAIL_CUES: &[&str] = &[
    "hobby",
    "hobbies",
    "goal",
    "goals",
    "dream",
    "enjoy",
    "love",
    "interests",
    "passion",
    "fun fact",
];

const ALL_SECTIONS_IN_ORDER_SCORE: f64 = 100.0;
const TWO_SECTIONS_IN_ORDER_SCORE: f64 = 70.0;
/// One section only, or sections out of order
const WEAK_STRUCTURE_SCORE: f64 = 40.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowDetails {
    pub greeting_position: Option<usize>,
    pub identification_position: Option<usize>,
    pub extras_position: Option<usize>,
    pub sections_detected: usize,
    pub order_ok: bool,
}

/// Rule for the greeting -> identification -> extras ordering
pub struct FlowRule;

impl FlowRule {
    pub fn new() -> Self {
        Self
    }

    /// First cue position, ignoring cues that start inside the greeting phrase
    /// ("I am excited to introduce" is a greeting, not an identification).
    fn first_cue(
        text: &NormalizedText,
        cues: &[&str],
        greeting: Option<&GreetingMatch>,
    ) -> Option<usize> {
        cues.iter()
            .flat_map(|cue| text.phrase_positions(cue))
            .filter(|&pos| greeting.map_or(true, |g| pos < g.position || pos >= g.end()))
            .min()
    }
}

impl Default for FlowRule {
    fn default() -> Self {
        Self::new()
    }
}

impl CriterionRule for FlowRule {
    fn criterion(&self) -> Criterion {
        Criterion::Flow
    }

    fn score(&self, text: &NormalizedText) -> RuleOutcome {
        let greeting = find_greetings(text)
            .into_iter()
            .min_by_key(|m| m.position);
        let greeting_position = greeting.map(|g| g.position);
        let identification_position =
            Self::first_cue(text, IDENTIFICATION_CUES, greeting.as_ref());
        let extras_position = Self::first_cue(text, EXTRA_DETAIL_CUES, greeting.as_ref());

        let detected: Vec<usize> = [greeting_position, identification_position, extras_position]
            .into_iter()
            .flatten()
            .collect();
        let order_ok = detected.windows(2).all(|pair| pair[0] < pair[1]);

        let score = match (detected.len(), order_ok) {
            (0, _) => 0.0,
            (3, true) => ALL_SECTIONS_IN_ORDER_SCORE,
            (2, true) => TWO_SECTIONS_IN_ORDER_SCORE,
            _ => WEAK_STRUCTURE_SCORE,
        };

        RuleOutcome {
            score,
            details: RuleDetails::Flow(FlowDetails {
                greeting_position,
                identification_position,
                extras_position,
                sections_detected: detected.len(),
                order_ok,
            }),
        }
    }
}
