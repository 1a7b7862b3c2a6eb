//! Speaking pace estimated from the transcript length.
//!
//! There is no audio, so words-per-minute is approximated by assuming the
//! introduction lasts a fixed duration (one minute unless configured).

use super::{CriterionRule, RuleDetails, RuleOutcome};
use crate::{Criterion, NormalizedText};
use serde::Serialize;

pub const DEFAULT_ASSUMED_DURATION_SECS: f64 = 60.0;

pub const IDEAL_MIN_WPM: f64 = 111.0;
pub const IDEAL_MAX_WPM: f64 = 140.0;
/// Above the ideal band the score reaches 0 at this pace
const ZERO_SCORE_WPM: f64 = 180.0;

const TOO_SLOW_MAX_WPM: f64 = 80.0;
const FAST_MAX_WPM: f64 = 160.0;

/// Human-readable pace label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpeechBand {
    #[serde(rename = "Too slow")]
    TooSlow,
    Slow,
    Ideal,
    Fast,
    #[serde(rename = "Too fast")]
    TooFast,
}

impl SpeechBand {
    pub fn from_wpm(wpm: f64) -> Self {
        if wpm <= TOO_SLOW_MAX_WPM {
            SpeechBand::TooSlow
        } else if wpm < IDEAL_MIN_WPM {
            SpeechBand::Slow
        } else if wpm <= IDEAL_MAX_WPM {
            SpeechBand::Ideal
        } else if wpm <= FAST_MAX_WPM {
            SpeechBand::Fast
        } else {
            SpeechBand::TooFast
        }
    }
}

impl std::fmt::Display for SpeechBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpeechBand::TooSlow => write!(f, "Too slow"),
            SpeechBand::Slow => write!(f, "Slow"),
            SpeechBand::Ideal => write!(f, "Ideal"),
            SpeechBand::Fast => write!(f, "Fast"),
            SpeechBand::TooFast => write!(f, "Too fast"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeechRateDetails {
    pub word_count: usize,
    pub wpm_estimate: f64,
    pub target_min_wpm: f64,
    pub target_max_wpm: f64,
    pub band: SpeechBand,
}

/// Rule scoring pace: 100 inside the ideal band, linear decay on both sides
pub struct SpeechRateRule {
    assumed_duration_secs: f64,
}

impl SpeechRateRule {
    pub fn new(assumed_duration_secs: f64) -> Self {
        let assumed_duration_secs = if assumed_duration_secs > 0.0 {
            assumed_duration_secs
        } else {
            DEFAULT_ASSUMED_DURATION_SECS
        };
        Self {
            assumed_duration_secs,
        }
    }

    pub fn estimate_wpm(&self, word_count: usize) -> f64 {
        word_count as f64 * 60.0 / self.assumed_duration_secs
    }

    pub fn score_for_wpm(wpm: f64) -> f64 {
        let score = if wpm < IDEAL_MIN_WPM {
            wpm / IDEAL_MIN_WPM * 100.0
        } else if wpm <= IDEAL_MAX_WPM {
            100.0
        } else {
            (ZERO_SCORE_WPM - wpm) / (ZERO_SCORE_WPM - IDEAL_MAX_WPM) * 100.0
        };
        score.clamp(0.0, 100.0)
    }
}

impl Default for SpeechRateRule {
    fn default() -> Self {
        Self::new(DEFAULT_ASSUMED_DURATION_SECS)
    }
}

impl CriterionRule for SpeechRateRule {
    fn criterion(&self) -> Criterion {
        Criterion::SpeechRate
    }

    fn score(&self, text: &NormalizedText) -> RuleOutcome {
        let word_count = text.word_count();
        let wpm = self.estimate_wpm(word_count);

        RuleOutcome {
            score: Self::score_for_wpm(wpm),
            details: RuleDetails::SpeechRate(SpeechRateDetails {
                word_count,
                wpm_estimate: wpm,
                target_min_wpm: IDEAL_MIN_WPM,
                target_max_wpm: IDEAL_MAX_WPM,
                band: SpeechBand::from_wpm(wpm),
            }),
        }
    }
}
