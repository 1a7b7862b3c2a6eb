//! Introscore: rubric scorer for spoken-English self-introductions
//!
//! This library scores a short self-introduction transcript against a fixed
//! eight-criterion rubric. Each criterion blends a rule-based heuristic score
//! with an embedding-similarity score; the blended scores are weighted into an
//! overall score and annotated with feedback.

pub mod analyzer;
pub mod config;
pub mod feedback;
pub mod reporter;
pub mod semantic;
pub mod text;

pub use analyzer::{ScoreError, ScoringEngine};
pub use text::NormalizedText;

use analyzer::rules::RuleDetails;
use semantic::SemanticScore;
use serde::Serialize;
use std::path::PathBuf;

/// One of the eight fixed rubric criteria, in rubric order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Criterion {
    Salutation,
    #[serde(rename = "Keyword Presence")]
    KeywordPresence,
    Flow,
    #[serde(rename = "Speech Rate")]
    SpeechRate,
    Grammar,
    Vocabulary,
    Clarity,
    Engagement,
}

impl Criterion {
    /// All criteria in rubric order
    pub const ALL: [Criterion; 8] = [
        Criterion::Salutation,
        Criterion::KeywordPresence,
        Criterion::Flow,
        Criterion::SpeechRate,
        Criterion::Grammar,
        Criterion::Vocabulary,
        Criterion::Clarity,
        Criterion::Engagement,
    ];

    /// Position in rubric order
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display name used in reports
    pub fn name(self) -> &'static str {
        match self {
            Criterion::Salutation => "Salutation",
            Criterion::KeywordPresence => "Keyword Presence",
            Criterion::Flow => "Flow",
            Criterion::SpeechRate => "Speech Rate",
            Criterion::Grammar => "Grammar",
            Criterion::Vocabulary => "Vocabulary",
            Criterion::Clarity => "Clarity",
            Criterion::Engagement => "Engagement",
        }
    }

    /// Kebab-case identifier
    pub fn id(self) -> &'static str {
        match self {
            Criterion::Salutation => "salutation",
            Criterion::KeywordPresence => "keyword-presence",
            Criterion::Flow => "flow",
            Criterion::SpeechRate => "speech-rate",
            Criterion::Grammar => "grammar",
            Criterion::Vocabulary => "vocabulary",
            Criterion::Clarity => "clarity",
            Criterion::Engagement => "engagement",
        }
    }

    /// Rubric weight. The eight weights sum to 100.
    pub fn weight(self) -> u8 {
        match self {
            Criterion::Salutation => 5,
            Criterion::KeywordPresence => 30,
            Criterion::Flow => 5,
            Criterion::SpeechRate => 10,
            Criterion::Grammar => 10,
            Criterion::Vocabulary => 10,
            Criterion::Clarity => 15,
            Criterion::Engagement => 15,
        }
    }

    /// Reference description compared against the transcript embedding
    pub fn description(self) -> &'static str {
        match self {
            Criterion::Salutation => {
                "A polite greeting at the beginning of the self introduction, such as \
                 good morning, hello everyone, I am excited to introduce myself."
            }
            Criterion::KeywordPresence => {
                "The introduction should mention key personal details like name, age, \
                 class or school, family, hobbies or interests, and optional goals or strengths."
            }
            Criterion::Flow => {
                "The introduction should follow a logical structure: greeting, name, basic \
                 details, additional details such as hobbies and goals, and a brief closing."
            }
            Criterion::SpeechRate => {
                "The text should sound like a natural short spoken introduction, not \
                 unnaturally rushed or extremely slow when read aloud."
            }
            Criterion::Grammar => {
                "The sentences should be grammatically correct, with proper word order and \
                 basic tenses used accurately in English."
            }
            Criterion::Vocabulary => {
                "The introduction should use a reasonable variety of words and some \
                 descriptive vocabulary instead of repeating the same simple words."
            }
            Criterion::Clarity => {
                "The introduction should be clear and easy to follow, without too many \
                 filler phrases such as um, like, you know."
            }
            Criterion::Engagement => {
                "The tone should sound positive, interested and confident, showing enthusiasm \
                 about oneself, hobbies and future goals."
            }
        }
    }
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Score band used for feedback and the overall verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Band {
    Excellent,
    Good,
    #[serde(rename = "Needs improvement")]
    NeedsImprovement,
    Weak,
}

impl Band {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Band::Excellent
        } else if score >= 60.0 {
            Band::Good
        } else if score >= 40.0 {
            Band::NeedsImprovement
        } else {
            Band::Weak
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Band::Excellent => write!(f, "Excellent"),
            Band::Good => write!(f, "Good"),
            Band::NeedsImprovement => write!(f, "Needs improvement"),
            Band::Weak => write!(f, "Weak"),
        }
    }
}

/// The main result of scoring one transcript
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    /// Transcript file this report was produced from (CLI runs only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    /// Weighted overall score (0-100)
    pub overall_score: f64,
    /// Band of the overall score
    pub band: Band,
    /// Number of words in the transcript
    pub word_count: usize,
    /// Whether semantic scores contributed to this report
    pub semantic: SemanticStatus,
    /// One entry per rubric criterion, in rubric order
    pub criteria: Vec<CriterionResult>,
    /// Improvement hints for the weakest criteria
    pub recommendations: Vec<String>,
}

impl ScoreReport {
    /// Look up the result for a criterion
    pub fn criterion(&self, criterion: Criterion) -> Option<&CriterionResult> {
        self.criteria.iter().find(|c| c.criterion == criterion)
    }

    /// Attach the transcript path
    pub fn with_source(mut self, path: PathBuf) -> Self {
        self.source = Some(path);
        self
    }
}

/// Score and diagnostics for one rubric criterion
#[derive(Debug, Clone, Serialize)]
pub struct CriterionResult {
    pub criterion: Criterion,
    /// Combined score (0-100): rule and semantic scores blended
    pub score: f64,
    /// Rule-based heuristic score (0-100)
    pub rule_score: f64,
    /// Semantic similarity score (0-100), `None` when embeddings were unavailable
    pub semantic_score: Option<f64>,
    /// Rubric weight
    pub weight: u8,
    pub details: CriterionDetails,
    pub feedback: String,
}

/// Diagnostic facts behind a criterion's score
#[derive(Debug, Clone, Serialize)]
pub struct CriterionDetails {
    /// Rule analyzer details; absent when the analyzer failed
    #[serde(flatten)]
    pub rule: Option<RuleDetails>,
    /// Semantic analyzer outcome for this criterion
    pub semantic: SemanticScore,
    /// Failure note when the rule analyzer could not score this criterion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Which embedding provider served the request and whether it was usable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemanticStatus {
    pub provider: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Summary over several scored transcripts
#[derive(Debug, Clone, Serialize)]
pub struct AggregateStats {
    pub transcripts_scored: usize,
    pub average_score: f64,
    pub average_band: Band,
    pub lowest_score: f64,
    pub highest_score: f64,
    pub total_words: usize,
}

impl Default for AggregateStats {
    fn default() -> Self {
        Self {
            transcripts_scored: 0,
            average_score: 0.0,
            average_band: Band::Weak,
            lowest_score: 0.0,
            highest_score: 0.0,
            total_words: 0,
        }
    }
}

/// Text carried by a caught panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
