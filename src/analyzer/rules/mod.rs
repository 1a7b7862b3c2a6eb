//! Rule-based analyzers, one per rubric criterion

pub mod clarity;
pub mod engagement;
pub mod flow;
pub mod grammar;
pub mod keyword_presence;
pub mod salutation;
pub mod speech_rate;
pub mod vocabulary;

pub use clarity::{ClarityDetails, ClarityRule};
pub use engagement::{EngagementDetails, EngagementRule};
pub use flow::{FlowDetails, FlowRule};
pub use grammar::{GrammarDetails, GrammarRule};
pub use keyword_presence::{KeywordDetails, KeywordPresenceRule};
pub use salutation::{GreetingLevel, SalutationDetails, SalutationRule};
pub use speech_rate::{SpeechBand, SpeechRateDetails, SpeechRateRule};
pub use vocabulary::{VocabularyDetails, VocabularyRule};

use crate::{Criterion, NormalizedText};
use serde::Serialize;

/// Trait for per-criterion rule analyzers
pub trait CriterionRule: Send + Sync {
    /// Criterion this rule scores
    fn criterion(&self) -> Criterion;

    /// Score the transcript (0-100) and report what was found.
    /// A transcript with no words must score 0.
    fn score(&self, text: &NormalizedText) -> RuleOutcome;
}

/// Result of one rule analyzer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleOutcome {
    pub score: f64,
    pub details: RuleDetails,
}

/// Criterion-specific diagnostics, serialized as a flat object
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RuleDetails {
    Salutation(SalutationDetails),
    Keywords(KeywordDetails),
    Flow(FlowDetails),
    SpeechRate(SpeechRateDetails),
    Grammar(GrammarDetails),
    Vocabulary(VocabularyDetails),
    Clarity(ClarityDetails),
    Engagement(EngagementDetails),
}

/// Build the rubric's rule analyzers in rubric order
pub fn rubric_rules(assumed_duration_secs: f64) -> Vec<Box<dyn CriterionRule>> {
    vec![
        Box::new(SalutationRule::new()),
        Box::new(KeywordPresenceRule::new()),
        Box::new(FlowRule::new()),
        Box::new(SpeechRateRule::new(assumed_duration_secs)),
        Box::new(GrammarRule::new()),
        Box::new(VocabularyRule::new()),
        Box::new(ClarityRule::new()),
        Box::new(EngagementRule::new()),
    ]
}
