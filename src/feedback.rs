//! Human-readable feedback per criterion and overall recommendations

use crate::analyzer::rules::{GreetingLevel, RuleDetails, SpeechBand};
use crate::{Band, Criterion, CriterionResult};

/// Score below which a criterion earns a recommendation
const RECOMMENDATION_CUTOFF: f64 = 60.0;

/// Stateless generator for feedback strings
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedbackGenerator;

impl FeedbackGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Feedback for one criterion: `"<Band>: <message>"`
    pub fn feedback(
        &self,
        criterion: Criterion,
        score: f64,
        details: Option<&RuleDetails>,
    ) -> String {
        let band = Band::from_score(score);
        let message = match details {
            Some(details) => Self::message(criterion, band, details),
            None => format!(
                "{} could not be analyzed for this transcript.",
                criterion.name()
            ),
        };
        format!("{}: {}", band, message)
    }

    fn message(criterion: Criterion, band: Band, details: &RuleDetails) -> String {
        let strong = matches!(band, Band::Excellent);
        let fair = matches!(band, Band::Good);

        match (criterion, details) {
            (Criterion::Salutation, RuleDetails::Salutation(d)) => {
                if d.level == GreetingLevel::None {
                    "No clear greeting detected. Start with a polite salutation like \
                     'Good morning' or 'Hello everyone'."
                        .to_string()
                } else if !d.at_start {
                    "Your greeting comes late. Open the introduction with it so it sets \
                     the tone."
                        .to_string()
                } else if d.level < GreetingLevel::Excellent && !strong {
                    format!(
                        "Greeting detected ({}). You can make it warmer, e.g. 'I am excited \
                         to introduce myself today.'",
                        d.level
                    )
                } else {
                    format!(
                        "Nice greeting ({}). Your opening sounds polite and appropriate.",
                        d.level
                    )
                }
            }
            (Criterion::KeywordPresence, RuleDetails::Keywords(d)) => {
                if d.must_have_missing.is_empty() {
                    "You covered all the key details about yourself. Goals, strengths or a \
                     fun fact make it even richer."
                        .to_string()
                } else {
                    format!(
                        "Mention more key details about yourself. Missing: {}.",
                        d.must_have_missing.join(", ")
                    )
                }
            }
            (Criterion::Flow, RuleDetails::Flow(d)) => {
                if d.order_ok && d.sections_detected == 3 {
                    "Your introduction follows a logical order and is easy to follow."
                        .to_string()
                } else if d.order_ok {
                    "Some parts of the structure are missing. Try: greeting, name and basic \
                     details, then hobbies and goals."
                        .to_string()
                } else {
                    "The information jumps around a bit. Try: greeting, name, basic details, \
                     extra details, then a closing."
                        .to_string()
                }
            }
            (Criterion::SpeechRate, RuleDetails::SpeechRate(d)) => match d.band {
                SpeechBand::Fast | SpeechBand::TooFast => format!(
                    "About {:.0} words per minute. Slow down slightly and add small pauses.",
                    d.wpm_estimate
                ),
                SpeechBand::Slow | SpeechBand::TooSlow => format!(
                    "About {:.0} words per minute. Add a little more content or connect \
                     phrases more smoothly.",
                    d.wpm_estimate
                ),
                SpeechBand::Ideal => {
                    "Your speaking pace seems comfortable for a short introduction.".to_string()
                }
            },
            (Criterion::Grammar, RuleDetails::Grammar(d)) => {
                if strong {
                    "Sentence structure looks good. Keep using clear, simple sentences."
                        .to_string()
                } else if d.and_count > 3 {
                    format!(
                        "'and' appears {} times. Break long sentences into shorter ones \
                         instead of chaining ideas.",
                        d.and_count
                    )
                } else {
                    format!(
                        "Average sentence length is {:.1} words. Aim for clear sentences \
                         of moderate length.",
                        d.avg_sentence_length
                    )
                }
            }
            (Criterion::Vocabulary, RuleDetails::Vocabulary(_)) => {
                if strong {
                    "Good variety of words for a short introduction.".to_string()
                } else if fair {
                    "Vocabulary is okay, but some words repeat. Try a few different \
                     adjectives and verbs."
                        .to_string()
                } else {
                    "You rely on repeated simple words. Use new words to describe your \
                     interests and goals."
                        .to_string()
                }
            }
            (Criterion::Clarity, RuleDetails::Clarity(d)) => {
                if d.filler_count == 0 {
                    "No filler words. Your speech is clear and to the point.".to_string()
                } else if strong {
                    "Very few filler words. Your speech is clear.".to_string()
                } else {
                    format!(
                        "Filler words make up about {:.1}% of your words. Pause briefly \
                         instead of saying 'um' or 'like'.",
                        d.filler_rate_percent
                    )
                }
            }
            (Criterion::Engagement, RuleDetails::Engagement(_)) => {
                if strong {
                    "Your tone feels positive and engaged.".to_string()
                } else if fair {
                    "Tone is mostly positive. Add a bit more energy when you talk about \
                     your hobbies."
                        .to_string()
                } else {
                    "Tone may sound flat. Show enthusiasm about your interests and dreams."
                        .to_string()
                }
            }
            _ => "No specific feedback available for this criterion.".to_string(),
        }
    }

    /// Short hint for improving a criterion
    pub fn hint(criterion: Criterion) -> &'static str {
        match criterion {
            Criterion::Salutation => "Open with a clear greeting such as 'Good morning everyone'",
            Criterion::KeywordPresence => {
                "Cover your name, age, class or school, family and hobbies"
            }
            Criterion::Flow => "Order the introduction: greeting, who you are, then extra details",
            Criterion::SpeechRate => "Aim for roughly 110-140 words in a one-minute introduction",
            Criterion::Grammar => "Use shorter sentences and avoid chaining ideas with 'and'",
            Criterion::Vocabulary => "Vary your words instead of repeating the same ones",
            Criterion::Clarity => "Replace filler words like 'um' and 'like' with short pauses",
            Criterion::Engagement => "Sound enthusiastic: say what you enjoy and are proud of",
        }
    }

    /// Hints for criteria scoring below the cutoff, weakest first
    pub fn recommendations(&self, criteria: &[CriterionResult]) -> Vec<String> {
        let mut weak: Vec<&CriterionResult> = criteria
            .iter()
            .filter(|c| c.score < RECOMMENDATION_CUTOFF)
            .collect();
        weak.sort_by(|a, b| a.score.total_cmp(&b.score));

        let mut recs: Vec<String> = weak
            .into_iter()
            .map(|c| format!("{}: {}", c.criterion, Self::hint(c.criterion)))
            .collect();

        if recs.is_empty() {
            recs.push("Your introduction is in good shape! Keep practicing it aloud.".to_string());
        }

        recs
    }

    /// Description of the overall band
    pub fn band_description(band: Band) -> &'static str {
        match band {
            Band::Excellent => "Excellent - a confident, well-structured introduction",
            Band::Good => "Good - solid introduction with room for polish",
            Band::NeedsImprovement => "Needs improvement - key elements are weak or missing",
            Band::Weak => "Weak - the introduction needs substantial work",
        }
    }
}
