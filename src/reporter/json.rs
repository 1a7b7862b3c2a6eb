//! JSON reporter for machine-readable output

use crate::{AggregateStats, ScoreReport};
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Report a single score report as JSON
    pub fn report(&self, report: &ScoreReport) -> String {
        self.to_json(report, "{}")
    }

    /// Report several score reports with a summary
    pub fn report_many(&self, reports: &[ScoreReport], stats: &AggregateStats) -> String {
        let output = JsonOutput {
            results: reports,
            summary: stats,
        };
        self.to_json(&output, "{}")
    }

    fn to_json<T: Serialize>(&self, value: &T, fallback: &str) -> String {
        let result = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        result.unwrap_or_else(|_| fallback.to_string())
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    results: &'a [ScoreReport],
    summary: &'a AggregateStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringSettings;
    use crate::semantic::DisabledEmbedder;
    use crate::ScoringEngine;
    use std::path::PathBuf;

    const INTRO: &str = "Good morning everyone. My name is Asha and I am fifteen years old. \
                         I study in class ten at Sunrise school. I enjoy painting.";

    fn engine() -> ScoringEngine {
        ScoringEngine::new(&ScoringSettings::default(), Box::new(DisabledEmbedder))
    }

    #[test]
    fn test_json_report_has_expected_keys() {
        let report = engine().score(INTRO);
        let json = JsonReporter::new().report(&report);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(parsed["overall_score"].is_number());
        assert!(parsed["band"].is_string());
        assert_eq!(parsed["word_count"], report.word_count);
        assert_eq!(parsed["semantic"]["provider"], "off");
        assert_eq!(parsed["semantic"]["available"], false);
        assert!(parsed.get("source").is_none());

        let criteria = parsed["criteria"].as_array().unwrap();
        assert_eq!(criteria.len(), 8);
        assert_eq!(criteria[0]["criterion"], "Salutation");
        assert_eq!(criteria[1]["criterion"], "Keyword Presence");
        assert_eq!(criteria[0]["weight"], 5);
        assert!(criteria[0]["semantic_score"].is_null());
        assert!(criteria[0]["feedback"].is_string());
    }

    #[test]
    fn test_json_details_are_flattened() {
        let report = engine().score(INTRO);
        let parsed: serde_json::Value =
            serde_json::from_str(&JsonReporter::new().report(&report)).unwrap();

        let salutation = &parsed["criteria"][0]["details"];
        assert_eq!(salutation["matched"], "good morning");
        assert_eq!(salutation["semantic"]["status"], "unavailable");

        let keywords = &parsed["criteria"][1]["details"];
        assert!(keywords["must_have_found"].is_array());
    }

    #[test]
    fn test_json_pretty_output() {
        let report = engine().score(INTRO);
        let json = JsonReporter::new().pretty().report(&report);
        assert!(json.contains('\n'), "pretty JSON should have newlines");
        assert!(json.contains("  "), "pretty JSON should have indentation");
    }

    #[test]
    fn test_json_report_many_with_summary() {
        let engine = engine();
        let r1 = engine.score(INTRO).with_source(PathBuf::from("a.txt"));
        let r2 = engine.score("").with_source(PathBuf::from("b.txt"));
        let stats = ScoringEngine::aggregate_stats(&[r1.clone(), r2.clone()]);

        let json = JsonReporter::new().report_many(&[r1, r2], &stats);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        let results = parsed["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["source"], "a.txt");
        assert_eq!(results[1]["source"], "b.txt");
        assert_eq!(parsed["summary"]["transcripts_scored"], 2);
        assert_eq!(parsed["summary"]["lowest_score"], 0.0);
    }

    #[test]
    fn test_json_report_many_empty() {
        let json = JsonReporter::new().report_many(&[], &AggregateStats::default());
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed["results"].as_array().unwrap().is_empty());
        assert_eq!(parsed["summary"]["transcripts_scored"], 0);
    }
}
