//! Score combination: rule/semantic blend and rubric weighting

use crate::{AggregateStats, Band, ScoreReport};

/// Share of the combined score taken from the rule analyzer
pub const RULE_BLEND_WEIGHT: f64 = 0.6;
/// Share of the combined score taken from the semantic analyzer
pub const SEMANTIC_BLEND_WEIGHT: f64 = 0.4;

/// Per-criterion input to the aggregation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriterionInput {
    pub rule_score: f64,
    /// `None` when embeddings were unavailable
    pub semantic_score: Option<f64>,
    pub weight: u8,
}

/// Aggregation output: combined scores in input order plus the overall score
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub combined: Vec<f64>,
    pub overall: f64,
}

/// Calculator for combined and overall scores
pub struct ScoreCalculator;

impl ScoreCalculator {
    /// Clamp a score to [0, 100]; non-finite values count as 0
    pub fn clamp_score(score: f64) -> f64 {
        if score.is_nan() {
            return 0.0;
        }
        score.clamp(0.0, 100.0)
    }

    /// Blend rule and semantic scores for one criterion.
    /// Without a semantic score the rule score carries the full weight.
    pub fn combine(rule_score: f64, semantic_score: Option<f64>) -> f64 {
        let rule = Self::clamp_score(rule_score);
        match semantic_score {
            Some(semantic) => Self::clamp_score(
                RULE_BLEND_WEIGHT * rule + SEMANTIC_BLEND_WEIGHT * Self::clamp_score(semantic),
            ),
            None => rule,
        }
    }

    /// `Σ combined_i * weight_i / 100`
    pub fn overall(combined: &[f64], weights: &[u8]) -> f64 {
        let sum: f64 = combined
            .iter()
            .zip(weights)
            .map(|(score, weight)| Self::clamp_score(*score) * *weight as f64 / 100.0)
            .sum();
        Self::clamp_score(sum)
    }

    /// Combine every criterion and compute the overall score
    pub fn aggregate(inputs: &[CriterionInput]) -> Aggregate {
        let combined: Vec<f64> = inputs
            .iter()
            .map(|i| Self::combine(i.rule_score, i.semantic_score))
            .collect();
        let weights: Vec<u8> = inputs.iter().map(|i| i.weight).collect();
        let overall = Self::overall(&combined, &weights);
        Aggregate { combined, overall }
    }

    /// Summary statistics over several reports
    pub fn aggregate_stats(reports: &[ScoreReport]) -> AggregateStats {
        if reports.is_empty() {
            return AggregateStats::default();
        }

        let total: f64 = reports.iter().map(|r| r.overall_score).sum();
        let average = total / reports.len() as f64;
        let lowest = reports
            .iter()
            .map(|r| r.overall_score)
            .fold(f64::INFINITY, f64::min);
        let highest = reports
            .iter()
            .map(|r| r.overall_score)
            .fold(f64::NEG_INFINITY, f64::max);

        AggregateStats {
            transcripts_scored: reports.len(),
            average_score: average,
            average_band: Band::from_score(average),
            lowest_score: lowest,
            highest_score: highest,
            total_words: reports.iter().map(|r| r.word_count).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Criterion;

    fn inputs(rule: f64, semantic: Option<f64>) -> Vec<CriterionInput> {
        Criterion::ALL
            .iter()
            .map(|c| CriterionInput {
                rule_score: rule,
                semantic_score: semantic,
                weight: c.weight(),
            })
            .collect()
    }

    #[test]
    fn test_combine_blend() {
        assert!((ScoreCalculator::combine(100.0, Some(50.0)) - 80.0).abs() < 1e-9);
        assert!((ScoreCalculator::combine(0.0, Some(100.0)) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_combine_rule_only_fallback() {
        assert_eq!(ScoreCalculator::combine(72.5, None), 72.5);
    }

    #[test]
    fn test_combine_clamps_inputs() {
        // 0.6 * 100 + 0.4 * 0
        assert!((ScoreCalculator::combine(150.0, Some(-20.0)) - 60.0).abs() < 1e-9);
        assert_eq!(ScoreCalculator::combine(f64::NAN, None), 0.0);
        assert_eq!(ScoreCalculator::combine(f64::INFINITY, None), 100.0);
    }

    #[test]
    fn test_overall_all_perfect() {
        let agg = ScoreCalculator::aggregate(&inputs(100.0, Some(100.0)));
        assert!((agg.overall - 100.0).abs() < 1e-9);
        assert_eq!(agg.combined.len(), 8);
    }

    #[test]
    fn test_overall_all_zero() {
        let agg = ScoreCalculator::aggregate(&inputs(0.0, Some(0.0)));
        assert_eq!(agg.overall, 0.0);
    }

    #[test]
    fn test_overall_weighted() {
        // Only keyword presence (weight 30) scores
        let mut inp = inputs(0.0, None);
        inp[Criterion::KeywordPresence.index()].rule_score = 50.0;
        let agg = ScoreCalculator::aggregate(&inp);
        assert!((agg.overall - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_overall_matches_weighted_sum() {
        let inp: Vec<CriterionInput> = Criterion::ALL
            .iter()
            .enumerate()
            .map(|(i, c)| CriterionInput {
                rule_score: 10.0 * i as f64,
                semantic_score: Some(50.0),
                weight: c.weight(),
            })
            .collect();
        let agg = ScoreCalculator::aggregate(&inp);
        let expected: f64 = agg
            .combined
            .iter()
            .zip(Criterion::ALL)
            .map(|(s, c)| s * c.weight() as f64 / 100.0)
            .sum();
        assert!((agg.overall - expected).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_stats_empty() {
        let stats = ScoreCalculator::aggregate_stats(&[]);
        assert_eq!(stats.transcripts_scored, 0);
        assert_eq!(stats.average_score, 0.0);
        assert_eq!(stats.total_words, 0);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn combined_stays_in_range(rule in -500.0f64..500.0, semantic in proptest::option::of(-500.0f64..500.0)) {
                let c = ScoreCalculator::combine(rule, semantic);
                prop_assert!((0.0..=100.0).contains(&c));
            }

            #[test]
            fn overall_stays_in_range(scores in proptest::collection::vec(0.0f64..=100.0, 8)) {
                let inp: Vec<CriterionInput> = scores
                    .iter()
                    .zip(Criterion::ALL)
                    .map(|(s, c)| CriterionInput { rule_score: *s, semantic_score: Some(*s), weight: c.weight() })
                    .collect();
                let agg = ScoreCalculator::aggregate(&inp);
                prop_assert!((0.0..=100.0).contains(&agg.overall));
            }

            #[test]
            fn raising_rule_score_never_lowers_overall(base in 0.0f64..=90.0, bump in 0.0f64..=10.0, idx in 0usize..8) {
                let low = inputs(base, Some(50.0));
                let mut high = low.clone();
                high[idx].rule_score = base + bump;
                let a = ScoreCalculator::aggregate(&low).overall;
                let b = ScoreCalculator::aggregate(&high).overall;
                prop_assert!(b + 1e-9 >= a);
            }
        }
    }
}
