//! Analyzer module - transcript scoring engine

pub mod engine;
pub mod rules;
pub mod scoring;

pub use engine::{ScoreError, ScoringEngine};
pub use scoring::ScoreCalculator;
