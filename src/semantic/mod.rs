//! Semantic similarity between the transcript and each criterion's reference description

pub mod hashing;
pub mod http;

pub use hashing::HashingEmbedder;
pub use http::HttpEmbedder;

use crate::{panic_message, Criterion, NormalizedText, SemanticStatus};
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// Error from an embedding provider
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EmbedError {
    #[error("embedding provider unavailable: {0}")]
    Unavailable(String),
    #[error("embedding request failed: {0}")]
    Request(String),
    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),
}

/// Text embedding capability. Implementations must be deterministic.
pub trait Embedder: Send + Sync {
    /// Short provider identifier shown in reports
    fn id(&self) -> &str;

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;
}

/// Provider used when semantic scoring is switched off
pub struct DisabledEmbedder;

impl Embedder for DisabledEmbedder {
    fn id(&self) -> &str {
        "off"
    }

    fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbedError> {
        Err(EmbedError::Unavailable(
            "semantic scoring is disabled".to_string(),
        ))
    }
}

/// Call `embed`, turning a provider panic into `EmbedError::Unavailable`
pub fn embed_guarded(embedder: &dyn Embedder, text: &str) -> Result<Vec<f32>, EmbedError> {
    panic::catch_unwind(AssertUnwindSafe(|| embedder.embed(text))).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        warn!(provider = embedder.id(), error = %message, "embedding provider panicked");
        Err(EmbedError::Unavailable(format!(
            "embedding provider panicked: {}",
            message
        )))
    })
}

/// Cosine similarity in [-1, 1]; 0 for mismatched dimensions or zero vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot_product / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Affine map from raw cosine similarity to a 0-100 score.
///
/// Raw similarities of short texts cluster in a narrow band, so the bounds
/// are tunable rather than fixed at the full [-1, 1] range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub low: f32,
    pub high: f32,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            low: -1.0,
            high: 1.0,
        }
    }
}

impl Calibration {
    pub fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    pub fn is_valid(&self) -> bool {
        self.low.is_finite() && self.high.is_finite() && self.low < self.high
    }

    /// `clamp((similarity - low) / (high - low) * 100, 0, 100)`
    pub fn normalize(&self, similarity: f32) -> f64 {
        if !self.is_valid() || !similarity.is_finite() {
            return 0.0;
        }
        let span = (self.high - self.low) as f64;
        ((similarity - self.low) as f64 / span * 100.0).clamp(0.0, 100.0)
    }
}

/// Embeddings of the eight reference descriptions, in rubric order.
/// Computed once and only read afterwards.
#[derive(Debug, Clone)]
pub struct ReferenceEmbeddings {
    vectors: Vec<Vec<f32>>,
}

impl ReferenceEmbeddings {
    pub fn build(embedder: &dyn Embedder) -> Result<Self, EmbedError> {
        let vectors = Criterion::ALL
            .iter()
            .map(|c| embed_guarded(embedder, c.description()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { vectors })
    }

    pub fn get(&self, criterion: Criterion) -> &[f32] {
        &self.vectors[criterion.index()]
    }
}

/// Semantic outcome for one criterion
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SemanticScore {
    Available { score: f64, similarity: f32 },
    Unavailable { reason: String },
}

impl SemanticScore {
    /// The 0-100 score, or `None` when unavailable
    pub fn score(&self) -> Option<f64> {
        match self {
            SemanticScore::Available { score, .. } => Some(*score),
            SemanticScore::Unavailable { .. } => None,
        }
    }
}

/// Semantic scores for one transcript, in rubric order
#[derive(Debug, Clone)]
pub struct SemanticOutcome {
    pub scores: Vec<SemanticScore>,
    pub status: SemanticStatus,
}

/// Compares transcripts against precomputed reference embeddings
pub struct SemanticAnalyzer {
    embedder: Box<dyn Embedder>,
    references: Result<ReferenceEmbeddings, EmbedError>,
    calibration: Calibration,
}

impl SemanticAnalyzer {
    /// Create the analyzer, embedding every reference description up front.
    /// A provider failure here leaves the analyzer permanently unavailable.
    /// An invalid calibration does the same, since every score would collapse to 0.
    pub fn new(embedder: Box<dyn Embedder>, calibration: Calibration) -> Self {
        let references = if calibration.is_valid() {
            ReferenceEmbeddings::build(embedder.as_ref())
        } else {
            Err(EmbedError::Unavailable(format!(
                "invalid calibration: low ({}) must be below high ({})",
                calibration.low, calibration.high
            )))
        };
        match &references {
            Ok(_) => debug!(provider = embedder.id(), "reference embeddings ready"),
            Err(e) => warn!(provider = embedder.id(), error = %e, "semantic scoring unavailable"),
        }
        Self {
            embedder,
            references,
            calibration,
        }
    }

    pub fn provider(&self) -> &str {
        self.embedder.id()
    }

    pub fn is_available(&self) -> bool {
        self.references.is_ok()
    }

    pub fn calibration(&self) -> Calibration {
        self.calibration
    }

    pub fn references(&self) -> Option<&ReferenceEmbeddings> {
        self.references.as_ref().ok()
    }

    /// Score the transcript against every criterion description
    pub fn analyze(&self, text: &NormalizedText) -> SemanticOutcome {
        let references = match &self.references {
            Ok(refs) => refs,
            Err(e) => return self.unavailable(e),
        };

        // Nothing to compare: an empty transcript carries no meaning
        if text.is_empty() {
            return SemanticOutcome {
                scores: vec![
                    SemanticScore::Available {
                        score: 0.0,
                        similarity: 0.0,
                    };
                    Criterion::ALL.len()
                ],
                status: self.status(None),
            };
        }

        let transcript = match embed_guarded(self.embedder.as_ref(), text.original()) {
            Ok(v) => v,
            Err(e) => {
                warn!(provider = self.provider(), error = %e, "transcript embedding failed");
                return self.unavailable(&e);
            }
        };

        let scores = Criterion::ALL
            .iter()
            .map(|&c| {
                let similarity = cosine_similarity(&transcript, references.get(c));
                SemanticScore::Available {
                    score: self.calibration.normalize(similarity),
                    similarity,
                }
            })
            .collect();

        SemanticOutcome {
            scores,
            status: self.status(None),
        }
    }

    fn unavailable(&self, error: &EmbedError) -> SemanticOutcome {
        let reason = error.to_string();
        SemanticOutcome {
            scores: vec![
                SemanticScore::Unavailable {
                    reason: reason.clone(),
                };
                Criterion::ALL.len()
            ],
            status: self.status(Some(reason)),
        }
    }

    fn status(&self, reason: Option<String>) -> SemanticStatus {
        SemanticStatus {
            provider: self.provider().to_string(),
            available: reason.is_none(),
            reason,
        }
    }
}
