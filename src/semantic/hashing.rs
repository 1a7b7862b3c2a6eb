//! Offline embedder: signed feature hashing of words and word pairs

use super::{EmbedError, Embedder};
use crate::text::tokenize;
use sha2::{Digest, Sha256};

pub const DEFAULT_DIMENSIONS: usize = 256;

const UNIGRAM_WEIGHT: f32 = 1.0;
const BIGRAM_WEIGHT: f32 = 0.5;

/// Function words that would otherwise dominate every vector
const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "of", "to", "in", "on", "at", "for", "with", "as",
    "is", "am", "are", "was", "be", "it", "this", "that", "i", "my", "me", "you", "your",
    "such", "should", "not", "some", "about",
];

/// Deterministic bag-of-words embedder.
///
/// Each content word (and each adjacent pair of content words) is hashed
/// with SHA-256 into one of `dimensions` buckets with a hash-derived sign;
/// the resulting vector is L2-normalized. Texts sharing vocabulary land
/// close together, which is enough to rank transcripts against the rubric
/// descriptions without a model download.
pub struct HashingEmbedder {
    dimensions: usize,
    id: String,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            id: format!("hashing-{}", dimensions),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn bucket(&self, feature: &str) -> (usize, f32) {
        let digest = Sha256::digest(feature.as_bytes());
        let mut index_bytes = [0u8; 8];
        index_bytes.copy_from_slice(&digest[..8]);
        let index = (u64::from_le_bytes(index_bytes) % self.dimensions as u64) as usize;
        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        (index, sign)
    }

    fn add(&self, vector: &mut [f32], feature: &str, weight: f32) {
        let (index, sign) = self.bucket(feature);
        vector[index] += sign * weight;
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS)
    }
}

impl Embedder for HashingEmbedder {
    fn id(&self) -> &str {
        &self.id
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        if self.dimensions == 0 {
            return Err(EmbedError::Unavailable(
                "hashing embedder configured with zero dimensions".to_string(),
            ));
        }

        let content: Vec<String> = tokenize(text)
            .into_iter()
            .filter(|w| !STOPWORDS.contains(&w.as_str()))
            .collect();

        let mut vector = vec![0.0f32; self.dimensions];
        for word in &content {
            self.add(&mut vector, word, UNIGRAM_WEIGHT);
        }
        for pair in content.windows(2) {
            self.add(&mut vector, &format!("{} {}", pair[0], pair[1]), BIGRAM_WEIGHT);
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in vector.iter_mut() {
                *value /= norm;
            }
        }

        Ok(vector)
    }
}
