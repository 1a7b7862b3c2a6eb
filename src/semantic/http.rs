//! OpenAI-compatible embeddings endpoint
//!
//! Requires the `remote` feature to be enabled:
//! ```toml
//! introscore = { version = "0.3", features = ["remote"] }
//! ```

use super::{EmbedError, Embedder};

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Blocking client for `POST {endpoint}/v1/embeddings`
pub struct HttpEmbedder {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    id: String,
    #[cfg(feature = "remote")]
    client: reqwest::blocking::Client,
}

impl HttpEmbedder {
    pub fn new(endpoint: &str, model: &str, api_key: Option<String>) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
            id: format!("http:{}", model),
            #[cfg(feature = "remote")]
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Read the bearer token from `api_key_env`; a missing variable sends no token
    pub fn from_env(endpoint: &str, model: &str, api_key_env: &str) -> Self {
        Self::new(endpoint, model, std::env::var(api_key_env).ok())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    #[cfg(feature = "remote")]
    fn request(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        use serde_json::json;

        let body = json!({
            "model": self.model,
            "input": text,
        });

        let mut request = self
            .client
            .post(format!("{}/v1/embeddings", self.endpoint))
            .header("Content-Type", "application/json")
            .json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .map_err(|e| EmbedError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().unwrap_or_default();
            return Err(EmbedError::Request(format!("{}: {}", status, error_text)));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .map_err(|e| EmbedError::InvalidResponse(e.to_string()))?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| EmbedError::InvalidResponse("no embedding in response".to_string()))
    }

    #[cfg(not(feature = "remote"))]
    fn request(&self, _text: &str) -> Result<Vec<f32>, EmbedError> {
        Err(EmbedError::Unavailable(
            "remote embeddings not enabled. Rebuild with: cargo build --features remote"
                .to_string(),
        ))
    }
}

impl Embedder for HttpEmbedder {
    fn id(&self) -> &str {
        &self.id
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        self.request(text)
    }
}

#[cfg(feature = "remote")]
#[derive(Debug, serde::Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[cfg(feature = "remote")]
#[derive(Debug, serde::Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Check if remote embeddings are compiled in
pub fn is_remote_available() -> bool {
    cfg!(feature = "remote")
}
