//! Config schema and deserialization

use crate::analyzer::rules::speech_rate::DEFAULT_ASSUMED_DURATION_SECS;
use crate::semantic::{hashing, http, Calibration};
use serde::Deserialize;

/// Embedding provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderProvider {
    /// Offline feature-hashing embedder (default)
    #[default]
    Hashing,
    /// OpenAI-compatible embeddings endpoint (needs the `remote` feature)
    Http,
    /// Disable semantic scoring; criteria fall back to rule scores
    Off,
}

impl std::str::FromStr for EmbedderProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hashing" => Ok(EmbedderProvider::Hashing),
            "http" => Ok(EmbedderProvider::Http),
            "off" | "none" => Ok(EmbedderProvider::Off),
            other => Err(format!(
                "unknown embedder '{}' (expected hashing, http or off)",
                other
            )),
        }
    }
}

impl std::fmt::Display for EmbedderProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmbedderProvider::Hashing => write!(f, "hashing"),
            EmbedderProvider::Http => write!(f, "http"),
            EmbedderProvider::Off => write!(f, "off"),
        }
    }
}

/// Semantic calibration bounds; unset values take the defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationConfig {
    #[serde(default)]
    pub low: Option<f32>,
    #[serde(default)]
    pub high: Option<f32>,
}

/// Semantic analyzer configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticConfig {
    #[serde(default)]
    pub provider: Option<EmbedderProvider>,

    #[serde(default)]
    pub calibration: CalibrationConfig,

    /// Vector size for the hashing embedder
    #[serde(default)]
    pub dimensions: Option<usize>,

    /// Model name for the http embedder
    #[serde(default)]
    pub model: Option<String>,

    /// Base URL for the http embedder
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Environment variable holding the http bearer token
    #[serde(default)]
    pub api_key_env: Option<String>,
}

/// Speech rate estimation configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechRateConfig {
    /// Assumed spoken length of a transcript, in seconds
    #[serde(default)]
    pub assumed_duration_secs: Option<f64>,
}

/// Root config structure for .introscorerc.json
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default)]
    pub extends: Option<String>,

    /// Minimum overall score (exit 1 if below). Default: none
    #[serde(default)]
    pub threshold: Option<u8>,

    #[serde(default)]
    pub semantic: SemanticConfig,

    #[serde(default)]
    pub speech_rate: SpeechRateConfig,

    /// Glob patterns for transcript files to skip in directory runs
    #[serde(default)]
    pub ignore: Vec<String>,
}

/// Resolved settings the scoring engine runs with
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringSettings {
    pub calibration: Calibration,
    pub assumed_duration_secs: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            calibration: Calibration::default(),
            assumed_duration_secs: DEFAULT_ASSUMED_DURATION_SECS,
        }
    }
}

/// Resolved embedder selection
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedderSettings {
    pub provider: EmbedderProvider,
    pub dimensions: usize,
    pub model: String,
    pub endpoint: String,
    pub api_key_env: String,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(
        mut self,
        cli_threshold: Option<u8>,
        cli_provider: Option<EmbedderProvider>,
    ) -> Self {
        if cli_threshold.is_some() {
            self.threshold = cli_threshold;
        }
        if cli_provider.is_some() {
            self.semantic.provider = cli_provider;
        }
        self
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        // Base values are overridden by this config's values
        if self.threshold.is_none() {
            self.threshold = base.threshold;
        }
        if self.extends.is_none() {
            self.extends = base.extends;
        }

        let semantic = &mut self.semantic;
        semantic.provider = semantic.provider.or(base.semantic.provider);
        semantic.calibration.low = semantic.calibration.low.or(base.semantic.calibration.low);
        semantic.calibration.high = semantic
            .calibration
            .high
            .or(base.semantic.calibration.high);
        semantic.dimensions = semantic.dimensions.or(base.semantic.dimensions);
        if semantic.model.is_none() {
            semantic.model = base.semantic.model;
        }
        if semantic.endpoint.is_none() {
            semantic.endpoint = base.semantic.endpoint;
        }
        if semantic.api_key_env.is_none() {
            semantic.api_key_env = base.semantic.api_key_env;
        }

        self.speech_rate.assumed_duration_secs = self
            .speech_rate
            .assumed_duration_secs
            .or(base.speech_rate.assumed_duration_secs);

        // Merge ignore patterns
        let mut all_ignores = base.ignore;
        all_ignores.append(&mut self.ignore);
        self.ignore = all_ignores;
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), String> {
        let calibration = self.calibration();
        if !calibration.is_valid() {
            return Err(format!(
                "semantic.calibration: low ({}) must be below high ({})",
                calibration.low, calibration.high
            ));
        }
        if let Some(secs) = self.speech_rate.assumed_duration_secs {
            if !(secs.is_finite() && secs > 0.0) {
                return Err(format!(
                    "speechRate.assumedDurationSecs must be positive, got {}",
                    secs
                ));
            }
        }
        if self.semantic.dimensions == Some(0) {
            return Err("semantic.dimensions must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn calibration(&self) -> Calibration {
        let defaults = Calibration::default();
        Calibration::new(
            self.semantic.calibration.low.unwrap_or(defaults.low),
            self.semantic.calibration.high.unwrap_or(defaults.high),
        )
    }

    pub fn scoring_settings(&self) -> ScoringSettings {
        ScoringSettings {
            calibration: self.calibration(),
            assumed_duration_secs: self
                .speech_rate
                .assumed_duration_secs
                .unwrap_or(DEFAULT_ASSUMED_DURATION_SECS),
        }
    }

    pub fn embedder_settings(&self) -> EmbedderSettings {
        EmbedderSettings {
            provider: self.semantic.provider.unwrap_or_default(),
            dimensions: self
                .semantic
                .dimensions
                .unwrap_or(hashing::DEFAULT_DIMENSIONS),
            model: self
                .semantic
                .model
                .clone()
                .unwrap_or_else(|| http::DEFAULT_MODEL.to_string()),
            endpoint: self
                .semantic
                .endpoint
                .clone()
                .unwrap_or_else(|| http::DEFAULT_ENDPOINT.to_string()),
            api_key_env: self
                .semantic
                .api_key_env
                .clone()
                .unwrap_or_else(|| http::DEFAULT_API_KEY_ENV.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.scoring_settings(), ScoringSettings::default());
        let embedder = config.embedder_settings();
        assert_eq!(embedder.provider, EmbedderProvider::Hashing);
        assert_eq!(embedder.dimensions, hashing::DEFAULT_DIMENSIONS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_camel_case() {
        let config: Config = serde_json::from_str(
            r#"{
                "threshold": 65,
                "semantic": {
                    "provider": "off",
                    "calibration": { "low": 0.1, "high": 0.7 },
                    "apiKeyEnv": "EMBED_KEY"
                },
                "speechRate": { "assumedDurationSecs": 45 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.threshold, Some(65));
        assert_eq!(config.semantic.provider, Some(EmbedderProvider::Off));
        assert_eq!(config.calibration(), Calibration::new(0.1, 0.7));
        assert_eq!(config.scoring_settings().assumed_duration_secs, 45.0);
        assert_eq!(config.embedder_settings().api_key_env, "EMBED_KEY");
    }

    #[test]
    fn test_invalid_calibration_rejected() {
        let config: Config =
            serde_json::from_str(r#"{ "semantic": { "calibration": { "low": 0.8, "high": 0.2 } } }"#)
                .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains("low"));
    }

    #[test]
    fn test_non_positive_duration_rejected() {
        let config: Config =
            serde_json::from_str(r#"{ "speechRate": { "assumedDurationSecs": 0 } }"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let config: Config = serde_json::from_str(r#"{ "semantic": { "dimensions": 0 } }"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config::default().merge_with_cli(Some(90), Some(EmbedderProvider::Off));
        assert_eq!(config.threshold, Some(90));
        assert_eq!(config.embedder_settings().provider, EmbedderProvider::Off);
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("HTTP".parse::<EmbedderProvider>(), Ok(EmbedderProvider::Http));
        assert_eq!("none".parse::<EmbedderProvider>(), Ok(EmbedderProvider::Off));
        assert!("bert".parse::<EmbedderProvider>().is_err());
    }
}
