//! Configuration type definitions.

use crate::constants::{DEFAULT_THRESHOLD, DEFAULT_TOP_K, upstream};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upstream provider settings.
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Classification settings.
    #[serde(default)]
    pub classification: ClassificationConfig,

    /// Species reference data settings.
    #[serde(default)]
    pub species: SpeciesConfig,
}

impl Config {
    /// Copy of the configuration with secrets masked, for display.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.upstream.api_token.is_some() {
            config.upstream.api_token = Some("********".to_string());
        }
        config
    }
}

/// Upstream classification provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Provider protocol.
    pub provider: ProviderKind,

    /// Endpoint URL; the provider default is used when unset.
    pub endpoint: Option<String>,

    /// Bearer token sent to the provider.
    pub api_token: Option<String>,

    /// Model identifier (chat providers only).
    pub model: String,

    /// Sampling temperature (chat providers only).
    pub temperature: f32,

    /// Maximum number of output tokens (chat providers only).
    pub max_output_tokens: u32,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            endpoint: None,
            api_token: None,
            model: upstream::DEFAULT_OPENAI_MODEL.to_string(),
            temperature: upstream::DEFAULT_TEMPERATURE,
            max_output_tokens: upstream::DEFAULT_MAX_OUTPUT_TOKENS,
            timeout_secs: upstream::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl UpstreamConfig {
    /// Configured endpoint, or the provider's default.
    pub fn resolved_endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.provider.default_endpoint())
    }
}

/// Supported upstream provider protocols.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum ProviderKind {
    /// Hugging Face style: raw image bytes in, JSON predictions out.
    #[default]
    #[serde(rename = "huggingface")]
    #[value(name = "huggingface")]
    HuggingFace,
    /// OpenAI style chat completion with the image inlined.
    #[serde(rename = "openai")]
    #[value(name = "openai")]
    OpenAi,
}

impl ProviderKind {
    /// Default endpoint for this provider.
    pub fn default_endpoint(self) -> &'static str {
        match self {
            Self::HuggingFace => upstream::DEFAULT_HUGGINGFACE_ENDPOINT,
            Self::OpenAi => upstream::DEFAULT_OPENAI_ENDPOINT,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HuggingFace => write!(f, "huggingface"),
            Self::OpenAi => write!(f, "openai"),
        }
    }
}

/// Classification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Number of ranked predictions kept.
    pub top_k: usize,

    /// Minimum score for an automatic identification.
    pub threshold: f32,

    /// How predictions are ordered before truncation.
    pub ranking: Ranking,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            threshold: DEFAULT_THRESHOLD,
            ranking: Ranking::default(),
        }
    }
}

/// Ordering applied to normalized predictions.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Ranking {
    /// Keep the upstream's order, including ties and inversions.
    #[default]
    Upstream,
    /// Sort by descending score; ties keep upstream order.
    Score,
}

impl std::fmt::Display for Ranking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upstream => write!(f, "upstream"),
            Self::Score => write!(f, "score"),
        }
    }
}

/// Species reference data settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeciesConfig {
    /// Custom species table; the built-in table is used when unset.
    pub table: Option<PathBuf>,
}

/// Output mode for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputMode {
    /// Human-readable summary.
    #[default]
    Human,
    /// One JSON envelope per line.
    Json,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_defaults() {
        let defaults = ClassificationConfig::default();
        assert_eq!(defaults.top_k, 5);
        assert_eq!(defaults.threshold, 0.6);
        assert_eq!(defaults.ranking, Ranking::Upstream);
    }

    #[test]
    fn test_upstream_defaults() {
        let upstream = UpstreamConfig::default();
        assert_eq!(upstream.provider, ProviderKind::HuggingFace);
        assert_eq!(upstream.model, "gpt-4o-mini");
        assert_eq!(upstream.max_output_tokens, 600);
        assert_eq!(upstream.timeout_secs, 30);
        assert!(upstream.resolved_endpoint().contains("huggingface"));
    }

    #[test]
    fn test_resolved_endpoint_prefers_configured() {
        let upstream = UpstreamConfig {
            provider: ProviderKind::OpenAi,
            endpoint: Some("http://localhost:8080/v1/chat/completions".into()),
            ..UpstreamConfig::default()
        };
        assert_eq!(
            upstream.resolved_endpoint(),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_provider_kind_serde_names() {
        let config: Config = toml::from_str(
            r#"
[upstream]
provider = "openai"

[classification]
ranking = "score"
"#,
        )
        .unwrap();
        assert_eq!(config.upstream.provider, ProviderKind::OpenAi);
        assert_eq!(config.classification.ranking, Ranking::Score);
        assert_eq!(ProviderKind::HuggingFace.to_string(), "huggingface");
    }

    #[test]
    fn test_redacted_masks_token() {
        let mut config = Config::default();
        config.upstream.api_token = Some("hf_secret".into());
        let redacted = config.redacted();
        assert_eq!(redacted.upstream.api_token.as_deref(), Some("********"));
        assert_eq!(config.upstream.api_token.as_deref(), Some("hf_secret"));
        assert!(Config::default().redacted().upstream.api_token.is_none());
    }
}
