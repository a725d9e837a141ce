//! Configuration for the strategy service.

use std::sync::Arc;

use llm::gemini::{API_KEY_ENV, GEMINI_API_KEY_ENV};
pub use llm::gemini::DEFAULT_MODEL;
use llm::{AIProvider, GeminiProvider};

use crate::error::{StrategyError, StrategyResult};

/// Environment variable overriding the model.
pub const MODEL_ENV: &str = "SOUNDBRAND_MODEL";

/// Environment variable overriding the Gemini endpoint.
pub const BASE_URL_ENV: &str = "GEMINI_BASE_URL";

/// Environment variable enabling strict pricing checks.
pub const STRICT_PRICING_ENV: &str = "SOUNDBRAND_STRICT_PRICING";

/// Settings the pipeline needs for every run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    /// Model identifier sent with every request.
    pub model: String,
    /// Fail the licensing step when the plan breaks the pricing rules
    /// instead of only logging a warning.
    pub strict_pricing: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            strict_pricing: false,
        }
    }
}

/// Full service configuration: credential plus pipeline options.
///
/// The credential is validated once, here; the provider built from it is
/// then handed to the pipeline as a dependency.
#[derive(Clone)]
pub struct StrategyConfig {
    api_key: String,
    /// Optional endpoint override, mainly for tests and proxies.
    pub base_url: Option<String>,
    pub options: PipelineOptions,
}

impl std::fmt::Debug for StrategyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("options", &self.options)
            .finish()
    }
}

impl StrategyConfig {
    /// Create a configuration with an explicit credential.
    pub fn new(api_key: impl Into<String>) -> StrategyResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(StrategyError::Configuration(format!(
                "{API_KEY_ENV} is missing from environment variables"
            )));
        }
        Ok(Self {
            api_key,
            base_url: None,
            options: PipelineOptions::default(),
        })
    }

    /// Create configuration from environment variables.
    ///
    /// # Required Environment Variables
    /// - `API_KEY`: Gemini API key (`GEMINI_API_KEY` is accepted as fallback)
    ///
    /// # Optional Environment Variables
    /// - `SOUNDBRAND_MODEL`: Model to use (default: gemini-2.5-flash)
    /// - `GEMINI_BASE_URL`: Endpoint override
    /// - `SOUNDBRAND_STRICT_PRICING`: "true" or "1" to enforce pricing rules
    pub fn from_env() -> StrategyResult<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .or_else(|_| std::env::var(GEMINI_API_KEY_ENV))
            .unwrap_or_default();

        let mut config = Self::new(api_key)?;

        if let Ok(model) = std::env::var(MODEL_ENV) {
            if !model.trim().is_empty() {
                config.options.model = model;
            }
        }

        config.base_url = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty());

        config.options.strict_pricing = std::env::var(STRICT_PRICING_ENV)
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        Ok(config)
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.options.model = model.into();
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_strict_pricing(mut self, strict: bool) -> Self {
        self.options.strict_pricing = strict;
        self
    }

    /// Build the Gemini provider for this configuration.
    pub fn build_provider(&self) -> StrategyResult<Arc<dyn AIProvider>> {
        let provider = GeminiProvider::new(self.api_key.clone())
            .map_err(|e| StrategyError::Configuration(e.to_string()))?;
        let provider = match &self.base_url {
            Some(url) => provider.with_base_url(url.clone()),
            None => provider,
        };
        Ok(Arc::new(provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_key_is_configuration_error() {
        let err = StrategyConfig::new("").unwrap_err();
        assert!(matches!(err, StrategyError::Configuration(_)));
        assert!(err.to_string().contains("API_KEY"));
    }

    #[test]
    fn test_builders() {
        let config = StrategyConfig::new("key")
            .unwrap()
            .with_model("gemini-2.5-pro")
            .with_base_url("http://localhost:1234")
            .with_strict_pricing(true);

        assert_eq!(config.options.model, "gemini-2.5-pro");
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:1234"));
        assert!(config.options.strict_pricing);
        assert!(config.build_provider().unwrap().is_configured());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = StrategyConfig::new("super-secret").unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_default_options() {
        let options = PipelineOptions::default();
        assert_eq!(options.model, DEFAULT_MODEL);
        assert!(!options.strict_pricing);
    }
}
