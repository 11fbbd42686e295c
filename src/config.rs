//! Configuration for the transformation client.
//!
//! Every knob that affects how a prompt reaches the model lives in
//! [`TransformConfig`], built via [`TransformConfigBuilder`]. Per-action
//! choices (which styles, which summary length) are not configuration; they
//! travel in a [`crate::transform::TransformRequest`].

use crate::credentials::DEFAULT_CREDENTIAL_KEY;
use crate::error::RewriteError;
use crate::pipeline::llm::GenerativeModel;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Default hosted model: the flash tier is fast and cheap enough for
/// interactive rewriting.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Configuration for text transformation.
///
/// # Example
/// ```rust
/// use edgequake_rewrite::TransformConfig;
///
/// let config = TransformConfig::builder()
///     .model("gemini-2.0-flash")
///     .temperature(0.4)
///     .build()
///     .unwrap();
/// assert_eq!(config.model_id(), "gemini-2.0-flash");
/// ```
#[derive(Clone)]
pub struct TransformConfig {
    /// Model identifier. If None, the Gemini path uses [`DEFAULT_MODEL`].
    ///
    /// Required when `provider_name` is set: the default is a Gemini model
    /// and means nothing to other providers.
    pub model: Option<String>,

    /// Name of the credential looked up in the secrets file and environment.
    /// Default: `GOOGLE_API_KEY`.
    pub credential_key: String,

    /// Explicit secrets file. If None, the default locations are searched.
    pub secrets_path: Option<PathBuf>,

    /// edgequake-llm provider name (e.g. "openai", "anthropic", "ollama").
    /// If None, Gemini is used with the credential from `credential_key`.
    pub provider_name: Option<String>,

    /// Pre-constructed model. Takes precedence over everything else.
    pub generator: Option<Arc<dyn GenerativeModel>>,

    /// Sampling temperature. If None, the service default applies.
    pub temperature: Option<f32>,

    /// Output token cap. If None, the service default applies.
    pub max_output_tokens: Option<u32>,

    /// Receives per-output progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            model: None,
            credential_key: DEFAULT_CREDENTIAL_KEY.to_string(),
            secrets_path: None,
            provider_name: None,
            generator: None,
            temperature: None,
            max_output_tokens: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for TransformConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformConfig")
            .field("model", &self.model)
            .field("credential_key", &self.credential_key)
            .field("secrets_path", &self.secrets_path)
            .field("provider_name", &self.provider_name)
            .field("generator", &self.generator.as_ref().map(|_| "<dyn GenerativeModel>"))
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn TransformProgressCallback>"),
            )
            .finish()
    }
}

impl TransformConfig {
    /// Create a new builder for `TransformConfig`.
    pub fn builder() -> TransformConfigBuilder {
        TransformConfigBuilder {
            config: Self::default(),
        }
    }

    /// The model to request: the configured one, else [`DEFAULT_MODEL`].
    pub fn model_id(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }
}

/// Builder for [`TransformConfig`].
#[derive(Debug)]
pub struct TransformConfigBuilder {
    config: TransformConfig,
}

impl TransformConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn credential_key(mut self, key: impl Into<String>) -> Self {
        self.config.credential_key = key.into();
        self
    }

    pub fn secrets_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.secrets_path = Some(path.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn generator(mut self, model: Arc<dyn GenerativeModel>) -> Self {
        self.config.generator = Some(model);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = Some(t.clamp(0.0, 2.0));
        self
    }

    pub fn max_output_tokens(mut self, n: u32) -> Self {
        self.config.max_output_tokens = Some(n);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<TransformConfig, RewriteError> {
        let c = &self.config;
        if c.model.as_deref().is_some_and(|m| m.trim().is_empty()) {
            return Err(RewriteError::InvalidConfig("model name must not be empty".into()));
        }
        if let (Some(provider), None) = (&c.provider_name, &c.model) {
            return Err(RewriteError::InvalidConfig(format!(
                "provider '{provider}' needs an explicit model (--model)"
            )));
        }
        if c.credential_key.trim().is_empty() {
            return Err(RewriteError::InvalidConfig(
                "credential key name must not be empty".into(),
            ));
        }
        if c.max_output_tokens == Some(0) {
            return Err(RewriteError::InvalidConfig(
                "max output tokens must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = TransformConfig::default();
        assert!(c.model.is_none());
        assert_eq!(c.model_id(), "gemini-2.0-flash");
        assert_eq!(c.credential_key, "GOOGLE_API_KEY");
        assert!(c.provider_name.is_none());
        assert!(c.temperature.is_none());
    }

    #[test]
    fn temperature_is_clamped() {
        let c = TransformConfig::builder().temperature(5.0).build().unwrap();
        assert_eq!(c.temperature, Some(2.0));
    }

    #[test]
    fn named_provider_requires_a_model() {
        let err = TransformConfig::builder()
            .provider_name("openai")
            .build()
            .unwrap_err();
        assert!(
            matches!(err, RewriteError::InvalidConfig(ref m) if m.contains("openai")),
            "got {err:?}"
        );

        let c = TransformConfig::builder()
            .provider_name("openai")
            .model("gpt-4.1-nano")
            .build()
            .unwrap();
        assert_eq!(c.model_id(), "gpt-4.1-nano");
    }

    #[test]
    fn rejects_empty_model() {
        assert!(TransformConfig::builder().model("  ").build().is_err());
    }

    #[test]
    fn rejects_zero_output_tokens() {
        assert!(TransformConfig::builder().max_output_tokens(0).build().is_err());
    }

    #[test]
    fn debug_hides_trait_objects() {
        let c = TransformConfig::default();
        let s = format!("{c:?}");
        assert!(s.contains("model: None"));
        assert!(s.contains("generator: None"));
    }
}
