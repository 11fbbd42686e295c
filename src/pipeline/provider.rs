//! edgequake-llm providers as [`GenerativeModel`]s.
//!
//! The default path is [`ProviderModel::gemini`]: a `GeminiProvider` built
//! from the key that [`crate::credentials::resolve_credential`] found, so the
//! secrets-file lookup applies. Naming a provider (`--provider openai`,
//! `anthropic`, `ollama`, …) goes through the factory instead, and each
//! provider reads its own API key from the environment (`OPENAI_API_KEY`,
//! `ANTHROPIC_API_KEY`, …).

use crate::config::TransformConfig;
use crate::credentials::ApiKey;
use crate::error::RewriteError;
use crate::pipeline::llm::{GenerativeModel, ModelResponse};
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, GeminiProvider, LLMProvider, ProviderFactory};
use std::sync::Arc;

/// An edgequake-llm provider behind the [`GenerativeModel`] seam.
pub struct ProviderModel {
    provider: Arc<dyn LLMProvider>,
    label: String,
    options: CompletionOptions,
}

impl ProviderModel {
    /// Wrap an already-constructed provider.
    pub fn new(provider: Arc<dyn LLMProvider>, label: impl Into<String>, config: &TransformConfig) -> Self {
        Self {
            provider,
            label: label.into(),
            options: build_options(config),
        }
    }

    /// Gemini with an explicit API key. A `models/` prefix on the model id is
    /// accepted and dropped.
    pub fn gemini(key: &ApiKey, config: &TransformConfig) -> Self {
        let model = config.model_id().trim().trim_start_matches("models/");
        let provider = GeminiProvider::new(key.expose()).with_model(model);
        Self::new(Arc::new(provider), format!("gemini/{model}"), config)
    }

    /// Create the named provider via [`ProviderFactory::create_llm_provider`].
    ///
    /// A provider that cannot be created (usually a missing key) is reported
    /// as [`RewriteError::MissingCredential`] with the factory's message.
    pub fn from_factory(provider_name: &str, config: &TransformConfig) -> Result<Self, RewriteError> {
        let model = config.model_id();
        let provider = ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
            RewriteError::MissingCredential {
                key: format!("{provider_name} provider"),
                hint: format!("{e}"),
            }
        })?;
        Ok(Self::new(
            provider,
            format!("{provider_name}/{model}"),
            config,
        ))
    }
}

#[async_trait]
impl GenerativeModel for ProviderModel {
    async fn generate(&self, prompt: &str) -> Result<ModelResponse, RewriteError> {
        let messages = vec![ChatMessage::user(prompt)];
        let response = self
            .provider
            .chat(&messages, Some(&self.options))
            .await
            .map_err(|e| RewriteError::transformation(format!("{}: {}", self.label, e)))?;
        Ok(ModelResponse::TextField(response.content))
    }

    fn name(&self) -> &str {
        &self.label
    }
}

/// Forward only the knobs the user actually set.
fn build_options(config: &TransformConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: config.temperature,
        max_tokens: config.max_output_tokens.map(|n| n as usize),
        ..Default::default()
    }
}
