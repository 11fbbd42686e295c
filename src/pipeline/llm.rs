//! The transformation client: prompt in, trimmed text out.
//!
//! [`TransformationClient`] is thin. Prompt wording lives in
//! [`crate::prompts`]; wire formats live behind the [`GenerativeModel`] trait,
//! implemented for edgequake-llm providers by
//! [`crate::pipeline::provider::ProviderModel`].
//!
//! ## Response shapes
//!
//! The upstream response shape is not guaranteed, so models return a
//! [`ModelResponse`] instead of a string and the client extracts text from
//! whichever variant arrived. Every variant yields some text; none is an error.

use crate::config::TransformConfig;
use crate::credentials::resolve_credential;
use crate::error::RewriteError;
use crate::pipeline::provider::ProviderModel;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// A hosted generative-text model: one prompt, one non-streamed response.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<ModelResponse, RewriteError>;

    /// Name used in logs.
    fn name(&self) -> &str {
        "model"
    }
}

/// What a model call returned, before text extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelResponse {
    /// The service returned text directly.
    TextField(String),
    /// A JSON object without a recognised text field.
    MappingPayload(Map<String, Value>),
    /// Anything else.
    Unknown(Value),
}

impl ModelResponse {
    /// Classify a raw JSON response body.
    ///
    /// Gemini's `candidates[0].content.parts[*].text` and a top-level `text`
    /// string are [`ModelResponse::TextField`]; other objects are
    /// [`ModelResponse::MappingPayload`]; everything else is
    /// [`ModelResponse::Unknown`].
    pub fn from_json(value: Value) -> Self {
        if let Some(text) = candidate_text(&value) {
            return ModelResponse::TextField(text);
        }
        match value {
            Value::Object(map) => {
                if let Some(Value::String(text)) = map.get("text") {
                    return ModelResponse::TextField(text.clone());
                }
                ModelResponse::MappingPayload(map)
            }
            other => ModelResponse::Unknown(other),
        }
    }

    /// Extract the text, untrimmed.
    ///
    /// A mapping yields its `content` entry, else its `output` entry, else
    /// its own JSON text; empty or null entries are skipped.
    pub fn into_text(self) -> String {
        match self {
            ModelResponse::TextField(text) => text,
            ModelResponse::MappingPayload(map) => ["content", "output"]
                .iter()
                .find_map(|key| map.get(*key).and_then(present_text))
                .unwrap_or_else(|| Value::Object(map).to_string()),
            ModelResponse::Unknown(Value::String(s)) => s,
            ModelResponse::Unknown(other) => other.to_string(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ModelResponse::TextField(_) => "text",
            ModelResponse::MappingPayload(_) => "mapping",
            ModelResponse::Unknown(_) => "unknown",
        }
    }
}

/// Concatenated non-thought part texts of the first candidate, if any.
fn candidate_text(value: &Value) -> Option<String> {
    let parts = value
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let texts: Vec<&str> = parts
        .iter()
        .filter(|p| p.get("thought").and_then(Value::as_bool) != Some(true))
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();
    if texts.is_empty() {
        None
    } else {
        Some(texts.concat())
    }
}

/// Text of a mapping entry, or `None` for "empty" values.
fn present_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Array(a) if a.is_empty() => None,
        Value::Object(o) if o.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Sends prompts to a [`GenerativeModel`] and returns trimmed text.
#[derive(Clone)]
pub struct TransformationClient {
    model: Arc<dyn GenerativeModel>,
}

impl TransformationClient {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    /// Resolve the model from configuration, from most-specific to least-specific.
    ///
    /// 1. **Pre-built model** (`config.generator`): used as-is.
    /// 2. **Named provider** (`config.provider_name`): created through the
    ///    edgequake-llm `ProviderFactory`, which reads that provider's own key.
    /// 3. **Gemini**: needs the credential from
    ///    [`crate::credentials::resolve_credential`]; a missing key fails here
    ///    with [`RewriteError::MissingCredential`], before any request exists.
    pub fn from_config(config: &TransformConfig) -> Result<Self, RewriteError> {
        if let Some(ref model) = config.generator {
            return Ok(Self::new(Arc::clone(model)));
        }

        if let Some(ref name) = config.provider_name {
            let model = ProviderModel::from_factory(name, config)?;
            return Ok(Self::new(Arc::new(model)));
        }

        let credential = resolve_credential(&config.credential_key, config.secrets_path.as_deref())?;
        Ok(Self::new(Arc::new(ProviderModel::gemini(&credential.key, config))))
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Send one prompt and return the extracted, trimmed result.
    ///
    /// Empty text is a valid result.
    pub async fn transform(&self, prompt: &str) -> Result<String, RewriteError> {
        let start = Instant::now();
        debug!("{}: sending prompt of {} chars", self.model.name(), prompt.len());

        let response = self.model.generate(prompt).await?;
        let kind = response.kind();
        let text = response.into_text().trim().to_string();

        info!(
            "{}: {} response, {} chars in {:?}",
            self.model.name(),
            kind,
            text.len(),
            start.elapsed()
        );
        Ok(text)
    }
}
