//! The transform action: request + input → outputs → one recorded run.
//!
//! [`transform`] is commit-or-nothing. Every requested output is generated
//! before the session is touched, so a failure at any step (bad request,
//! missing credential, service error on the third style) leaves the history
//! and the input buffer exactly as they were.

use crate::config::TransformConfig;
use crate::error::RewriteError;
use crate::output::{Output, TransformationRun};
use crate::pipeline::llm::TransformationClient;
use crate::prompts::{build_rewrite_prompt, summary_prompt, SummaryLength};
use crate::session::Session;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use tracing::{info, warn};

/// Built-in rewrite styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RewriteStyle {
    Formal,
    Casual,
    Professional,
    Poetic,
    Simplified,
}

impl RewriteStyle {
    pub const ALL: [RewriteStyle; 5] = [
        RewriteStyle::Formal,
        RewriteStyle::Casual,
        RewriteStyle::Professional,
        RewriteStyle::Poetic,
        RewriteStyle::Simplified,
    ];

    /// Display label, also used in the prompt.
    pub fn label(self) -> &'static str {
        match self {
            RewriteStyle::Formal => "Formal",
            RewriteStyle::Casual => "Casual",
            RewriteStyle::Professional => "Professional",
            RewriteStyle::Poetic => "Poetic",
            RewriteStyle::Simplified => "Simplified",
        }
    }

    /// Output id: the label, lower-cased.
    pub fn id(self) -> String {
        self.label().to_lowercase()
    }
}

impl fmt::Display for RewriteStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RewriteStyle {
    type Err = RewriteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        RewriteStyle::ALL
            .into_iter()
            .find(|style| style.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                RewriteError::InvalidConfig(format!(
                    "unknown style '{wanted}' (expected one of formal, casual, professional, poetic, simplified)"
                ))
            })
    }
}

/// What one transform action should produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransformRequest {
    /// One output per style, plus one for the custom instruction if present.
    Rewrite {
        styles: Vec<RewriteStyle>,
        custom: Option<String>,
    },
    /// A single summary.
    Summarize { length: SummaryLength },
}

impl Default for TransformRequest {
    fn default() -> Self {
        TransformRequest::Rewrite {
            styles: vec![RewriteStyle::Formal],
            custom: None,
        }
    }
}

impl TransformRequest {
    pub fn rewrite(styles: impl IntoIterator<Item = RewriteStyle>) -> Self {
        TransformRequest::Rewrite {
            styles: styles.into_iter().collect(),
            custom: None,
        }
    }

    pub fn custom(instruction: impl Into<String>) -> Self {
        TransformRequest::Rewrite {
            styles: Vec::new(),
            custom: Some(instruction.into()),
        }
    }

    pub fn summarize(length: SummaryLength) -> Self {
        TransformRequest::Summarize { length }
    }

    /// Summary request from a raw length string; fails with
    /// [`RewriteError::InvalidConfig`] outside `short|medium|long`.
    pub fn summarize_str(length: &str) -> Result<Self, RewriteError> {
        Ok(TransformRequest::Summarize {
            length: length.parse()?,
        })
    }

    /// Reject a rewrite that would produce no output.
    pub fn validate(&self) -> Result<(), RewriteError> {
        match self {
            TransformRequest::Rewrite { styles, custom } => {
                let has_custom = custom.as_deref().is_some_and(|c| !c.trim().is_empty());
                if styles.is_empty() && !has_custom {
                    return Err(RewriteError::InvalidConfig(
                        "select at least one style or provide a custom instruction".into(),
                    ));
                }
                Ok(())
            }
            TransformRequest::Summarize { .. } => Ok(()),
        }
    }

    /// Expand into `(id, style label, prompt)` triples, in output order:
    /// the custom instruction first, then styles as requested.
    fn plan(&self, input: &str) -> Vec<(String, String, String)> {
        match self {
            TransformRequest::Rewrite { styles, custom } => {
                let mut planned = Vec::with_capacity(styles.len() + 1);
                if let Some(instruction) = custom.as_deref().filter(|c| !c.trim().is_empty()) {
                    planned.push((
                        "custom".to_string(),
                        "Custom".to_string(),
                        build_rewrite_prompt(instruction, input),
                    ));
                }
                for style in styles {
                    planned.push((
                        style.id(),
                        style.label().to_string(),
                        build_rewrite_prompt(style.label(), input),
                    ));
                }
                planned
            }
            TransformRequest::Summarize { length } => vec![(
                "summary".to_string(),
                format!("Summary-{length}"),
                summary_prompt(*length, input),
            )],
        }
    }
}

/// Produce every output a request asks for, without touching any session.
///
/// Validation and credential resolution happen before the first model call.
pub async fn generate_outputs(
    input: &str,
    request: &TransformRequest,
    config: &TransformConfig,
) -> Result<Vec<Output>, RewriteError> {
    request.validate()?;
    if input.trim().is_empty() {
        return Err(RewriteError::InvalidConfig("there is no input text to transform".into()));
    }

    let planned = request.plan(input);
    let client = TransformationClient::from_config(config)?;
    let total = planned.len();
    let start = Instant::now();
    info!(
        "Transform: {} output(s) via {}, input {} chars",
        total,
        client.model_name(),
        input.len()
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_transform_start(total);
    }

    let mut outputs = Vec::with_capacity(total);
    for (i, (id, style, prompt)) in planned.into_iter().enumerate() {
        let index = i + 1;
        if let Some(ref cb) = config.progress_callback {
            cb.on_output_start(index, total, &style);
        }

        match client.transform(&prompt).await {
            Ok(text) => {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_output_complete(index, total, text.len());
                }
                outputs.push(Output { id, style, text });
            }
            Err(e) => {
                warn!("Output {}/{} ({}) failed: {}", index, total, style, e);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_output_error(index, total, &e.to_string());
                }
                return Err(e);
            }
        }
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_transform_complete(total);
    }
    info!("Transform complete: {} output(s) in {}ms", total, start.elapsed().as_millis());
    Ok(outputs)
}

/// Run the transform action against a session.
///
/// On success the new run is appended and the input buffer set to `input`;
/// on failure the session is unchanged.
pub async fn transform<'s>(
    session: &'s mut Session,
    input: &str,
    request: &TransformRequest,
    config: &TransformConfig,
) -> Result<&'s TransformationRun, RewriteError> {
    let outputs = generate_outputs(input, request, config).await?;
    Ok(session.record_run(input, outputs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_parsing_is_case_insensitive() {
        assert_eq!("formal".parse::<RewriteStyle>().unwrap(), RewriteStyle::Formal);
        assert_eq!(" POETIC ".parse::<RewriteStyle>().unwrap(), RewriteStyle::Poetic);
        assert!("sarcastic".parse::<RewriteStyle>().is_err());
    }

    #[test]
    fn style_ids_are_lowercase_labels() {
        assert_eq!(RewriteStyle::Professional.id(), "professional");
        assert_eq!(RewriteStyle::Simplified.to_string(), "Simplified");
    }

    #[test]
    fn rewrite_without_styles_or_custom_is_invalid() {
        let err = TransformRequest::rewrite([]).validate().unwrap_err();
        assert!(matches!(err, RewriteError::InvalidConfig(_)));

        let blank_custom = TransformRequest::Rewrite {
            styles: vec![],
            custom: Some("   ".into()),
        };
        assert!(blank_custom.validate().is_err());
        assert!(TransformRequest::custom("Explain like I'm 5").validate().is_ok());
    }

    #[test]
    fn summarize_str_rejects_unknown_length() {
        assert!(TransformRequest::summarize_str("medium").is_ok());
        let err = TransformRequest::summarize_str("epic").unwrap_err();
        assert!(matches!(err, RewriteError::InvalidConfig(_)));
    }

    #[test]
    fn plan_orders_custom_first() {
        let req = TransformRequest::Rewrite {
            styles: vec![RewriteStyle::Casual, RewriteStyle::Formal],
            custom: Some("Like a pirate".into()),
        };
        let ids: Vec<String> = req.plan("text").into_iter().map(|(id, _, _)| id).collect();
        assert_eq!(ids, ["custom", "casual", "formal"]);
    }

    #[test]
    fn plan_for_summary_labels_length() {
        let planned = TransformRequest::summarize(SummaryLength::Medium).plan("some text");
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].0, "summary");
        assert_eq!(planned[0].1, "Summary-medium");
        assert!(planned[0].2.contains("concise medium summary"));
    }

    #[test]
    fn default_request_is_formal_rewrite() {
        assert_eq!(
            TransformRequest::default(),
            TransformRequest::rewrite([RewriteStyle::Formal])
        );
    }
}
