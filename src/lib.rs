//! # edgequake-rewrite
//!
//! Rewrite or summarise text with a hosted generative model.
//!
//! Text comes from the caller or from an uploaded PDF/DOCX document. Each
//! transform action turns one input into one or more outputs (a rewrite per
//! selected style, an optional custom-instruction rewrite, or a single
//! summary) and records them as one run in a [`Session`] that supports undo.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input text / PDF / DOCX
//!  │
//!  ├─ 1. Extract  document bytes → plain text (spawn_blocking)
//!  ├─ 2. Prompt   fixed templates with style / length / source text
//!  ├─ 3. Model    one call per output (Gemini or another edgequake-llm provider)
//!  ├─ 4. Record   all outputs committed as one run, or none on failure
//!  └─ 5. Output   display, JSON, or `output_<style>.txt` files
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_rewrite::{transform, RewriteStyle, Session, TransformConfig, TransformRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads GOOGLE_API_KEY from .edgequake/secrets.toml or the environment
//!     let config = TransformConfig::default();
//!     let mut session = Session::new();
//!     let request = TransformRequest::rewrite([RewriteStyle::Formal, RewriteStyle::Casual]);
//!
//!     let run = transform(&mut session, "hey, wanna grab lunch?", &request, &config).await?;
//!     for output in &run.outputs {
//!         println!("[{}] {}", output.style, output.text);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `rewrite` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-rewrite = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod credentials;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod session;
pub mod transform;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{TransformConfig, TransformConfigBuilder, DEFAULT_MODEL};
pub use credentials::{resolve_credential, ApiKey, CredentialOrigin, ResolvedCredential, DEFAULT_CREDENTIAL_KEY};
pub use error::RewriteError;
pub use output::{write_outputs, Output, TextStats, TransformationRun};
pub use pipeline::extract::{extract, extract_bytes, extract_file, DocumentFormat, DOCX_MIME, PDF_MIME};
pub use pipeline::llm::{GenerativeModel, ModelResponse, TransformationClient};
pub use pipeline::provider::ProviderModel;
pub use progress::{NoopProgressCallback, ProgressCallback, TransformProgressCallback};
pub use prompts::{build_rewrite_prompt, build_summary_prompt, summary_prompt, SummaryLength};
pub use session::{Session, SessionState};
pub use transform::{generate_outputs, transform, RewriteStyle, TransformRequest};
