//! Pipeline stages for a transform action.
//!
//! ```text
//! extract ──▶ prompts ──▶ llm ──▶ session
//! (pdf/docx)  (template)  (model)  (history)
//! ```
//!
//! 1. [`extract`]: turn an uploaded PDF or DOCX into plain text; dispatches
//!    on the declared MIME type to [`pdf`] or [`docx`]
//! 2. [`crate::prompts`]: render the instruction for one output
//! 3. [`llm`]: the transformation client and the [`llm::GenerativeModel`]
//!    seam; [`provider`] backs it with edgequake-llm (Gemini by default)
//!
//! Only the `llm` stage performs network I/O.

pub mod docx;
pub mod extract;
pub mod llm;
pub mod pdf;
pub mod provider;
