//! Prompt templates for rewriting and summarising.
//!
//! All prompt wording lives here so it can be inspected by tests and changed
//! in one place. Templates use `{name}` placeholders that are filled in a
//! single pass by [`render`]: substituted values are copied verbatim and never
//! scanned again, so a source text that itself contains `{style}` or `{text}`
//! comes out untouched.

use crate::error::RewriteError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rewrite template. Placeholders: `{style}`, `{text}`.
pub const REWRITE_TEMPLATE: &str = "You are an expert writing assistant.
Rewrite the TEXT below in a {style} style.
Preserve the original meaning and improve clarity.
Keep structural formatting such as lists and line breaks where it helps the reader.
Do not add facts, names, or figures that are not present in the original.
Return only the rewritten text, with no commentary.

STYLE: {style}
TEXT:
{text}
";

/// Summary template. Placeholders: `{length}`, `{text}`.
pub const SUMMARY_TEMPLATE: &str = "You are an expert writing assistant.
Summarize the TEXT below into a concise {length} summary.
Preserve the key facts and do not invent new information.
Return only the summary text.

TEXT:
{text}
";

/// Target length of a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    #[default]
    Short,
    Medium,
    Long,
}

impl SummaryLength {
    pub const ALL: [SummaryLength; 3] = [SummaryLength::Short, SummaryLength::Medium, SummaryLength::Long];

    pub fn as_str(self) -> &'static str {
        match self {
            SummaryLength::Short => "short",
            SummaryLength::Medium => "medium",
            SummaryLength::Long => "long",
        }
    }
}

impl fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryLength {
    type Err = RewriteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(SummaryLength::Short),
            "medium" => Ok(SummaryLength::Medium),
            "long" => Ok(SummaryLength::Long),
            other => Err(RewriteError::InvalidConfig(format!(
                "summary length must be one of short, medium, long (got '{other}')"
            ))),
        }
    }
}

/// Build the rewrite prompt for a style label or a free-text instruction.
///
/// Both are interpolated the same way; `source_text` is embedded unmodified.
pub fn build_rewrite_prompt(style_or_instruction: &str, source_text: &str) -> String {
    render(
        REWRITE_TEMPLATE,
        &[("style", style_or_instruction), ("text", source_text)],
    )
}

/// Build the summary prompt from a raw length string.
///
/// Fails with [`RewriteError::InvalidConfig`] unless `length` is one of
/// `short`, `medium`, `long`.
pub fn build_summary_prompt(length: &str, source_text: &str) -> Result<String, RewriteError> {
    let length: SummaryLength = length.parse()?;
    Ok(summary_prompt(length, source_text))
}

/// Typed variant of [`build_summary_prompt`].
pub fn summary_prompt(length: SummaryLength, source_text: &str) -> String {
    render(
        SUMMARY_TEMPLATE,
        &[("length", length.as_str()), ("text", source_text)],
    )
}

/// Single-pass `{name}` substitution. Unknown placeholders are left as-is.
fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let extra: usize = vars.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra * 2);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| (*v, close))
        });
        match replaced {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrite_prompt_embeds_source_verbatim() {
        let text = "Meeting moved to 3pm.\n- bring slides\n- bring coffee";
        let prompt = build_rewrite_prompt("Formal", text);
        assert!(prompt.contains(text));
        assert!(prompt.contains("STYLE: Formal"));
    }

    #[test]
    fn rewrite_prompt_contains_nothing_but_template_and_inputs() {
        let text = "the quick brown fox";
        let style = "Poetic";
        let prompt = build_rewrite_prompt(style, text);
        let skeleton = REWRITE_TEMPLATE.replace("{style}", "").replace("{text}", "");
        assert_eq!(prompt.replace(style, "").replace(text, ""), skeleton);
    }

    #[test]
    fn template_covers_required_instructions() {
        let lower = REWRITE_TEMPLATE.to_lowercase();
        assert!(lower.contains("preserve the original meaning"));
        assert!(lower.contains("do not add facts"));
        assert!(lower.contains("return only"));
        assert!(lower.contains("lists and line breaks"));
    }

    #[test]
    fn placeholders_in_source_are_not_expanded() {
        let text = "literal {style} and {text} and {length}";
        let prompt = build_rewrite_prompt("Casual", text);
        assert!(prompt.contains(text), "got: {prompt}");

        let summary = summary_prompt(SummaryLength::Long, text);
        assert!(summary.contains(text), "got: {summary}");
    }

    #[test]
    fn custom_instruction_is_interpolated_like_a_style() {
        let prompt = build_rewrite_prompt("Explain like I'm 5", "Photosynthesis converts light.");
        assert!(prompt.contains("in a Explain like I'm 5 style"));
        assert!(prompt.contains("Photosynthesis converts light."));
    }

    #[test]
    fn summary_prompt_accepts_each_length() {
        for len in ["short", "medium", "long", " Medium "] {
            let p = build_summary_prompt(len, "abc").expect("valid length");
            assert!(p.contains(&format!("concise {} summary", len.trim().to_lowercase())));
            assert!(p.ends_with("abc\n"));
        }
    }

    #[test]
    fn summary_prompt_rejects_unknown_length() {
        let err = build_summary_prompt("huge", "abc").unwrap_err();
        assert!(matches!(err, RewriteError::InvalidConfig(_)), "got: {err:?}");
    }

    #[test]
    fn render_leaves_unmatched_braces() {
        assert_eq!(render("{a} {b} {", &[("a", "x")]), "x {b} {");
    }

    #[test]
    fn empty_source_text_is_allowed() {
        let prompt = build_rewrite_prompt("Formal", "");
        assert!(prompt.ends_with("TEXT:\n\n"));
    }
}
