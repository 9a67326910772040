//! Recover a JSON value from free-form collaborator replies
//!
//! Replies may be bare JSON, JSON inside a markdown fence, or JSON surrounded
//! by prose. Strategies are tried in order and the first success wins:
//!
//! 1. the trimmed reply parsed as-is
//! 2. each fenced block, then the reply with fence lines removed
//! 3. the span from the first `{` or `[` to the last matching closer

use crate::error::ParseError;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Longest excerpt of a reply quoted in a [`ParseError`]
pub const PREVIEW_CHARS: usize = 200;

/// Open fence (optional tag), lazily matched body, close fence
static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_+\-]*[ \t]*\r?\n?(.*?)```").expect("fence pattern is valid")
});

/// A line consisting only of a fence marker
static FENCE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[A-Za-z0-9_+\-]*$").expect("fence line pattern is valid"));

/// Extract a JSON value from a reply
pub fn extract_json(response: &str) -> Result<Value, ParseError> {
    extract_json_for(response, "response")
}

/// Extract a JSON value, naming what the reply was for in error messages
pub fn extract_json_for(response: &str, context: &str) -> Result<Value, ParseError> {
    let cleaned = response.trim();
    if cleaned.is_empty() {
        return Err(ParseError::Empty {
            context: context.to_string(),
        });
    }

    if let Ok(value) = serde_json::from_str(cleaned) {
        return Ok(value);
    }

    if cleaned.contains("```") {
        if let Some(value) = parse_fenced(cleaned) {
            return Ok(value);
        }
    }

    let candidate = bracket_candidate(cleaned, response, context)?;
    serde_json::from_str(candidate).map_err(|e| ParseError::Invalid {
        context: context.to_string(),
        preview: preview(response),
        candidate: preview(candidate),
        reason: e.to_string(),
    })
}

fn parse_fenced(text: &str) -> Option<Value> {
    for block in FENCED_BLOCK.captures_iter(text) {
        if let Some(body) = block.get(1) {
            if let Ok(value) = serde_json::from_str(body.as_str().trim()) {
                return Some(value);
            }
        }
    }

    let stripped: Vec<&str> = text
        .lines()
        .filter(|line| !FENCE_LINE.is_match(line.trim()))
        .collect();
    serde_json::from_str(stripped.join("\n").trim()).ok()
}

fn bracket_candidate<'a>(cleaned: &'a str, original: &str, context: &str) -> Result<&'a str, ParseError> {
    let (start, closer) = match (cleaned.find('{'), cleaned.find('[')) {
        (None, None) => {
            return Err(ParseError::NoJson {
                context: context.to_string(),
                preview: preview(original),
            })
        }
        (Some(brace), None) => (brace, '}'),
        (None, Some(bracket)) => (bracket, ']'),
        (Some(brace), Some(bracket)) if brace < bracket => (brace, '}'),
        (Some(_), Some(bracket)) => (bracket, ']'),
    };

    match cleaned.rfind(closer) {
        Some(end) if end > start => Ok(&cleaned[start..=end]),
        _ => Err(ParseError::Malformed {
            context: context.to_string(),
            preview: preview(original),
        }),
    }
}

/// First [`PREVIEW_CHARS`] characters, with an ellipsis when cut
pub(crate) fn preview(text: &str) -> String {
    let mut chars = text.char_indices();
    match chars.nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
