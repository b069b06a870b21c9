//! Parsing of raw generation responses.
//!
//! Models often wrap JSON in markdown code fences despite being asked not to,
//! so a leading fence is stripped before parsing.

use serde_json::Value;
use thiserror::Error;

/// Errors turning a response into a record list
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("Response content is empty")]
    Empty,

    #[error("Failed to parse JSON from response: {source}\nRaw content after cleaning: {preview}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
        preview: String,
    },

    #[error("Expected a non-empty JSON list, got: {0}")]
    NotAList(String),
}

/// Strip an optional ```` ```json ```` / ```` ``` ```` fence
pub fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    else {
        return trimmed;
    };
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Parse a raw response into a non-empty list of records
pub fn parse_raw_response(content: &str) -> Result<Vec<Value>, ResponseError> {
    if content.trim().is_empty() {
        return Err(ResponseError::Empty);
    }

    let cleaned = strip_code_fence(content);
    let value: Value = serde_json::from_str(cleaned).map_err(|source| ResponseError::InvalidJson {
        source,
        preview: preview(cleaned, 500),
    })?;

    match value {
        Value::Array(items) if !items.is_empty() => Ok(items),
        other => Err(ResponseError::NotAList(preview(&other.to_string(), 200))),
    }
}

fn preview(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
