//! Structured diagnosis extraction from chat-completion output.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Extraction errors.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// How strictly a model reply must conform to the JSON schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Pull the JSON object out of surrounding prose or markdown fences.
    #[default]
    Lenient,
    /// The whole trimmed reply must be a single JSON object.
    Strict,
}

/// Diagnosis fields returned by the model.
///
/// Every field is optional on the wire. Lists tolerate a bare string or
/// `null` in place of an array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiDiagnosis {
    #[serde(default, deserialize_with = "lenient_string")]
    pub disease: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub explanation: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub medications: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub precautions: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub diet: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub workout: Vec<String>,
}

/// Parse a model reply into an [`AiDiagnosis`].
pub fn parse_diagnosis_output(reply: &str, mode: ParseMode) -> ExtractionResult<AiDiagnosis> {
    match mode {
        ParseMode::Strict => {
            let trimmed = reply.trim();
            if !trimmed.starts_with('{') {
                return Err(ExtractionError::InvalidFormat(
                    "Reply is not a bare JSON object".into(),
                ));
            }
            Ok(serde_json::from_str(trimmed)?)
        }
        ParseMode::Lenient => parse_lenient(reply),
    }
}

fn parse_lenient(reply: &str) -> ExtractionResult<AiDiagnosis> {
    let outer = outer_brace_span(reply).ok_or_else(|| {
        ExtractionError::InvalidFormat("No JSON object found in response".into())
    })?;

    match first_balanced_object(reply) {
        Some(span) => match serde_json::from_str(span) {
            Ok(diagnosis) => Ok(diagnosis),
            // Braces in prose can close the first span early; retry on the
            // widest span before giving up.
            Err(_) if span.len() != outer.len() => Ok(serde_json::from_str(outer)?),
            Err(e) => Err(e.into()),
        },
        None => Ok(serde_json::from_str(outer)?),
    }
}

/// First `{...}` span whose braces balance, ignoring braces inside string
/// literals.
pub fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Span from the first `{` to the last `}`.
pub fn outer_brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Null => None,
                Value::String(s) => Some(s),
                other => Some(other.to_string()),
            })
            .collect(),
        Value::String(s) if s.trim().is_empty() => Vec::new(),
        Value::String(s) => vec![s],
        other => vec![other.to_string()],
    })
}
