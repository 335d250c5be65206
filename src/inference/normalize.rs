//! Upstream response normalization.
//!
//! Providers disagree on reply shape. Every reply is first classified into
//! one of a closed set of [`UpstreamPayload`] variants, then reduced by the
//! matching function into an ordered list of [`RawPrediction`]s.
//!
//! Extraction is best-effort by policy:
//! - label is read from the first usable field in [`fields::LABEL`]
//! - score is read from the first usable field in [`fields::SCORE`]
//! - entries missing either value, and entries that are not objects, are
//!   dropped (logged at debug level)
//! - a reply that parses but matches no known shape yields an empty list
//!   (logged at warn level) rather than an error
//!
//! Only text that cannot be decoded at all is an error ([`Error::Decode`]).

use crate::constants::fields;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// One `(label, score)` pair as reported by the upstream.
///
/// The score keeps the upstream's range; it is not clamped to `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPrediction {
    /// Label as reported by the model.
    pub label: String,
    /// Score as reported by the model.
    pub score: f32,
}

impl RawPrediction {
    /// Create a prediction.
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Reply handed over by an inference gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    /// Body already parsed as JSON.
    Json(Value),
    /// Body that is not JSON on its own and may embed a JSON block.
    Text(String),
}

/// Recognized upstream reply shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpstreamPayload<'a> {
    /// Top-level list of prediction objects.
    Sequence(&'a [Value]),
    /// A single prediction object.
    SingleObject(&'a Map<String, Value>),
    /// An object carrying the prediction list under a wrapper field.
    Wrapped {
        /// Wrapper field the list was found under.
        field: &'static str,
        /// Wrapped entries.
        entries: &'a [Value],
    },
    /// Free text that embeds an encoded JSON block.
    EncodedText(&'a str),
    /// Parsed data of no tolerated shape.
    Unrecognized(&'a Value),
}

impl<'a> UpstreamPayload<'a> {
    /// Classify a parsed reply by its shape.
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Array(entries) => Self::Sequence(entries),
            Value::String(text) => Self::EncodedText(text),
            Value::Object(map) => classify_object(value, map),
            _ => Self::Unrecognized(value),
        }
    }

    /// Short name of the shape, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Sequence(_) => "sequence",
            Self::SingleObject(_) => "single-object",
            Self::Wrapped { .. } => "wrapped",
            Self::EncodedText(_) => "encoded-text",
            Self::Unrecognized(_) => "unrecognized",
        }
    }
}

fn classify_object<'a>(value: &'a Value, map: &'a Map<String, Value>) -> UpstreamPayload<'a> {
    if fields::LABEL.iter().any(|name| map.contains_key(*name)) {
        return UpstreamPayload::SingleObject(map);
    }

    if let Some(text) = chat_completion_content(value) {
        return UpstreamPayload::EncodedText(text);
    }

    // First non-empty list wins; an empty list only counts if nothing better exists.
    let mut empty_wrapper = None;
    for &field in fields::WRAPPERS {
        if let Some(Value::Array(entries)) = map.get(field) {
            if !entries.is_empty() {
                return UpstreamPayload::Wrapped { field, entries };
            }
            if empty_wrapper.is_none() {
                empty_wrapper = Some(UpstreamPayload::Wrapped { field, entries });
            }
        }
    }

    empty_wrapper.unwrap_or(UpstreamPayload::Unrecognized(value))
}

/// Text content of an OpenAI-style chat completion envelope.
fn chat_completion_content(value: &Value) -> Option<&str> {
    value
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
}

/// Normalize a gateway reply.
pub fn normalize_payload(payload: &RawPayload) -> Result<Vec<RawPrediction>> {
    match payload {
        RawPayload::Json(value) => normalize(value),
        RawPayload::Text(text) => normalize_text(text),
    }
}

/// Normalize a parsed reply.
///
/// An encoded-text reply is decoded once; text nested inside the decoded
/// block is not followed further.
pub fn normalize(value: &Value) -> Result<Vec<RawPrediction>> {
    match UpstreamPayload::classify(value) {
        UpstreamPayload::EncodedText(text) => normalize_text(text),
        shape => Ok(normalize_shape(shape)),
    }
}

/// Normalize free text that embeds a JSON block.
pub fn normalize_text(text: &str) -> Result<Vec<RawPrediction>> {
    let decoded = decode_embedded_json(text)?;
    match UpstreamPayload::classify(&decoded) {
        UpstreamPayload::EncodedText(_) => {
            warn!("Decoded response block is itself text; treating as no predictions");
            Ok(Vec::new())
        }
        shape => Ok(normalize_shape(shape)),
    }
}

fn normalize_shape(shape: UpstreamPayload<'_>) -> Vec<RawPrediction> {
    debug!("Upstream response shape: {}", shape.kind());
    match shape {
        UpstreamPayload::Sequence(entries) => normalize_entries(entries),
        UpstreamPayload::Wrapped { field, entries } => {
            debug!("Predictions wrapped under '{field}'");
            normalize_entries(entries)
        }
        UpstreamPayload::SingleObject(map) => extract_entry(map).into_iter().collect(),
        UpstreamPayload::Unrecognized(value) => {
            warn!(
                "Unrecognized upstream response shape ({}); treating as no predictions",
                json_type_name(value)
            );
            Vec::new()
        }
        UpstreamPayload::EncodedText(_) => Vec::new(),
    }
}

fn normalize_entries(entries: &[Value]) -> Vec<RawPrediction> {
    let predictions: Vec<RawPrediction> = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match entry {
            Value::Object(map) => extract_entry(map),
            other => {
                debug!(
                    "Skipping prediction entry {index}: expected object, got {}",
                    json_type_name(other)
                );
                None
            }
        })
        .collect();

    if predictions.len() != entries.len() {
        debug!(
            "Kept {} of {} prediction entries",
            predictions.len(),
            entries.len()
        );
    }
    predictions
}

/// Read one prediction entry; `None` when the label or score is missing.
fn extract_entry(map: &Map<String, Value>) -> Option<RawPrediction> {
    let label = fields::LABEL
        .iter()
        .find_map(|name| map.get(*name).and_then(label_value));
    let score = fields::SCORE
        .iter()
        .find_map(|name| map.get(*name).and_then(score_value));

    match (label, score) {
        (Some(label), Some(score)) => Some(RawPrediction { label, score }),
        (label, score) => {
            debug!(
                "Dropping prediction entry: label present={}, score present={}",
                label.is_some(),
                score.is_some()
            );
            None
        }
    }
}

fn label_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn score_value(value: &Value) -> Option<f32> {
    let score = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    let score = score as f32;
    score.is_finite().then_some(score)
}

/// Extract and decode the JSON block embedded in free text.
///
/// A fenced code block is preferred; otherwise the first opening bracket
/// that starts a complete JSON value is used.
pub fn decode_embedded_json(text: &str) -> Result<Value> {
    if let Some(block) = fenced_block(text) {
        return serde_json::from_str(block).map_err(|e| Error::Decode {
            reason: e.to_string(),
        });
    }
    first_embedded_value(text)
}

/// Decode the first JSON value starting at any `{` or `[` in `text`.
fn first_embedded_value(text: &str) -> Result<Value> {
    let mut first_error = None;
    for (start, _) in text.match_indices(['{', '[']) {
        match serde_json::Deserializer::from_str(&text[start..])
            .into_iter::<Value>()
            .next()
        {
            Some(Ok(value)) => return Ok(value),
            Some(Err(e)) if first_error.is_none() => first_error = Some(e),
            Some(Err(_)) | None => {}
        }
    }

    Err(Error::Decode {
        reason: first_error.map_or_else(
            || "no JSON block found in text response".to_string(),
            |e| e.to_string(),
        ),
    })
}

fn fenced_block(text: &str) -> Option<&str> {
    const FENCE: &str = "```";

    let open = text.find(FENCE)? + FENCE.len();
    let rest = &text[open..];
    // Skip an info string such as `json` on the opening fence line.
    let body_start = match rest.find('\n') {
        Some(newline) if !rest[..newline].trim_start().starts_with(['{', '[']) => newline + 1,
        Some(_) => 0,
        None => rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()).len(),
    };
    let body = &rest[body_start..];
    let close = body.find(FENCE)?;
    let block = body[..close].trim();
    (!block.is_empty()).then_some(block)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
