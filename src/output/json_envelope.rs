//! JSON envelope types for CLI output.
//!
//! Every structured line written to stdout is a [`JsonEnvelope`] so that
//! strikenet can sit behind a web frontend or a batch job.

use crate::config::Config;
use crate::inference::ClassificationResult;
use crate::registry::SpeciesMetadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Current envelope format version.
pub const SPEC_VERSION: &str = "1.0";

/// JSON envelope wrapping all CLI output events.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub struct JsonEnvelope<T> {
    /// API specification version.
    pub spec_version: String,
    /// Event timestamp.
    pub timestamp: DateTime<Utc>,
    /// Event type.
    pub event: EventType,
    /// Event-specific payload.
    pub payload: T,
}

impl<T: Serialize> JsonEnvelope<T> {
    /// Create a new envelope with the current timestamp.
    pub fn new(event: EventType, payload: T) -> Self {
        Self {
            spec_version: SPEC_VERSION.to_string(),
            timestamp: Utc::now(),
            event,
            payload,
        }
    }
}

/// Event types for JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Command result.
    Result,
    /// Error occurred.
    Error,
}

/// Result type discriminator for result payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultType {
    /// Classification of one image or saved reply.
    Classification,
    /// Species table listing.
    SpeciesList,
    /// Single species lookup.
    SpeciesLookup,
    /// Configuration display.
    Config,
}

/// Error severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSeverity {
    /// Fatal error - the command cannot continue.
    Fatal,
    /// Warning - one input failed, the rest continue.
    Warning,
}

/// Error payload for error events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Error code (`snake_case` identifier).
    pub code: String,
    /// Error severity.
    pub severity: ErrorSeverity,
    /// Human-readable error message.
    pub message: String,
    /// Input the error relates to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Whether retrying later may succeed.
    pub retryable: bool,
    /// Suggested action to resolve the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Payload for a classification result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Image or saved reply that was classified.
    pub file: PathBuf,
    /// MIME type of the image, when an image was sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// The classification itself.
    #[serde(flatten)]
    pub result: ClassificationResult,
}

/// Payload for species list result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesListPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Number of species.
    pub species_count: usize,
    /// Number of aliases.
    pub alias_count: usize,
    /// List of species.
    pub species: Vec<SpeciesEntry>,
}

/// A single species entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesEntry {
    /// Canonical lookup key.
    pub key: String,
    /// Species metadata.
    #[serde(flatten)]
    pub metadata: SpeciesMetadata,
    /// Aliases resolving to this species.
    pub aliases: Vec<String>,
}

/// Payload for species lookup result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesLookupPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Label as given.
    pub label: String,
    /// Label after trimming and lowercasing.
    pub normalized_label: String,
    /// Matching species, `null` when unknown.
    pub species: Option<SpeciesMetadata>,
}

/// Payload for config show result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Path to the config file.
    pub config_path: PathBuf,
    /// Effective configuration, secrets masked.
    pub config: Config,
}
