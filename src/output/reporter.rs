//! Structured result and error reporting for CLI output.

use crate::error::Error;
use crate::output::json_envelope::{ErrorPayload, ErrorSeverity, EventType, JsonEnvelope};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Writes one JSON envelope per line.
pub struct JsonReporter {
    /// Writer for output (typically stdout).
    writer: Mutex<Box<dyn Write + Send>>,
    /// Set once a write has failed, to log only the first failure.
    write_failed: AtomicBool,
}

impl JsonReporter {
    /// Create a reporter writing to stdout.
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Create a reporter with a custom writer.
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            write_failed: AtomicBool::new(false),
        }
    }

    /// Emit a `result` event.
    pub fn result<T: Serialize>(&self, payload: &T) {
        self.emit(EventType::Result, payload);
    }

    /// Emit an `error` event describing `err`.
    pub fn error(&self, err: &Error, severity: ErrorSeverity, file: Option<&Path>) {
        self.emit(EventType::Error, &error_payload(err, severity, file));
    }

    fn emit<T: Serialize>(&self, event: EventType, payload: &T) {
        let envelope = JsonEnvelope::new(event, payload);
        let json = match serde_json::to_string(&envelope) {
            Ok(json) => json,
            Err(e) => {
                // stderr keeps the JSON stream on stdout intact
                eprintln!("error: failed to serialize JSON output: {e}");
                return;
            }
        };

        if let Ok(mut writer) = self.writer.lock() {
            if let Err(e) = writeln!(writer, "{json}")
                && !self.write_failed.swap(true, Ordering::Relaxed)
            {
                eprintln!(
                    "strikenet: warning: failed to write to stdout: {e} (subsequent errors suppressed)"
                );
            }
            let _ = writer.flush();
        }
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the error payload for an error.
pub fn error_payload(err: &Error, severity: ErrorSeverity, file: Option<&Path>) -> ErrorPayload {
    ErrorPayload {
        code: err.code().to_string(),
        severity,
        message: error_chain(err),
        file: file.map(Path::to_path_buf),
        retryable: err.is_retryable(),
        suggestion: suggestion_for(err).map(ToString::to_string),
    }
}

/// Emit a JSON result event to stdout.
pub fn emit_json_result<T: Serialize>(payload: &T) {
    JsonReporter::new().result(payload);
}

/// Emit a fatal JSON error event to stdout.
pub fn emit_json_error(err: &Error) {
    JsonReporter::new().error(err, ErrorSeverity::Fatal, None);
}

/// Render an error and its sources as one line.
pub fn error_chain(err: &Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn suggestion_for(err: &Error) -> Option<&'static str> {
    match err {
        Error::RateLimited => Some("wait a moment and retry, or use a dedicated endpoint"),
        Error::UpstreamHttp { status: 401 | 403, .. } => {
            Some("check the API token (--api-token or STRIKENET_API_TOKEN)")
        }
        Error::Transport { .. } => Some("check the endpoint URL and network connectivity"),
        Error::UnsupportedMediaType { .. } => {
            Some("upload an image file such as .jpg, .png or .webp")
        }
        Error::ConfigParse { .. } | Error::ConfigValidation { .. } => {
            Some("run 'strikenet config show' to inspect the effective configuration")
        }
        Error::Decode { .. } | Error::MalformedUpstreamBody { .. } => {
            Some("run with -v to log the upstream reply shape")
        }
        _ => None,
    }
}
