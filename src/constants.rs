//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "strikenet";

/// Default number of ranked predictions kept per image.
pub const DEFAULT_TOP_K: usize = 5;

/// Default confidence threshold for an automatic identification.
pub const DEFAULT_THRESHOLD: f32 = 0.6;

/// Confidence value bounds.
pub mod confidence {
    /// Minimum valid threshold value.
    pub const MIN: f32 = 0.0;
    /// Maximum valid threshold value.
    pub const MAX: f32 = 1.0;
    /// Decimal places for score formatting.
    pub const DECIMAL_PLACES: usize = 4;
}

/// Upstream provider defaults.
pub mod upstream {
    /// Default Hugging Face inference endpoint for image classification.
    pub const DEFAULT_HUGGINGFACE_ENDPOINT: &str =
        "https://api-inference.huggingface.co/models/google/vit-base-patch16-224";

    /// Default OpenAI chat completions endpoint.
    pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

    /// Default OpenAI model identifier used for vision classification.
    pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

    /// Default sampling temperature.
    pub const DEFAULT_TEMPERATURE: f32 = 0.0;

    /// Maximum accepted sampling temperature.
    pub const MAX_TEMPERATURE: f32 = 2.0;

    /// Default maximum number of output tokens requested from chat models.
    pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 600;

    /// Default request timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Connect timeout in seconds.
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;

    /// Maximum number of bytes of an error body kept in error messages.
    pub const MAX_ERROR_BODY_BYTES: usize = 512;
}

/// Field names probed when reading upstream prediction entries.
///
/// Names are tried in order; the first present value wins.
pub mod fields {
    /// Candidate field names holding the predicted label.
    pub const LABEL: &[&str] = &["label", "class"];

    /// Candidate field names holding the prediction score.
    pub const SCORE: &[&str] = &["score", "probability", "confidence"];

    /// Field names under which providers wrap a prediction list.
    pub const WRAPPERS: &[&str] = &["outputs", "data", "predictions"];
}

/// Image upload constants.
pub mod upload {
    /// File extensions accepted as images, with their MIME types.
    pub const IMAGE_TYPES: &[(&str, &str)] = &[
        ("jpg", "image/jpeg"),
        ("jpeg", "image/jpeg"),
        ("png", "image/png"),
        ("gif", "image/gif"),
        ("webp", "image/webp"),
        ("bmp", "image/bmp"),
        ("tif", "image/tiff"),
        ("tiff", "image/tiff"),
        ("heic", "image/heic"),
    ];
}
