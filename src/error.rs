//! Error types for strikenet.

/// Result type alias for strikenet operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for strikenet.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// Failed to read species table file.
    #[error("failed to read species table '{path}'")]
    SpeciesTableRead {
        /// Path to the species table.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse species table file.
    #[error("failed to parse species table '{path}'")]
    SpeciesTableParse {
        /// Path to the species table.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Species table content is inconsistent.
    #[error("invalid species table '{path}': {message}")]
    SpeciesTableInvalid {
        /// Path to the species table.
        path: std::path::PathBuf,
        /// Description of the inconsistency.
        message: String,
    },

    /// Failed to read an image upload.
    #[error("failed to read image '{path}'")]
    ImageRead {
        /// Path to the image file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Upload is not an image.
    #[error("unsupported media type for '{path}': only image uploads are supported")]
    UnsupportedMediaType {
        /// Path to the rejected file.
        path: std::path::PathBuf,
    },

    /// Upload is empty.
    #[error("uploaded file is empty: {path}")]
    EmptyUpload {
        /// Path to the empty file.
        path: std::path::PathBuf,
    },

    /// No image inputs were found.
    #[error("no valid image files found in the provided paths")]
    NoValidImages,

    /// Upstream provider is throttling requests.
    #[error("upstream model is throttling requests (HTTP 429)")]
    RateLimited,

    /// Upstream provider answered with an error status.
    #[error("model request failed with status {status}: {body}")]
    UpstreamHttp {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// Request to the upstream provider could not be completed.
    #[error("failed to reach upstream model at '{url}'")]
    Transport {
        /// Endpoint that failed.
        url: String,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Upstream answered with a body that cannot be handed to the normalizer.
    #[error("malformed upstream response body: {reason}")]
    MalformedUpstreamBody {
        /// Description of the problem.
        reason: String,
    },

    /// Upstream payload could not be decoded as structured data.
    #[error("failed to decode inference response: {reason}")]
    Decode {
        /// Description of the decode failure.
        reason: String,
    },

    /// Failed to read a saved upstream response.
    #[error("failed to read response file '{path}'")]
    ResponseRead {
        /// Path to the response file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Whether the failure comes from the upstream being unavailable.
    ///
    /// Callers may retry these; strikenet itself never does.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::UpstreamHttp { .. } | Self::Transport { .. }
        )
    }

    /// Stable `snake_case` identifier used in JSON error envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "io_error",
            Self::ConfigDirNotFound => "config_dir_not_found",
            Self::ConfigRead { .. } => "config_read_failed",
            Self::ConfigParse { .. } => "config_parse_failed",
            Self::ConfigValidation { .. } => "config_invalid",
            Self::ConfigWrite { .. } => "config_write_failed",
            Self::ConfigSerialize { .. } => "config_serialize_failed",
            Self::SpeciesTableRead { .. } => "species_table_read_failed",
            Self::SpeciesTableParse { .. } => "species_table_parse_failed",
            Self::SpeciesTableInvalid { .. } => "species_table_invalid",
            Self::ImageRead { .. } => "image_read_failed",
            Self::UnsupportedMediaType { .. } => "unsupported_media_type",
            Self::EmptyUpload { .. } => "empty_upload",
            Self::NoValidImages => "no_valid_images",
            Self::RateLimited => "upstream_rate_limited",
            Self::UpstreamHttp { .. } => "upstream_http_error",
            Self::Transport { .. } => "upstream_transport_error",
            Self::MalformedUpstreamBody { .. } => "malformed_upstream_body",
            Self::Decode { .. } => "decode_error",
            Self::ResponseRead { .. } => "response_read_failed",
        }
    }
}
