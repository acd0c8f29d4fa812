use thiserror::Error;

/// Errors raised by the GreenTick API client.
///
/// Callers display the message and do not branch on the variant, except to
/// react to [`ApiError::SessionExpired`].
#[derive(Error, Debug)]
pub enum ApiError {
    /// Network failure before any HTTP status was received
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response; `message` comes from the body's `detail` field
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The backend rejected the bearer token (HTTP 401)
    #[error("Session expired. Please login again.")]
    SessionExpired,

    /// Response body did not have the expected shape
    #[error("Unexpected response from {path}: {reason}")]
    Decode { path: String, reason: String },

    /// Request body could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configured base URL or request path is not a valid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Input rejected before any request was sent
    #[error("{0}")]
    Validation(String),

    /// Session could not be persisted
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors raised by [`crate::storage::KeyValueStore`] backends
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to get system data directory")]
    NoDataDir,

    #[error("Failed to access {}: {}", .0.display(), .1)]
    Io(std::path::PathBuf, std::io::Error),

    #[error("Failed to parse {}: {}", .0.display(), .1)]
    Parse(std::path::PathBuf, toml::de::Error),

    #[error("Failed to serialize storage: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("{0}")]
    Backend(String),
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
