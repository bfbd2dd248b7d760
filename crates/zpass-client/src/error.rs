use thiserror::Error;

/// Result type for network client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Error types for explorer API access
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status {status} from {path}: {body}")]
    Status { status: u16, path: String, body: String },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0} not found")]
    NotFound(String),
}
