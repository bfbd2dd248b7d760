use thiserror::Error;

use zpass_client::ClientError;

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;

/// Error type for all SDK operations.
///
/// One variant per failure kind: configuration, missing key material,
/// not-found, violated call preconditions, and failures delegated from the
/// network client or the cryptographic engine.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("{0} is not available")]
    ResourceUnavailable(&'static str),

    #[error("{0}")]
    NotFound(String),

    #[error("precondition violated: {0}")]
    Precondition(String),

    #[error("network client error: {0}")]
    Client(#[from] ClientError),

    #[error("{context}: {source}")]
    Engine {
        context: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl SdkError {
    /// Adapter wrapping an engine failure with call-site context.
    pub(crate) fn engine(context: &'static str) -> impl FnOnce(anyhow::Error) -> SdkError {
        move |source| SdkError::Engine { context, source }
    }
}
