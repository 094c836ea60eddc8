use crate::config::ClientOptionsError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("An error occurred while invoking {url} that resulted in status code {status}")]
    Status { url: String, status: u16 },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to serialize request body: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Options(#[from] ClientOptionsError),

    #[error("failed to build TLS connector: {0}")]
    Tls(#[from] native_tls::Error),

    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("environment hook failed: {0}")]
    Environment(String),
}

impl ClientError {
    /// Status code of a non-success response, if that is what failed.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
