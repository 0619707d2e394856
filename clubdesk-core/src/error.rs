use thiserror::Error;

/// Errors that can occur while talking to the club backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Request {
        /// HTTP status code of the failed response.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },
    /// The session could not be renewed and has been cleared.
    #[error("Session expired")]
    SessionExpired,
    /// Login was rejected.
    #[error("{0}")]
    InvalidCredentials(String),
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Transport(String),
    /// The response body was not the expected JSON.
    #[error("Decode error: {0}")]
    Decode(String),
    /// Reading or writing the session store failed.
    #[error("Store error: {0}")]
    Store(String),
    /// The request was rejected before being sent.
    #[error("Validation error: {0}")]
    Validation(String),
    /// The client configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status of a [`ClientError::Request`], if that is what this is.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this error ended the session.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ClientError::SessionExpired)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}
