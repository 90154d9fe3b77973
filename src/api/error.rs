use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    #[error("Session expired - please log in again")]
    SessionExpired,

    #[error("No network connection")]
    Offline,

    #[error("Request timed out")]
    Timeout,

    #[error("Could not connect to server")]
    ConnectionFailed,

    #[error("Network error: {0}")]
    Transport(String),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Structured error body the backend sends for non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ApiError {
    /// Truncate a response body to avoid carrying excessive data.
    /// The cut is backed up to a char boundary so multi-byte bodies
    /// (localized error pages) never split a character.
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..end],
            body.len()
        )
    }

    /// Build an error from a non-2xx response, decoding the backend's
    /// `{"message": ...}` body when present.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        if status.as_u16() == 401 {
            return ApiError::Unauthorized;
        }
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Request failed ({}): {}", status, Self::truncate_body(body)));
        ApiError::Api {
            status: status.as_u16(),
            message,
        }
    }

    /// Normalize a transport-level failure into one of the connectivity
    /// kinds. Callers never see reqwest error types.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::ConnectionFailed
        } else {
            ApiError::Transport(err.to_string())
        }
    }

    /// True for failures caused by connectivity rather than the backend.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ApiError::Offline | ApiError::Timeout | ApiError::ConnectionFailed | ApiError::Transport(_)
        )
    }

    /// Human-readable message for the presentation layer.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized => "Your session is no longer valid. Please log in again.".into(),
            ApiError::SessionExpired => "Your session has expired. Please log in again.".into(),
            ApiError::Offline => "No network connection. Check your connection and try again.".into(),
            ApiError::Timeout => "The server took too long to respond. Try again.".into(),
            ApiError::ConnectionFailed => {
                "Could not reach the server. Check your connection and try again.".into()
            }
            ApiError::Transport(_) => "Something went wrong talking to the server. Try again.".into(),
            ApiError::Api { message, .. } => message.clone(),
            ApiError::InvalidResponse(_) => "The server sent an unexpected response.".into(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::from_transport(err)
    }
}
