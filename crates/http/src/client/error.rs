//! Client error types

use tessera_core::ValidationErrors;
use thiserror::Error;

/// Broad failure categories, used to pick a user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input failed local checks; no request was sent
    Validation,
    /// The identity service rejected the request
    Auth,
    /// Transport, decoding or configuration trouble
    Network,
    /// The session could not be renewed and was dropped
    SessionExpired,
}

fn describe(message: &Option<String>) -> &str {
    message.as_deref().unwrap_or("no details")
}

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("Server error {status}: {}", describe(.message))]
    ServerError { status: u16, message: Option<String> },

    /// Authentication failed
    #[error("Authentication failed: {}", describe(.0))]
    AuthenticationFailed(Option<String>),

    /// Resource not found
    #[error("Resource not found: {}", describe(.0))]
    NotFound(Option<String>),

    /// Bad request
    #[error("Bad request: {}", describe(.0))]
    BadRequest(Option<String>),

    /// Forbidden
    #[error("Forbidden: {}", describe(.0))]
    Forbidden(Option<String>),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Input rejected before sending
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// No refresh token is stored
    #[error("No refresh token available")]
    MissingRefreshToken,

    /// Refreshing after a 401 failed; tokens have been cleared
    #[error("Session expired: {}", describe(.0))]
    SessionExpired(Option<String>),
}

impl ClientError {
    /// Create error from HTTP status code and the server's `message`, if any
    pub fn from_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 => Self::AuthenticationFailed(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Whether this is a rejected or expired credential
    pub fn is_auth_expired(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed(_) | Self::SessionExpired(_)
        )
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::ServerError { .. }
            | Self::AuthenticationFailed(_)
            | Self::NotFound(_)
            | Self::BadRequest(_)
            | Self::Forbidden(_)
            | Self::MissingRefreshToken => ErrorKind::Auth,
            Self::SessionExpired(_) => ErrorKind::SessionExpired,
            Self::Request(_) | Self::Serialization(_) | Self::Configuration(_) => {
                ErrorKind::Network
            }
        }
    }

    /// Message suitable for showing to a user.
    ///
    /// Server-provided messages and local validation messages are surfaced
    /// verbatim; everything else collapses to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::ServerError { message, .. }
            | Self::AuthenticationFailed(message)
            | Self::NotFound(message)
            | Self::BadRequest(message)
            | Self::Forbidden(message)
            | Self::SessionExpired(message) => message
                .as_deref()
                .filter(|m| !m.is_empty())
                .unwrap_or(fallback)
                .to_string(),
            Self::Validation(errors) => errors.to_string(),
            Self::MissingRefreshToken => self.to_string(),
            Self::Request(_) | Self::Serialization(_) | Self::Configuration(_) => {
                fallback.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status() {
        let err = ClientError::from_status(StatusCode::UNAUTHORIZED, Some("bad token".into()));
        assert!(err.is_auth_expired());
        assert_eq!(err.kind(), ErrorKind::Auth);
        assert_eq!(err.to_string(), "Authentication failed: bad token");

        let err = ClientError::from_status(StatusCode::INTERNAL_SERVER_ERROR, None);
        assert!(matches!(err, ClientError::ServerError { status: 500, .. }));
        assert!(!err.is_auth_expired());
    }

    #[test]
    fn test_user_message_prefers_server_message() {
        let err = ClientError::from_status(StatusCode::BAD_REQUEST, Some("Cedula taken".into()));
        assert_eq!(err.user_message("Registration failed"), "Cedula taken");

        let err = ClientError::from_status(StatusCode::BAD_REQUEST, Some(String::new()));
        assert_eq!(err.user_message("Registration failed"), "Registration failed");

        let err = ClientError::Configuration("bad".into());
        assert_eq!(err.kind(), ErrorKind::Network);
        assert_eq!(err.user_message("Login failed"), "Login failed");
    }

    #[test]
    fn test_missing_refresh_token_message() {
        let err = ClientError::MissingRefreshToken;
        assert_eq!(err.user_message("Token refresh failed"), "No refresh token available");
    }
}
