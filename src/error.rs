//! Error types for OAuth 2.0 token requests

use thiserror::Error;

use crate::transport::TransportError;

/// Error kinds defined by RFC 6749 section 5.2
///
/// Each variant carries the `error_description` sent by the authorization
/// server, or an empty string when the server did not send one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// `access_denied`
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// `invalid_client`
    #[error("Invalid client: {0}")]
    InvalidClient(String),

    /// `invalid_grant`
    #[error("Invalid grant: {0}")]
    InvalidGrant(String),

    /// `invalid_request`
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// `invalid_scope`
    #[error("Invalid scope: {0}")]
    InvalidScope(String),

    /// `server_error`
    #[error("Server error: {0}")]
    ServerError(String),

    /// `temporarily_unavailable`
    #[error("Temporarily unavailable: {0}")]
    TemporarilyUnavailable(String),

    /// `unauthorized_client`
    #[error("Unauthorized client: {0}")]
    UnauthorizedClient(String),

    /// `unsupported_grant_type`
    #[error("Unsupported grant type: {0}")]
    UnsupportedGrantType(String),

    /// `unsupported_response_type`
    #[error("Unsupported response type: {0}")]
    UnsupportedResponseType(String),
}

impl ProtocolError {
    /// The error code as it appears on the wire
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::AccessDenied(_) => "access_denied",
            Self::InvalidClient(_) => "invalid_client",
            Self::InvalidGrant(_) => "invalid_grant",
            Self::InvalidRequest(_) => "invalid_request",
            Self::InvalidScope(_) => "invalid_scope",
            Self::ServerError(_) => "server_error",
            Self::TemporarilyUnavailable(_) => "temporarily_unavailable",
            Self::UnauthorizedClient(_) => "unauthorized_client",
            Self::UnsupportedGrantType(_) => "unsupported_grant_type",
            Self::UnsupportedResponseType(_) => "unsupported_response_type",
        }
    }

    /// The description sent by the authorization server
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::AccessDenied(msg)
            | Self::InvalidClient(msg)
            | Self::InvalidGrant(msg)
            | Self::InvalidRequest(msg)
            | Self::InvalidScope(msg)
            | Self::ServerError(msg)
            | Self::TemporarilyUnavailable(msg)
            | Self::UnauthorizedClient(msg)
            | Self::UnsupportedGrantType(msg)
            | Self::UnsupportedResponseType(msg) => msg,
        }
    }
}

/// Main error type for token acquisition
#[derive(Debug, Error)]
pub enum OAuth2Error {
    /// A required grant field was empty
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A required parameter was absent from a parameter mapping or response body
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    /// The grant type is unknown, or the flow does not accept the given grant
    #[error("Unsupported grant type: {0}")]
    UnsupportedGrantType(String),

    /// The token endpoint answered with an RFC 6749 error code
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The token endpoint answered with an error that could not be classified
    #[error("Invalid error type {}: {description}", .error.as_deref().unwrap_or("<none>"))]
    UnknownErrorType {
        /// Error code sent by the server, if any
        error: Option<String>,
        /// Description sent by the server, or a summary of the raw response
        description: String,
    },

    /// A refresh was requested for a token without a refresh token
    #[error("No refresh token was set")]
    NoRefreshToken,

    /// The token type has no known authorization header scheme
    #[error("Unsupported token type: {0}")]
    UnsupportedTokenType(String),

    /// An endpoint URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A successful token response was not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The HTTP transport failed
    #[error("Transport error: {0}")]
    Transport(#[source] TransportError),
}

/// Result type alias for token operations
pub type Result<T> = std::result::Result<T, OAuth2Error>;

impl OAuth2Error {
    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a missing parameter error
    pub fn missing_parameter(msg: impl Into<String>) -> Self {
        Self::MissingParameter(msg.into())
    }

    /// Create an unsupported grant type error
    pub fn unsupported_grant_type(msg: impl Into<String>) -> Self {
        Self::UnsupportedGrantType(msg.into())
    }

    /// Create an unknown error type error
    pub fn unknown_error_type(error: Option<String>, description: impl Into<String>) -> Self {
        Self::UnknownErrorType {
            error,
            description: description.into(),
        }
    }

    /// Create a transport error from any error value
    pub fn transport(err: impl Into<TransportError>) -> Self {
        Self::Transport(err.into())
    }

    /// The error code returned by the token endpoint, if this error came from one
    #[must_use]
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Protocol(err) => Some(err.code()),
            Self::UnknownErrorType { error, .. } => error.as_deref(),
            _ => None,
        }
    }

    /// Whether the token endpoint rejected the request, recognized code or not
    #[must_use]
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, Self::Protocol(_) | Self::UnknownErrorType { .. })
    }
}
