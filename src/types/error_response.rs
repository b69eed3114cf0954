//! Error response returned by the token endpoint

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{OAuth2Error, ProtocolError, Result};

/// Error codes defined by RFC 6749 section 5.2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// `access_denied`
    AccessDenied,
    /// `invalid_client`
    InvalidClient,
    /// `invalid_grant`
    InvalidGrant,
    /// `invalid_request`
    InvalidRequest,
    /// `invalid_scope`
    InvalidScope,
    /// `server_error`
    ServerError,
    /// `temporarily_unavailable`
    TemporarilyUnavailable,
    /// `unauthorized_client`
    UnauthorizedClient,
    /// `unsupported_grant_type`
    UnsupportedGrantType,
    /// `unsupported_response_type`
    UnsupportedResponseType,
}

impl ErrorCode {
    /// All known codes
    pub const ALL: [ErrorCode; 10] = [
        Self::AccessDenied,
        Self::InvalidClient,
        Self::InvalidGrant,
        Self::InvalidRequest,
        Self::InvalidScope,
        Self::ServerError,
        Self::TemporarilyUnavailable,
        Self::UnauthorizedClient,
        Self::UnsupportedGrantType,
        Self::UnsupportedResponseType,
    ];

    /// Look up a code by its wire representation (already lower-cased)
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == code)
    }

    /// Wire representation of the code
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AccessDenied => "access_denied",
            Self::InvalidClient => "invalid_client",
            Self::InvalidGrant => "invalid_grant",
            Self::InvalidRequest => "invalid_request",
            Self::InvalidScope => "invalid_scope",
            Self::ServerError => "server_error",
            Self::TemporarilyUnavailable => "temporarily_unavailable",
            Self::UnauthorizedClient => "unauthorized_client",
            Self::UnsupportedGrantType => "unsupported_grant_type",
            Self::UnsupportedResponseType => "unsupported_response_type",
        }
    }

    /// Build the typed error for this code
    #[must_use]
    pub fn into_protocol_error(self, description: String) -> ProtocolError {
        match self {
            Self::AccessDenied => ProtocolError::AccessDenied(description),
            Self::InvalidClient => ProtocolError::InvalidClient(description),
            Self::InvalidGrant => ProtocolError::InvalidGrant(description),
            Self::InvalidRequest => ProtocolError::InvalidRequest(description),
            Self::InvalidScope => ProtocolError::InvalidScope(description),
            Self::ServerError => ProtocolError::ServerError(description),
            Self::TemporarilyUnavailable => ProtocolError::TemporarilyUnavailable(description),
            Self::UnauthorizedClient => ProtocolError::UnauthorizedClient(description),
            Self::UnsupportedGrantType => ProtocolError::UnsupportedGrantType(description),
            Self::UnsupportedResponseType => ProtocolError::UnsupportedResponseType(description),
        }
    }
}

fn lowercase<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|s| s.to_lowercase())
}

/// Error response body (RFC 6749 section 5.2)
///
/// `error` is normalized to lower case. Unrecognized codes are kept as-is;
/// [`ErrorResponse::code`] returns `None` for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(deserialize_with = "lowercase")]
    error: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_uri: Option<String>,
}

impl ErrorResponse {
    /// Create an error response
    pub fn new(
        error: impl Into<String>,
        error_description: Option<String>,
        error_uri: Option<String>,
    ) -> Self {
        Self {
            error: error.into().to_lowercase(),
            error_description,
            error_uri,
        }
    }

    /// Parse an error response from a decoded JSON body
    ///
    /// # Errors
    /// Returns `MissingParameter` if `error` is absent or null, and `Json` if
    /// a field has the wrong type.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        if value.get("error").is_none_or(serde_json::Value::is_null) {
            return Err(OAuth2Error::missing_parameter("Parameter error is missing"));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// The lower-cased error code
    #[must_use]
    pub fn error(&self) -> &str {
        &self.error
    }

    /// The human-readable description, if sent
    #[must_use]
    pub fn error_description(&self) -> Option<&str> {
        self.error_description.as_deref()
    }

    /// The URI of a page describing the error, if sent
    #[must_use]
    pub fn error_uri(&self) -> Option<&str> {
        self.error_uri.as_deref()
    }

    /// The RFC 6749 code, or `None` if the server sent something else
    #[must_use]
    pub fn code(&self) -> Option<ErrorCode> {
        ErrorCode::parse(&self.error)
    }
}

impl From<ErrorResponse> for OAuth2Error {
    fn from(response: ErrorResponse) -> Self {
        let description = response.error_description.unwrap_or_default();
        match ErrorCode::parse(&response.error) {
            Some(code) => OAuth2Error::Protocol(code.into_protocol_error(description)),
            None => OAuth2Error::unknown_error_type(Some(response.error), description),
        }
    }
}
