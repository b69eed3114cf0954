//! Access token returned by the token endpoint

use serde::{Deserialize, Serialize};

use crate::error::{OAuth2Error, Result};

/// Successful token endpoint response (RFC 6749 section 5.1)
///
/// `access_token` and `token_type` are always present. Unknown response
/// fields are ignored when parsing. `scope` is kept exactly as the server
/// sent it; servers disagree on space vs. comma delimiters, so it is never
/// split or re-joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    access_token: String,

    token_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_in: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    scope: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    id_token: Option<String>,
}

impl AccessToken {
    /// Create a token with only the required fields
    pub fn new(access_token: impl Into<String>, token_type: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: token_type.into(),
            expires_in: None,
            refresh_token: None,
            scope: None,
            state: None,
            id_token: None,
        }
    }

    /// Set the lifetime in seconds
    #[must_use]
    pub fn with_expires_in(mut self, expires_in: u64) -> Self {
        self.expires_in = Some(expires_in);
        self
    }

    /// Set the refresh token
    #[must_use]
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Set the granted scope
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Set the state echoed by the server
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Set the OpenID Connect ID token
    #[must_use]
    pub fn with_id_token(mut self, id_token: impl Into<String>) -> Self {
        self.id_token = Some(id_token.into());
        self
    }

    /// Parse a token from a decoded JSON response body
    ///
    /// # Errors
    /// Returns `MissingParameter` if `access_token` or `token_type` is absent
    /// or null, and `Json` if a field has the wrong type.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        for key in ["access_token", "token_type"] {
            if value.get(key).is_none_or(serde_json::Value::is_null) {
                return Err(OAuth2Error::missing_parameter(format!(
                    "Provided token response does not contain a \"{key}\" key"
                )));
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Parse a token from a raw JSON response body
    ///
    /// # Errors
    /// Returns `Json` if the body is not valid JSON, otherwise see [`Self::from_value`].
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        Self::from_value(serde_json::from_slice(body)?)
    }

    /// The access token
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// The token type, as sent by the server
    #[must_use]
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Lifetime in seconds, if sent
    #[must_use]
    pub fn expires_in(&self) -> Option<u64> {
        self.expires_in
    }

    /// The refresh token, if issued
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// The granted scope, if sent
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// The state echoed by the server, if sent
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// The OpenID Connect ID token, if sent
    #[must_use]
    pub fn id_token(&self) -> Option<&str> {
        self.id_token.as_deref()
    }

    /// Whether a non-empty refresh token was issued
    #[must_use]
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Get the `Authorization` header value for calling protected resources
    ///
    /// # Errors
    /// Returns `UnsupportedTokenType` unless the token type is `bearer`
    /// (case-insensitive, RFC 6750).
    pub fn authorization_header(&self) -> Result<String> {
        if self.token_type.eq_ignore_ascii_case("bearer") {
            Ok(format!("Bearer {}", self.access_token))
        } else {
            Err(OAuth2Error::UnsupportedTokenType(self.token_type.clone()))
        }
    }
}
