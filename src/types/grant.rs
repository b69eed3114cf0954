//! Grant types and their token request parameters
//!
//! A grant is pure data: it knows its `grant_type` discriminator and how to
//! serialize itself into the ordered form fields of a token request. Empty
//! optional fields are treated as absent and never sent.

use std::fmt;

use crate::error::{OAuth2Error, Result};

/// Ordered form fields of a token request
pub type RequestFields = Vec<(&'static str, String)>;

/// The `grant_type` discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrantType {
    /// `authorization_code`
    AuthorizationCode,
    /// `client_credentials`
    ClientCredentials,
    /// `password`
    Password,
    /// `refresh_token`
    RefreshToken,
}

impl GrantType {
    /// Wire representation of the grant type
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AuthorizationCode => "authorization_code",
            Self::ClientCredentials => "client_credentials",
            Self::Password => "password",
            Self::RefreshToken => "refresh_token",
        }
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GrantType {
    type Err = OAuth2Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "authorization_code" => Ok(Self::AuthorizationCode),
            "client_credentials" => Ok(Self::ClientCredentials),
            "password" => Ok(Self::Password),
            "refresh_token" => Ok(Self::RefreshToken),
            other => Err(OAuth2Error::unsupported_grant_type(format!(
                "Provided an invalid grant type: {other}"
            ))),
        }
    }
}

/// Common contract of every grant variant
pub trait GrantParameters {
    /// The fixed discriminator of this grant
    const GRANT_TYPE: GrantType;

    /// Serialize into ordered token request fields, `grant_type` first
    fn to_request_fields(&self) -> RequestFields;
}

fn required(value: impl Into<String>, name: &str) -> Result<String> {
    let value = value.into();
    if value.is_empty() {
        return Err(OAuth2Error::invalid_argument(format!(
            "Parameter {name} must not be empty"
        )));
    }
    Ok(value)
}

fn optional(value: impl Into<String>) -> Option<String> {
    Some(value.into()).filter(|v| !v.is_empty())
}

fn push_optional(fields: &mut RequestFields, name: &'static str, value: Option<&String>) {
    if let Some(value) = value {
        fields.push((name, value.clone()));
    }
}

// ============================================================================
// Authorization Code
// ============================================================================

/// Authorization code grant (RFC 6749 section 4.1.3)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationCodeGrant {
    code: String,
    redirect_uri: Option<String>,
    client_id: Option<String>,
}

impl AuthorizationCodeGrant {
    /// Create a grant for the authorization code returned to the redirect URI
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `code` is empty.
    pub fn new(code: impl Into<String>) -> Result<Self> {
        Ok(Self {
            code: required(code, "code")?,
            redirect_uri: None,
            client_id: None,
        })
    }

    /// Set the redirect URI used in the authorization request
    #[must_use]
    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = optional(redirect_uri);
        self
    }

    /// Set the client identifier (public clients that do not authenticate)
    #[must_use]
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = optional(client_id);
        self
    }

    /// The authorization code
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The redirect URI, if set
    #[must_use]
    pub fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }

    /// The client identifier, if set
    #[must_use]
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }
}

impl GrantParameters for AuthorizationCodeGrant {
    const GRANT_TYPE: GrantType = GrantType::AuthorizationCode;

    fn to_request_fields(&self) -> RequestFields {
        let mut fields = vec![
            ("grant_type", Self::GRANT_TYPE.as_str().to_string()),
            ("code", self.code.clone()),
        ];
        push_optional(&mut fields, "redirect_uri", self.redirect_uri.as_ref());
        push_optional(&mut fields, "client_id", self.client_id.as_ref());
        fields
    }
}

// ============================================================================
// Client Credentials
// ============================================================================

/// Client credentials grant (RFC 6749 section 4.4.2)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientCredentialsGrant {
    scope: Option<String>,
}

impl ClientCredentialsGrant {
    /// Create a grant without scope
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the requested scope
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = optional(scope);
        self
    }

    /// The requested scope, if set
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }
}

impl GrantParameters for ClientCredentialsGrant {
    const GRANT_TYPE: GrantType = GrantType::ClientCredentials;

    fn to_request_fields(&self) -> RequestFields {
        let mut fields = vec![("grant_type", Self::GRANT_TYPE.as_str().to_string())];
        push_optional(&mut fields, "scope", self.scope.as_ref());
        fields
    }
}

// ============================================================================
// Resource Owner Password
// ============================================================================

/// Resource owner password credentials grant (RFC 6749 section 4.3.2)
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordGrant {
    username: String,
    password: String,
    scope: Option<String>,
}

impl PasswordGrant {
    /// Create a grant for the resource owner's credentials
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `username` or `password` is empty.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        Ok(Self {
            username: required(username, "username")?,
            password: required(password, "password")?,
            scope: None,
        })
    }

    /// Set the requested scope
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = optional(scope);
        self
    }

    /// The resource owner's username
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The resource owner's password
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// The requested scope, if set
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }
}

impl fmt::Debug for PasswordGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordGrant")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("scope", &self.scope)
            .finish()
    }
}

impl GrantParameters for PasswordGrant {
    const GRANT_TYPE: GrantType = GrantType::Password;

    fn to_request_fields(&self) -> RequestFields {
        let mut fields = vec![
            ("grant_type", Self::GRANT_TYPE.as_str().to_string()),
            ("username", self.username.clone()),
            ("password", self.password.clone()),
        ];
        push_optional(&mut fields, "scope", self.scope.as_ref());
        fields
    }
}

// ============================================================================
// Refresh Token
// ============================================================================

/// Refresh token grant (RFC 6749 section 6)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenGrant {
    refresh_token: String,
    scope: Option<String>,
}

impl RefreshTokenGrant {
    /// Create a grant for a previously issued refresh token
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `refresh_token` is empty.
    pub fn new(refresh_token: impl Into<String>) -> Result<Self> {
        Ok(Self {
            refresh_token: required(refresh_token, "refresh_token")?,
            scope: None,
        })
    }

    /// Set the requested scope
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = optional(scope);
        self
    }

    /// The refresh token
    #[must_use]
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// The requested scope, if set
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }
}

impl GrantParameters for RefreshTokenGrant {
    const GRANT_TYPE: GrantType = GrantType::RefreshToken;

    fn to_request_fields(&self) -> RequestFields {
        let mut fields = vec![
            ("grant_type", Self::GRANT_TYPE.as_str().to_string()),
            ("refresh_token", self.refresh_token.clone()),
        ];
        push_optional(&mut fields, "scope", self.scope.as_ref());
        fields
    }
}

// ============================================================================
// Grant
// ============================================================================

/// Any supported grant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grant {
    /// Authorization code grant
    AuthorizationCode(AuthorizationCodeGrant),
    /// Client credentials grant
    ClientCredentials(ClientCredentialsGrant),
    /// Resource owner password grant
    Password(PasswordGrant),
    /// Refresh token grant
    RefreshToken(RefreshTokenGrant),
}

impl Grant {
    /// The discriminator of the wrapped grant
    #[must_use]
    pub fn grant_type(&self) -> GrantType {
        match self {
            Self::AuthorizationCode(_) => AuthorizationCodeGrant::GRANT_TYPE,
            Self::ClientCredentials(_) => ClientCredentialsGrant::GRANT_TYPE,
            Self::Password(_) => PasswordGrant::GRANT_TYPE,
            Self::RefreshToken(_) => RefreshTokenGrant::GRANT_TYPE,
        }
    }

    /// Serialize into ordered token request fields, `grant_type` first
    #[must_use]
    pub fn to_request_fields(&self) -> RequestFields {
        match self {
            Self::AuthorizationCode(grant) => grant.to_request_fields(),
            Self::ClientCredentials(grant) => grant.to_request_fields(),
            Self::Password(grant) => grant.to_request_fields(),
            Self::RefreshToken(grant) => grant.to_request_fields(),
        }
    }
}

impl From<AuthorizationCodeGrant> for Grant {
    fn from(grant: AuthorizationCodeGrant) -> Self {
        Self::AuthorizationCode(grant)
    }
}

impl From<ClientCredentialsGrant> for Grant {
    fn from(grant: ClientCredentialsGrant) -> Self {
        Self::ClientCredentials(grant)
    }
}

impl From<PasswordGrant> for Grant {
    fn from(grant: PasswordGrant) -> Self {
        Self::Password(grant)
    }
}

impl From<RefreshTokenGrant> for Grant {
    fn from(grant: RefreshTokenGrant) -> Self {
        Self::RefreshToken(grant)
    }
}
