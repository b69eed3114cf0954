//! Token request orchestration
//!
//! [`Authorization`] turns a grant into a token request, authenticates the
//! client, sends the request through an [`HttpTransport`] and parses the
//! response into an [`AccessToken`] or a typed [`OAuth2Error`].
//!
//! # Request shape
//!
//! Every token request is a form-encoded `POST` to the token endpoint with
//! `Accept: application/json`. Body fields appear in the order
//! `grant_type`, grant-specific fields, `redirect_uri`, `client_id` /
//! `client_secret` (body authentication only), `scope`.
//!
//! # Client authentication
//!
//! - [`AuthMethod::Basic`] sends `Authorization: Basic base64(id:secret)`
//! - [`AuthMethod::Post`] embeds `client_id` and `client_secret` in the body
//! - without [`ClientAuth`] the client is not authenticated at all
//!
//! # Example
//!
//! ```no_run
//! use oauth2_grants::authorization::{Authorization, ClientAuth, AuthMethod, TokenFlow};
//! use oauth2_grants::transport::ReqwestTransport;
//! use oauth2_grants::types::{ClientCredentialsGrant, Grant};
//!
//! # async fn example() -> oauth2_grants::Result<()> {
//! let client_auth = ClientAuth::builder()
//!     .client_id("s6BhdRkqt3")
//!     .client_secret("gX1fBat3bV")
//!     .method(AuthMethod::Post)
//!     .build();
//!
//! let authorization =
//!     Authorization::from_endpoint(ReqwestTransport::new(), "https://server.example.com/token")?
//!         .with_client_auth(client_auth);
//!
//! let grant = Grant::from(ClientCredentialsGrant::new().with_scope("read"));
//! let token = authorization.request_token(&grant).await?;
//! println!("{}", token.access_token());
//! # Ok(())
//! # }
//! ```

pub mod authorization_code;
pub mod flow;

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Method, StatusCode};
use std::fmt;
use typed_builder::TypedBuilder;
use url::{Url, form_urlencoded};

use crate::error::{OAuth2Error, Result};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::types::{
    AccessToken, ErrorResponse, Grant, GrantParameters, RefreshTokenGrant, RequestFields,
};

pub use authorization_code::{Redirect, redirect};
pub use flow::{
    AuthorizationCodeFlow, ClientCredentialsFlow, FlowGrant, GrantFlow, PasswordFlow,
    RefreshTokenFlow,
};

const USER_AGENT_VALUE: &str = concat!("oauth2-grants/", env!("CARGO_PKG_VERSION"));

/// How the client proves its identity to the token endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMethod {
    /// HTTP Basic authentication header (RFC 6749 section 2.3.1)
    #[default]
    Basic,
    /// `client_id` and `client_secret` in the request body
    Post,
}

/// Client credentials used to authenticate token requests
#[derive(Clone, PartialEq, Eq, TypedBuilder)]
#[builder(
    builder_method(doc = "Create a new builder for ClientAuth"),
    builder_type(doc = "Builder for ClientAuth", vis = "pub"),
    build_method(doc = "Build the ClientAuth")
)]
pub struct ClientAuth {
    /// Client identifier issued by the authorization server
    #[builder(setter(into))]
    client_id: String,

    /// Client secret issued by the authorization server
    #[builder(setter(into))]
    client_secret: String,

    /// Authentication method (default: Basic)
    #[builder(default)]
    method: AuthMethod,
}

impl ClientAuth {
    /// The client identifier
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The client secret
    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// The authentication method
    #[must_use]
    pub fn method(&self) -> AuthMethod {
        self.method
    }

    /// The `Authorization` header value for Basic authentication
    #[must_use]
    pub fn basic_authorization(&self) -> String {
        let credentials = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", STANDARD.encode(credentials))
    }
}

impl fmt::Debug for ClientAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientAuth")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("method", &self.method)
            .finish()
    }
}

/// A token-issuing flow
///
/// Implemented by [`Authorization`], which accepts every grant, and by the
/// [`GrantFlow`] specializations, which accept only their own grant.
#[async_trait]
pub trait TokenFlow: Send + Sync {
    /// Request an access token for the given grant
    ///
    /// # Errors
    /// Returns `UnsupportedGrantType` if the flow does not accept the grant,
    /// a `Protocol` or `UnknownErrorType` error if the endpoint rejected the
    /// request, and `Transport` if the request could not be sent.
    async fn request_token(&self, grant: &Grant) -> Result<AccessToken>;

    /// Exchange the refresh token of `current` for a new access token
    ///
    /// # Errors
    /// Returns `NoRefreshToken` without sending anything if `current` has no
    /// refresh token; otherwise the same errors as [`Self::request_token`].
    async fn refresh_token(&self, current: &AccessToken) -> Result<AccessToken>;
}

/// Token endpoint client
///
/// Configuration is fixed once the value is built, so a single instance can
/// serve concurrent requests if the transport allows it.
#[derive(Debug, Clone)]
pub struct Authorization<T> {
    transport: T,
    token_url: Url,
    client_auth: Option<ClientAuth>,
}

impl<T: HttpTransport> Authorization<T> {
    /// Create a client for the given token endpoint, without client authentication
    pub fn new(transport: T, token_url: Url) -> Self {
        Self {
            transport,
            token_url,
            client_auth: None,
        }
    }

    /// Create a client for a token endpoint given as a string
    ///
    /// # Errors
    /// Returns `InvalidUrl` if `token_url` cannot be parsed.
    pub fn from_endpoint(transport: T, token_url: &str) -> Result<Self> {
        Ok(Self::new(transport, Url::parse(token_url)?))
    }

    /// Authenticate every request with the given client credentials
    #[must_use]
    pub fn with_client_auth(mut self, client_auth: ClientAuth) -> Self {
        self.client_auth = Some(client_auth);
        self
    }

    /// Authenticate every request with HTTP Basic client credentials
    #[must_use]
    pub fn with_client_password(
        self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.with_client_auth(
            ClientAuth::builder()
                .client_id(client_id)
                .client_secret(client_secret)
                .build(),
        )
    }

    /// The token endpoint
    #[must_use]
    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    /// The client credentials, if configured
    #[must_use]
    pub fn client_auth(&self) -> Option<&ClientAuth> {
        self.client_auth.as_ref()
    }

    /// The underlying transport
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Exchange the refresh token of `current` for a new access token
    ///
    /// The scope of `current` is requested again if present. Error responses
    /// are mapped exactly like those of any other token request.
    ///
    /// # Errors
    /// Returns `NoRefreshToken` without any network call if `current` has no
    /// (or an empty) refresh token.
    pub async fn refresh_token(&self, current: &AccessToken) -> Result<AccessToken> {
        let refresh_token = current
            .refresh_token()
            .filter(|t| !t.is_empty())
            .ok_or(OAuth2Error::NoRefreshToken)?;

        let mut grant = RefreshTokenGrant::new(refresh_token)?;
        if let Some(scope) = current.scope() {
            grant = grant.with_scope(scope);
        }

        self.request(grant.to_request_fields()).await
    }

    /// Refresh `token` and replace it with the newly issued token
    ///
    /// `token` is left untouched if the refresh fails.
    ///
    /// # Errors
    /// See [`Self::refresh_token`].
    pub async fn refresh_in_place(&self, token: &mut AccessToken) -> Result<()> {
        *token = self.refresh_token(token).await?;
        Ok(())
    }

    /// Send a token request with the given body fields
    pub(crate) async fn request(&self, fields: RequestFields) -> Result<AccessToken> {
        let grant_type = fields
            .first()
            .map(|(_, value)| value.clone())
            .unwrap_or_default();
        let request = self.build_request(fields)?;

        tracing::debug!(
            endpoint = %self.token_url,
            grant_type = %grant_type,
            auth_method = ?self.client_auth.as_ref().map(ClientAuth::method),
            "Requesting access token"
        );

        let response = self
            .transport
            .send(request)
            .await
            .map_err(OAuth2Error::Transport)?;

        let token = parse_token_response(response)?;
        tracing::debug!(
            grant_type = %grant_type,
            token_type = %token.token_type(),
            expires_in = ?token.expires_in(),
            "Received access token"
        );
        Ok(token)
    }

    /// Build the HTTP request for the given body fields, applying client authentication
    ///
    /// # Errors
    /// Returns `InvalidArgument` if the client credentials cannot be sent as a header.
    pub fn build_request(&self, mut fields: RequestFields) -> Result<HttpRequest> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        match &self.client_auth {
            Some(auth) if auth.method == AuthMethod::Basic => {
                let mut value = HeaderValue::from_str(&auth.basic_authorization()).map_err(|e| {
                    OAuth2Error::invalid_argument(format!("Invalid client credentials: {e}"))
                })?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            Some(auth) => {
                set_field(&mut fields, "client_id", &auth.client_id);
                set_field(&mut fields, "client_secret", &auth.client_secret);
            }
            None => {}
        }

        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&fields)
            .finish();

        Ok(HttpRequest {
            method: Method::POST,
            url: self.token_url.clone(),
            headers,
            body: body.into_bytes(),
        })
    }
}

#[async_trait]
impl<T: HttpTransport> TokenFlow for Authorization<T> {
    async fn request_token(&self, grant: &Grant) -> Result<AccessToken> {
        self.request(grant.to_request_fields()).await
    }

    async fn refresh_token(&self, current: &AccessToken) -> Result<AccessToken> {
        Authorization::refresh_token(self, current).await
    }
}

/// Set a body field in place, or insert it ahead of `scope`
fn set_field(fields: &mut RequestFields, name: &'static str, value: &str) {
    if let Some(entry) = fields.iter_mut().find(|(key, _)| *key == name) {
        entry.1 = value.to_string();
        return;
    }
    let at = fields
        .iter()
        .position(|(key, _)| *key == "scope")
        .unwrap_or(fields.len());
    fields.insert(at, (name, value.to_string()));
}

/// Interpret a token endpoint response
///
/// # Errors
/// On a non-200 status, the body is parsed as an [`ErrorResponse`] and mapped
/// by [`map_error`]. A body that is not a valid error response becomes
/// `UnknownErrorType`.
pub fn parse_token_response(response: HttpResponse) -> Result<AccessToken> {
    if response.status == StatusCode::OK {
        return AccessToken::from_slice(&response.body);
    }

    tracing::warn!(status = %response.status, "Token endpoint returned an error response");

    let error_response = serde_json::from_slice::<serde_json::Value>(&response.body)
        .map_err(OAuth2Error::from)
        .and_then(ErrorResponse::from_value);

    match error_response {
        Ok(error_response) => Err(map_error(error_response)),
        Err(e) => Err(OAuth2Error::unknown_error_type(
            None,
            format!("Could not parse error response (status {}): {e}", response.status),
        )),
    }
}

/// Map an error response to its typed error
///
/// The ten RFC 6749 codes map to [`OAuth2Error::Protocol`]; any other code
/// maps to [`OAuth2Error::UnknownErrorType`].
#[must_use]
pub fn map_error(error: ErrorResponse) -> OAuth2Error {
    if error.code().is_none() {
        tracing::warn!(error = %error.error(), "Unrecognized OAuth2 error code");
    }
    error.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProtocolError;
    use crate::transport::TransportError;
    use crate::types::{AuthorizationCodeGrant, ClientCredentialsGrant, PasswordGrant};

    const CLIENT_ID: &str = "s6BhdRkqt3";
    const CLIENT_SECRET: &str = "gX1fBat3bV";

    struct NoTransport;

    #[async_trait]
    impl HttpTransport for NoTransport {
        async fn send(
            &self,
            _request: HttpRequest,
        ) -> std::result::Result<HttpResponse, TransportError> {
            Err("no network in unit tests".into())
        }
    }

    fn authorization() -> Authorization<NoTransport> {
        Authorization::from_endpoint(NoTransport, "http://127.0.0.1/api").unwrap()
    }

    #[test]
    fn test_basic_authorization_header() {
        let auth = ClientAuth::builder()
            .client_id(CLIENT_ID)
            .client_secret(CLIENT_SECRET)
            .build();
        assert_eq!(auth.method(), AuthMethod::Basic);
        assert_eq!(
            auth.basic_authorization(),
            "Basic czZCaGRSa3F0MzpnWDFmQmF0M2JW"
        );
    }

    #[test]
    fn test_client_auth_debug_redacts_secret() {
        let auth = ClientAuth::builder()
            .client_id(CLIENT_ID)
            .client_secret(CLIENT_SECRET)
            .build();
        let debug = format!("{auth:?}");
        assert!(debug.contains(CLIENT_ID));
        assert!(!debug.contains(CLIENT_SECRET));
    }

    #[test]
    fn test_build_request_basic() {
        let authorization = authorization().with_client_password(CLIENT_ID, CLIENT_SECRET);
        let grant = AuthorizationCodeGrant::new("SplxlOBeZQQYbYS6WxSbIA").unwrap();
        let request = authorization
            .build_request(grant.to_request_fields())
            .unwrap();

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url.as_str(), "http://127.0.0.1/api");
        assert_eq!(
            request.headers[AUTHORIZATION],
            "Basic czZCaGRSa3F0MzpnWDFmQmF0M2JW"
        );
        assert_eq!(request.headers[ACCEPT], "application/json");
        assert_eq!(
            request.headers[CONTENT_TYPE],
            "application/x-www-form-urlencoded"
        );
        assert_eq!(
            request.body_text(),
            "grant_type=authorization_code&code=SplxlOBeZQQYbYS6WxSbIA"
        );
    }

    #[test]
    fn test_build_request_post_inserts_credentials_before_scope() {
        let authorization = authorization().with_client_auth(
            ClientAuth::builder()
                .client_id(CLIENT_ID)
                .client_secret(CLIENT_SECRET)
                .method(AuthMethod::Post)
                .build(),
        );
        let grant = PasswordGrant::new("johndoe", "A3ddj3w")
            .unwrap()
            .with_scope("foo bar");
        let request = authorization
            .build_request(grant.to_request_fields())
            .unwrap();

        assert!(request.headers.get(AUTHORIZATION).is_none());
        assert_eq!(
            request.body_text(),
            "grant_type=password&username=johndoe&password=A3ddj3w\
             &client_id=s6BhdRkqt3&client_secret=gX1fBat3bV&scope=foo+bar"
        );
    }

    #[test]
    fn test_build_request_post_replaces_existing_client_id() {
        let authorization = authorization().with_client_auth(
            ClientAuth::builder()
                .client_id(CLIENT_ID)
                .client_secret(CLIENT_SECRET)
                .method(AuthMethod::Post)
                .build(),
        );
        let grant = AuthorizationCodeGrant::new("abc")
            .unwrap()
            .with_redirect_uri("https://client.example.com/cb")
            .with_client_id("other");
        let request = authorization
            .build_request(grant.to_request_fields())
            .unwrap();

        assert_eq!(
            request.body_text(),
            "grant_type=authorization_code&code=abc\
             &redirect_uri=https%3A%2F%2Fclient.example.com%2Fcb\
             &client_id=s6BhdRkqt3&client_secret=gX1fBat3bV"
        );
    }

    #[test]
    fn test_build_request_without_client_auth() {
        let request = authorization()
            .build_request(ClientCredentialsGrant::new().to_request_fields())
            .unwrap();
        assert!(request.headers.get(AUTHORIZATION).is_none());
        assert_eq!(request.body_text(), "grant_type=client_credentials");
    }

    #[test]
    fn test_parse_token_response_success() {
        let token = parse_token_response(HttpResponse::new(
            StatusCode::OK,
            r#"{"access_token":"T","token_type":"example","expires_in":3600}"#,
        ))
        .unwrap();
        assert_eq!(token.access_token(), "T");
        assert_eq!(token.token_type(), "example");
        assert_eq!(token.expires_in(), Some(3600));
    }

    #[test]
    fn test_parse_token_response_error() {
        let err = parse_token_response(HttpResponse::new(
            StatusCode::BAD_REQUEST,
            r#"{"error":"invalid_request","error_description":"Error message","error_uri":"http://foo.bar"}"#,
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            OAuth2Error::Protocol(ProtocolError::InvalidRequest(ref m)) if m == "Error message"
        ));
    }

    #[test]
    fn test_parse_token_response_unparseable_error_body() {
        for body in ["<html>bad gateway</html>", "{}", r#"{"error_description":"x"}"#] {
            let err =
                parse_token_response(HttpResponse::new(StatusCode::BAD_GATEWAY, body)).unwrap_err();
            assert!(
                matches!(err, OAuth2Error::UnknownErrorType { error: None, .. }),
                "unexpected error for {body}: {err:?}"
            );
        }
    }

    #[test]
    fn test_parse_token_response_non_200_success_status() {
        let err = parse_token_response(HttpResponse::new(
            StatusCode::CREATED,
            r#"{"access_token":"T","token_type":"bearer"}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, OAuth2Error::UnknownErrorType { .. }));
    }

    #[test]
    fn test_map_error_unknown_code() {
        let err = map_error(ErrorResponse::new("unknown_code", None, None));
        assert_eq!(err.error_code(), Some("unknown_code"));
        assert!(matches!(err, OAuth2Error::UnknownErrorType { .. }));
    }

    #[tokio::test]
    async fn test_transport_error_is_surfaced() {
        let grant = Grant::from(ClientCredentialsGrant::new());
        let err = authorization().request_token(&grant).await.unwrap_err();
        assert!(matches!(
            err,
            OAuth2Error::Transport(ref e) if e.to_string() == "no network in unit tests"
        ));
    }

    #[tokio::test]
    async fn test_refresh_without_refresh_token() {
        let token = AccessToken::new("T", "bearer");
        let err = authorization().refresh_token(&token).await.unwrap_err();
        assert!(matches!(err, OAuth2Error::NoRefreshToken));
    }
}
