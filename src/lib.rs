//! # OAuth 2.0 Grants
//!
//! Client-side token acquisition for the OAuth 2.0 grant flows of
//! [RFC 6749](https://www.rfc-editor.org/rfc/rfc6749): authorization code,
//! client credentials, resource owner password and refresh token.
//!
//! ## Quick Start
//!
//! ```no_run
//! use oauth2_grants::{Authorization, ClientCredentialsGrant, Grant, ReqwestTransport, TokenFlow};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let authorization =
//!         Authorization::from_endpoint(ReqwestTransport::new(), "https://server.example.com/token")?
//!             .with_client_password("s6BhdRkqt3", "gX1fBat3bV");
//!
//!     let grant = Grant::from(ClientCredentialsGrant::new().with_scope("read"));
//!     let token = authorization.request_token(&grant).await?;
//!
//!     println!("Authorization: {}", token.authorization_header()?);
//!     Ok(())
//! }
//! ```
//!
//! ## Core Features
//!
//! ### 1. Grants
//!
//! Each grant in [`types::grant`] is pure data that serializes into the form
//! fields of a token request. [`GrantFactory`] rebuilds a grant from untyped
//! parameters, e.g. the form body received by an authorization server.
//!
//! ### 2. Flows
//!
//! [`Authorization`] sends any grant to the token endpoint. The
//! [`GrantFlow`](authorization::GrantFlow) aliases ([`AuthorizationCodeFlow`],
//! [`ClientCredentialsFlow`], [`PasswordFlow`], [`RefreshTokenFlow`]) accept
//! only their own grant. All of them implement [`TokenFlow`].
//!
//! ### 3. Authorization Code Redirect
//!
//! [`redirect`] builds the authorization request URL the user agent must be
//! sent to before a code can be exchanged:
//!
//! ```
//! use oauth2_grants::redirect;
//! use url::Url;
//!
//! let auth_url = Url::parse("https://server.example.com/authorize").unwrap();
//! let target = redirect(&auth_url, "s6BhdRkqt3", None, Some("read"), Some("xyz")).unwrap();
//! assert_eq!(
//!     target.location().as_str(),
//!     "https://server.example.com/authorize?response_type=code&client_id=s6BhdRkqt3&scope=read&state=xyz"
//! );
//! ```
//!
//! ### 4. Custom Transports
//!
//! Requests go through the [`HttpTransport`] trait. [`ReqwestTransport`] is the
//! default; implement the trait to use another HTTP stack or to test without
//! a network.
//!
//! ## Logging
//!
//! This crate uses [`tracing`](https://crates.io/crates/tracing) for structured logging.
//! Tracing events are always emitted but are zero-cost when no subscriber is attached.
//! Secrets and tokens are never logged.
//!
//! ```rust,ignore
//! tracing_subscriber::fmt::init();
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, OAuth2Error>`](Result). Error
//! responses from the token endpoint map to one [`ProtocolError`] kind per
//! RFC 6749 error code; codes outside the RFC map to
//! [`OAuth2Error::UnknownErrorType`]:
//!
//! ```no_run
//! # use oauth2_grants::{Authorization, Grant, OAuth2Error, ProtocolError, ReqwestTransport, TokenFlow};
//! # async fn example(authorization: Authorization<ReqwestTransport>, grant: Grant) {
//! match authorization.request_token(&grant).await {
//!     Ok(token) => { /* ... */ }
//!     Err(OAuth2Error::Protocol(ProtocolError::InvalidGrant(msg))) => {
//!         eprintln!("Grant rejected: {msg}");
//!     }
//!     Err(e) => {
//!         eprintln!("Error: {e}");
//!     }
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod authorization;
pub mod error;
pub mod factory;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use authorization::{
    AuthMethod, Authorization, AuthorizationCodeFlow, ClientAuth, ClientCredentialsFlow,
    PasswordFlow, Redirect, RefreshTokenFlow, TokenFlow, redirect,
};
pub use error::{OAuth2Error, ProtocolError, Result};
pub use factory::GrantFactory;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
pub use types::{
    AccessToken, AuthorizationCodeGrant, ClientCredentialsGrant, ErrorCode, ErrorResponse, Grant,
    GrantType, PasswordGrant, RefreshTokenGrant,
};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
