//! Type definitions for OAuth 2.0 token requests
//!
//! This module contains the grant variants sent to the token endpoint and the
//! access token and error models parsed from its responses.

// Module declarations
pub mod error_response;
pub mod grant;
pub mod token;

pub use error_response::{ErrorCode, ErrorResponse};
pub use grant::{
    AuthorizationCodeGrant, ClientCredentialsGrant, Grant, GrantParameters, GrantType,
    PasswordGrant, RefreshTokenGrant, RequestFields,
};
pub use token::AccessToken;
