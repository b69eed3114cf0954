//! Build a grant from untyped request parameters
//!
//! Used by authorization servers reading a token request form body, and by
//! clients re-hydrating a stored flow. For every grant,
//! `GrantFactory::build(grant.to_request_fields())` yields the same grant.

use std::collections::HashMap;

use crate::error::{OAuth2Error, Result};
use crate::types::{
    AuthorizationCodeGrant, ClientCredentialsGrant, Grant, GrantType, PasswordGrant,
    RefreshTokenGrant,
};

/// Factory dispatching on the `grant_type` parameter
#[derive(Debug, Clone, Copy, Default)]
pub struct GrantFactory;

impl GrantFactory {
    /// Build a grant from a parameter mapping
    ///
    /// Later duplicates of a key override earlier ones. Empty optional
    /// parameters are treated as absent.
    ///
    /// # Errors
    /// Returns `UnsupportedGrantType` if `grant_type` is absent or unknown,
    /// `MissingParameter` if a required parameter of the grant is absent, and
    /// `InvalidArgument` if it is present but empty.
    pub fn build<I, K, V>(parameters: I) -> Result<Grant>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut parameters: HashMap<String, String> = parameters
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.into()))
            .collect();

        let grant_type = parameters
            .remove("grant_type")
            .ok_or_else(|| OAuth2Error::unsupported_grant_type("Provided an invalid grant type"))?
            .parse::<GrantType>()?;

        let mut take = |name: &str| parameters.remove(name);

        let grant = match grant_type {
            GrantType::AuthorizationCode => {
                let mut grant = AuthorizationCodeGrant::new(require(take("code"), "code")?)?;
                if let Some(redirect_uri) = take("redirect_uri") {
                    grant = grant.with_redirect_uri(redirect_uri);
                }
                if let Some(client_id) = take("client_id") {
                    grant = grant.with_client_id(client_id);
                }
                Grant::AuthorizationCode(grant)
            }
            GrantType::ClientCredentials => {
                let mut grant = ClientCredentialsGrant::new();
                if let Some(scope) = take("scope") {
                    grant = grant.with_scope(scope);
                }
                Grant::ClientCredentials(grant)
            }
            GrantType::Password => {
                let username = require(take("username"), "username")?;
                let password = require(take("password"), "password")?;
                let mut grant = PasswordGrant::new(username, password)?;
                if let Some(scope) = take("scope") {
                    grant = grant.with_scope(scope);
                }
                Grant::Password(grant)
            }
            GrantType::RefreshToken => {
                let mut grant =
                    RefreshTokenGrant::new(require(take("refresh_token"), "refresh_token")?)?;
                if let Some(scope) = take("scope") {
                    grant = grant.with_scope(scope);
                }
                Grant::RefreshToken(grant)
            }
        };

        tracing::trace!(grant_type = %grant_type, "Built grant from parameters");
        Ok(grant)
    }
}

fn require(value: Option<String>, name: &str) -> Result<String> {
    value.ok_or_else(|| OAuth2Error::missing_parameter(format!("Parameter {name} is missing")))
}
