//! Flow specializations accepting a single grant variant

use async_trait::async_trait;
use std::fmt;
use std::marker::PhantomData;

use super::{Authorization, TokenFlow};
use crate::error::{OAuth2Error, Result};
use crate::transport::HttpTransport;
use crate::types::{
    AccessToken, AuthorizationCodeGrant, ClientCredentialsGrant, Grant, GrantParameters,
    PasswordGrant, RefreshTokenGrant,
};

/// A grant variant that can drive its own flow
pub trait FlowGrant: GrantParameters + Send + Sync {
    /// Borrow the variant out of a [`Grant`], if it is this one
    fn from_grant(grant: &Grant) -> Option<&Self>;
}

impl FlowGrant for AuthorizationCodeGrant {
    fn from_grant(grant: &Grant) -> Option<&Self> {
        match grant {
            Grant::AuthorizationCode(grant) => Some(grant),
            _ => None,
        }
    }
}

impl FlowGrant for ClientCredentialsGrant {
    fn from_grant(grant: &Grant) -> Option<&Self> {
        match grant {
            Grant::ClientCredentials(grant) => Some(grant),
            _ => None,
        }
    }
}

impl FlowGrant for PasswordGrant {
    fn from_grant(grant: &Grant) -> Option<&Self> {
        match grant {
            Grant::Password(grant) => Some(grant),
            _ => None,
        }
    }
}

impl FlowGrant for RefreshTokenGrant {
    fn from_grant(grant: &Grant) -> Option<&Self> {
        match grant {
            Grant::RefreshToken(grant) => Some(grant),
            _ => None,
        }
    }
}

/// Token flow restricted to the grant variant `G`
pub struct GrantFlow<T, G> {
    authorization: Authorization<T>,
    grant: PhantomData<fn() -> G>,
}

/// Authorization code flow (RFC 6749 section 4.1)
///
/// Start it with [`super::redirect`], then exchange the code returned to the
/// redirect URI.
pub type AuthorizationCodeFlow<T> = GrantFlow<T, AuthorizationCodeGrant>;

/// Client credentials flow (RFC 6749 section 4.4)
pub type ClientCredentialsFlow<T> = GrantFlow<T, ClientCredentialsGrant>;

/// Resource owner password credentials flow (RFC 6749 section 4.3)
pub type PasswordFlow<T> = GrantFlow<T, PasswordGrant>;

/// Refresh token flow (RFC 6749 section 6)
pub type RefreshTokenFlow<T> = GrantFlow<T, RefreshTokenGrant>;

impl<T: HttpTransport, G: FlowGrant> GrantFlow<T, G> {
    /// Restrict a configured client to this flow
    pub fn new(authorization: Authorization<T>) -> Self {
        Self {
            authorization,
            grant: PhantomData,
        }
    }

    /// The underlying token endpoint client
    #[must_use]
    pub fn authorization(&self) -> &Authorization<T> {
        &self.authorization
    }

    /// Request an access token for this flow's grant
    ///
    /// # Errors
    /// See [`TokenFlow::request_token`].
    pub async fn request(&self, grant: &G) -> Result<AccessToken> {
        self.authorization.request(grant.to_request_fields()).await
    }

    /// Exchange the refresh token of `current` for a new access token
    ///
    /// # Errors
    /// See [`Authorization::refresh_token`].
    pub async fn refresh_token(&self, current: &AccessToken) -> Result<AccessToken> {
        self.authorization.refresh_token(current).await
    }
}

impl<T: HttpTransport, G: FlowGrant> From<Authorization<T>> for GrantFlow<T, G> {
    fn from(authorization: Authorization<T>) -> Self {
        Self::new(authorization)
    }
}

impl<T: fmt::Debug, G: GrantParameters> fmt::Debug for GrantFlow<T, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrantFlow")
            .field("grant_type", &G::GRANT_TYPE)
            .field("authorization", &self.authorization)
            .finish()
    }
}

#[async_trait]
impl<T: HttpTransport, G: FlowGrant> TokenFlow for GrantFlow<T, G> {
    async fn request_token(&self, grant: &Grant) -> Result<AccessToken> {
        let grant = G::from_grant(grant).ok_or_else(|| {
            OAuth2Error::unsupported_grant_type(format!(
                "The {} flow does not accept a {} grant",
                G::GRANT_TYPE,
                grant.grant_type()
            ))
        })?;
        self.request(grant).await
    }

    async fn refresh_token(&self, current: &AccessToken) -> Result<AccessToken> {
        self.authorization.refresh_token(current).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{HttpRequest, HttpResponse, TransportError};

    #[derive(Debug)]
    struct Unreachable;

    #[async_trait]
    impl HttpTransport for Unreachable {
        async fn send(
            &self,
            _request: HttpRequest,
        ) -> std::result::Result<HttpResponse, TransportError> {
            panic!("a mismatched grant must not reach the transport");
        }
    }

    #[test]
    fn test_from_grant() {
        let grant = Grant::from(ClientCredentialsGrant::new());
        assert!(ClientCredentialsGrant::from_grant(&grant).is_some());
        assert!(PasswordGrant::from_grant(&grant).is_none());
        assert!(AuthorizationCodeGrant::from_grant(&grant).is_none());
        assert!(RefreshTokenGrant::from_grant(&grant).is_none());
    }

    #[tokio::test]
    async fn test_flow_rejects_other_grant_variants() {
        let authorization = Authorization::from_endpoint(Unreachable, "http://127.0.0.1/api")
            .unwrap()
            .with_client_password("s6BhdRkqt3", "gX1fBat3bV");
        let flow = AuthorizationCodeFlow::new(authorization);

        let grant = Grant::from(ClientCredentialsGrant::new());
        let err = flow.request_token(&grant).await.unwrap_err();
        assert!(matches!(
            err,
            OAuth2Error::UnsupportedGrantType(ref m)
                if m.contains("authorization_code") && m.contains("client_credentials")
        ));
    }

    #[test]
    fn test_debug_names_grant_type() {
        let authorization =
            Authorization::from_endpoint(Unreachable, "http://127.0.0.1/api").unwrap();
        let flow: PasswordFlow<_> = authorization.into();
        assert_eq!(flow.authorization().token_url().as_str(), "http://127.0.0.1/api");
        assert!(format!("{flow:?}").contains("Password"));
    }
}
