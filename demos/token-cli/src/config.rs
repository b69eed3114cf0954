//! Client configuration from command-line flags and environment

use clap::{Args, ValueEnum};
use oauth2_grants::{AuthMethod, Authorization, ClientAuth, ReqwestTransport, Result};

/// How client credentials are sent to the token endpoint
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum Method {
    /// HTTP Basic authentication header
    #[default]
    Basic,
    /// `client_id` and `client_secret` form fields
    Post,
}

impl From<Method> for AuthMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Basic => AuthMethod::Basic,
            Method::Post => AuthMethod::Post,
        }
    }
}

/// Token endpoint and client credentials shared by every token subcommand
#[derive(Args, Debug)]
pub struct ClientConfig {
    /// Token endpoint URL
    #[arg(long, env = "OAUTH2_TOKEN_URL")]
    pub token_url: String,

    /// Client identifier
    #[arg(long, env = "OAUTH2_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Client secret
    #[arg(long, env = "OAUTH2_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Client authentication method
    #[arg(long, env = "OAUTH2_AUTH_METHOD", value_enum, default_value_t = Method::Basic)]
    pub auth_method: Method,
}

impl ClientConfig {
    /// Build the token endpoint client
    ///
    /// The client is only authenticated when both id and secret are set.
    pub fn authorization(&self) -> Result<Authorization<ReqwestTransport>> {
        let authorization = Authorization::from_endpoint(ReqwestTransport::new(), &self.token_url)?;

        let authorization = match (&self.client_id, &self.client_secret) {
            (Some(client_id), Some(client_secret)) => authorization.with_client_auth(
                ClientAuth::builder()
                    .client_id(client_id)
                    .client_secret(client_secret)
                    .method(self.auth_method.into())
                    .build(),
            ),
            (Some(_), None) | (None, Some(_)) => {
                tracing::warn!("Both client id and secret are needed; sending unauthenticated");
                authorization
            }
            (None, None) => authorization,
        };

        Ok(authorization)
    }
}
