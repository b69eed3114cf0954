//! OAuth 2.0 Token CLI Demo
//!
//! Requests access tokens from a token endpoint with each supported grant.
//!
//! Run with:
//!   OAUTH2_TOKEN_URL=https://server.example.com/token \
//!   OAUTH2_CLIENT_ID=s6BhdRkqt3 OAUTH2_CLIENT_SECRET=gX1fBat3bV \
//!   cargo run -p oauth2-token-cli -- client-credentials --scope read

mod config;
mod output;

use clap::{Parser, Subcommand};
use config::ClientConfig;
use oauth2_grants::{
    AccessToken, AuthorizationCodeGrant, ClientCredentialsGrant, Grant, PasswordGrant,
    RefreshTokenGrant, TokenFlow, redirect,
};
use std::process::ExitCode;
use url::Url;

/// Request OAuth 2.0 access tokens
#[derive(Parser, Debug)]
#[command(name = "oauth2-token-cli")]
#[command(about = "Request OAuth 2.0 access tokens from a token endpoint")]
struct Cli {
    /// Print the token as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Client credentials grant
    ClientCredentials {
        #[command(flatten)]
        client: ClientConfig,

        /// Requested scope
        #[arg(long)]
        scope: Option<String>,
    },

    /// Resource owner password credentials grant
    Password {
        #[command(flatten)]
        client: ClientConfig,

        /// Resource owner username
        #[arg(long)]
        username: String,

        /// Resource owner password
        #[arg(long, env = "OAUTH2_PASSWORD", hide_env_values = true)]
        password: String,

        /// Requested scope
        #[arg(long)]
        scope: Option<String>,
    },

    /// Exchange an authorization code
    Code {
        #[command(flatten)]
        client: ClientConfig,

        /// Code returned to the redirect URI
        #[arg(long)]
        code: String,

        /// Redirect URI used in the authorization request
        #[arg(long)]
        redirect_uri: Option<String>,
    },

    /// Refresh an access token
    Refresh {
        #[command(flatten)]
        client: ClientConfig,

        /// Refresh token
        #[arg(long, env = "OAUTH2_REFRESH_TOKEN", hide_env_values = true)]
        refresh_token: String,

        /// Scope to request again
        #[arg(long)]
        scope: Option<String>,
    },

    /// Print the authorization request URL for the authorization code flow
    AuthorizeUrl {
        /// Authorization endpoint URL
        #[arg(long, env = "OAUTH2_AUTH_URL")]
        auth_url: Url,

        /// Client identifier
        #[arg(long, env = "OAUTH2_CLIENT_ID")]
        client_id: String,

        /// Redirect URI
        #[arg(long)]
        redirect_uri: Option<String>,

        /// Requested scope
        #[arg(long)]
        scope: Option<String>,

        /// Opaque state echoed back to the redirect URI
        #[arg(long)]
        state: Option<String>,
    },
}

async fn run(cli: Cli) -> oauth2_grants::Result<Option<AccessToken>> {
    let token = match cli.command {
        Command::ClientCredentials { client, scope } => {
            let mut grant = ClientCredentialsGrant::new();
            if let Some(scope) = scope {
                grant = grant.with_scope(scope);
            }
            request(&client, grant.into()).await?
        }
        Command::Password {
            client,
            username,
            password,
            scope,
        } => {
            let mut grant = PasswordGrant::new(username, password)?;
            if let Some(scope) = scope {
                grant = grant.with_scope(scope);
            }
            request(&client, grant.into()).await?
        }
        Command::Code {
            client,
            code,
            redirect_uri,
        } => {
            let mut grant = AuthorizationCodeGrant::new(code)?;
            if let Some(redirect_uri) = redirect_uri {
                grant = grant.with_redirect_uri(redirect_uri);
            }
            request(&client, grant.into()).await?
        }
        Command::Refresh {
            client,
            refresh_token,
            scope,
        } => {
            request(&client, refresh_grant(refresh_token, scope)?.into()).await?
        }
        Command::AuthorizeUrl {
            auth_url,
            client_id,
            redirect_uri,
            scope,
            state,
        } => {
            let target = redirect(
                &auth_url,
                &client_id,
                redirect_uri.as_deref(),
                scope.as_deref(),
                state.as_deref(),
            )?;
            output::display_redirect(&target);
            return Ok(None);
        }
    };
    Ok(Some(token))
}

/// Refresh grant for a stored refresh token, re-requesting `scope` if given
fn refresh_grant(
    refresh_token: String,
    scope: Option<String>,
) -> oauth2_grants::Result<RefreshTokenGrant> {
    let grant = RefreshTokenGrant::new(refresh_token)?;
    Ok(match scope {
        Some(scope) => grant.with_scope(scope),
        None => grant,
    })
}

async fn request(client: &ClientConfig, grant: Grant) -> oauth2_grants::Result<AccessToken> {
    client.authorization()?.request_token(&grant).await
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Show library requests by default, override with RUST_LOG
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("oauth2_grants=debug,warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let json = cli.json;
    match run(cli).await {
        Ok(Some(token)) => {
            output::display_token(&token, json)?;
            Ok(ExitCode::SUCCESS)
        }
        Ok(None) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            output::display_error(&err);
            Ok(ExitCode::FAILURE)
        }
    }
}
