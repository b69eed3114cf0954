//! Authorization request redirect for the authorization code flow

use reqwest::StatusCode;
use std::fmt;
use url::Url;

use crate::error::{OAuth2Error, Result};

/// Instruction to send the user agent to the authorization endpoint
///
/// This is control flow, not a failure: a web layer answers the current
/// request with [`Redirect::STATUS`] and a `Location` header set to
/// [`Redirect::location`]. The code delivered to the redirect URI is then
/// exchanged through an [`super::AuthorizationCodeFlow`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    location: Url,
}

impl Redirect {
    /// Status code to answer with (307 Temporary Redirect)
    pub const STATUS: StatusCode = StatusCode::TEMPORARY_REDIRECT;

    /// The authorization request URL
    #[must_use]
    pub fn location(&self) -> &Url {
        &self.location
    }

    /// Consume the redirect, returning the authorization request URL
    #[must_use]
    pub fn into_location(self) -> Url {
        self.location
    }
}

impl fmt::Display for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.location.as_str())
    }
}

/// Build the authorization request that starts the authorization code flow
///
/// Adds `response_type=code`, `client_id` and, when given and non-empty,
/// `redirect_uri`, `scope` and `state` to the query of `auth_url`, keeping
/// any parameters it already has. The scheme is forced to `https`. `scope`
/// is passed through verbatim.
///
/// # Errors
/// Returns `InvalidArgument` if `auth_url` cannot be switched to `https`
/// (e.g. a non-hierarchical URL).
pub fn redirect(
    auth_url: &Url,
    client_id: &str,
    redirect_uri: Option<&str>,
    scope: Option<&str>,
    state: Option<&str>,
) -> Result<Redirect> {
    let mut parameters: Vec<(String, String)> = auth_url.query_pairs().into_owned().collect();

    let mut set = |name: &str, value: &str| {
        match parameters.iter_mut().find(|(key, _)| key == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => parameters.push((name.to_string(), value.to_string())),
        }
    };

    set("response_type", "code");
    set("client_id", client_id);
    for (name, value) in [
        ("redirect_uri", redirect_uri),
        ("scope", scope),
        ("state", state),
    ] {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            set(name, value);
        }
    }

    let mut location = auth_url.clone();
    location.set_scheme("https").map_err(|()| {
        OAuth2Error::invalid_argument(format!("Cannot use https for {auth_url}"))
    })?;
    location.set_query(None);
    location.query_pairs_mut().extend_pairs(&parameters);

    tracing::debug!(endpoint = %auth_url, "Built authorization redirect");

    Ok(Redirect { location })
}
