//! Terminal output for tokens and errors

use console::style;
use oauth2_grants::{AccessToken, OAuth2Error, Redirect};

/// Print an issued token, as pretty JSON when requested
pub fn display_token(token: &AccessToken, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(token)?);
        return Ok(());
    }

    let label = |name: &str| style(format!("{name}:")).cyan().bold();

    println!("{} {}", label("access_token"), token.access_token());
    println!("{} {}", label("token_type"), token.token_type());
    if let Some(expires_in) = token.expires_in() {
        println!("{} {expires_in}s", label("expires_in"));
    }
    if let Some(refresh_token) = token.refresh_token() {
        println!("{} {refresh_token}", label("refresh_token"));
    }
    if let Some(scope) = token.scope() {
        println!("{} {scope}", label("scope"));
    }
    if let Some(id_token) = token.id_token() {
        println!("{} {id_token}", label("id_token"));
    }
    match token.authorization_header() {
        Ok(header) => println!("{} {header}", style("Authorization:").green().bold()),
        Err(e) => println!("{}", style(e).dim()),
    }
    Ok(())
}

/// Print the authorization request the user must open
pub fn display_redirect(redirect: &Redirect) {
    println!(
        "{} {}",
        style(format!("{}", Redirect::STATUS)).yellow().bold(),
        redirect
    );
}

/// Print a token error, naming the RFC 6749 code when there is one
pub fn display_error(err: &OAuth2Error) {
    match err.error_code() {
        Some(code) => eprintln!("{} {} ({code})", style("Error:").red().bold(), err),
        None => eprintln!("{} {}", style("Error:").red().bold(), err),
    }
}
