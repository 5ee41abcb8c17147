//! Access token management: login, logout, whoami.

use anyhow::{bail, Context as _, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use dialoguer::{Input, Password};
use salesdesk_data::{ApiClient, HttpTransport};
use serde::Deserialize;

use super::LoginArgs;
use crate::context::Context;

#[derive(Deserialize)]
struct LoginReply {
    token: Option<String>,
    message: Option<String>,
}

/// Run the login command.
pub async fn run_login(args: LoginArgs, ctx: &Context) -> Result<()> {
    let store = ctx.token_store();

    let token = match args.token {
        Some(token) => token,
        None => exchange_credentials(args.email, ctx).await?,
    };

    store
        .set(&token)
        .with_context(|| format!("Failed to save token to {}", store.path().display()))?;

    ctx.output.success("Logged in");
    ctx.output.kv("Token file", &store.path().display().to_string());
    Ok(())
}

// Sent over a bare transport: the login exchange never touches the cache.
async fn exchange_credentials(email: Option<String>, ctx: &Context) -> Result<String> {
    let email = match email {
        Some(email) => email,
        None => Input::<String>::new().with_prompt("Email").interact_text()?,
    };
    let password = Password::new().with_prompt("Password").interact()?;

    let client = ApiClient::from_config(HttpTransport::new()?, &ctx.config.api);
    let spinner = ctx.output.spinner("Signing in");
    let response = client
        .post_json("/login", &serde_json::json!({ "email": email, "password": password }))
        .await;
    spinner.finish_and_clear();

    let response = response.context("Login request failed")?;
    let reply: LoginReply = response
        .json()
        .with_context(|| format!("Unexpected login response (HTTP {})", response.status))?;

    match reply.token {
        Some(token) if response.is_success() => Ok(token),
        _ => bail!(
            "Login failed: {}",
            reply
                .message
                .unwrap_or_else(|| format!("HTTP {}", response.status))
        ),
    }
}

/// Run the logout command.
pub async fn run_logout(ctx: &Context) -> Result<()> {
    let store = ctx.token_store();
    if !store.is_authenticated() {
        ctx.output.info("Not logged in");
        return Ok(());
    }
    store.remove().context("Failed to remove token")?;
    ctx.output.success("Logged out");
    Ok(())
}

/// Run the whoami command.
pub async fn run_whoami(ctx: &Context) -> Result<()> {
    let store = ctx.token_store();
    let Some(token) = store.get() else {
        if ctx.output.is_json() {
            ctx.output.json(&serde_json::json!({ "authenticated": false }));
            return Ok(());
        }
        bail!("Not logged in. Run `salesdesk login` first.");
    };

    let claims = token_claims(&token);

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "authenticated": true,
            "token_file": store.path(),
            "claims": claims,
        }));
        return Ok(());
    }

    ctx.output.success("Logged in");
    ctx.output.kv("Token", &mask(&token));
    ctx.output.kv("Token file", &store.path().display().to_string());
    match claims {
        Some(serde_json::Value::Object(map)) => {
            for (name, value) in map {
                let value = match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                ctx.output.list_item(&format!("{}: {}", name, value));
            }
        }
        _ => ctx.output.debug("Token is not a JWT; no claims to show"),
    }
    Ok(())
}

/// Decode the payload of a JWT without verifying it.
fn token_claims(token: &str) -> Option<serde_json::Value> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

fn mask(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}
