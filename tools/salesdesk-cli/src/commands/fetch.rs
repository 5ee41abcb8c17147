//! Issue a request through the response cache.

use anyhow::{bail, Context as _, Result};
use salesdesk_cache::{CacheStatsSnapshot, CacheStatus};
use serde::Serialize;

use super::FetchArgs;
use crate::context::Context;
use crate::output::{cache_badge, cache_counters, http_status};

#[derive(Serialize)]
struct FetchReport {
    method: String,
    url: String,
    status: u16,
    cache: String,
    key: Option<String>,
    counters: CacheStatsSnapshot,
    hit_ratio: Option<f64>,
    body: serde_json::Value,
}

/// Run the fetch command.
pub async fn run(args: FetchArgs, ctx: &Context) -> Result<()> {
    let client = ctx.api_client()?;

    let mut request = client.request(args.method, &args.path);
    if let Some(data) = &args.data {
        let body: serde_json::Value =
            serde_json::from_str(data).context("--data must be valid JSON")?;
        request = request.json(&body)?;
    }

    ctx.output
        .debug(&format!("{} {}", request.method, request.url));

    let spinner = ctx.output.spinner(&format!("{} {}", request.method, request.url));
    let outcome = client.transport().intercept_with_status(&request).await;
    spinner.finish_and_clear();

    let counters = client.transport().stats();
    ctx.output.debug(&format!("Cache counters: {}", cache_counters(&counters)));

    let response = &outcome.response;
    let parsed = if response.is_json() {
        response.json::<serde_json::Value>().ok()
    } else {
        None
    };
    let body = parsed.unwrap_or_else(|| {
        serde_json::Value::String(String::from_utf8_lossy(&response.body).into_owned())
    });

    if ctx.output.is_json() {
        ctx.output.json(&FetchReport {
            method: request.method.to_string(),
            url: request.url.clone(),
            status: response.status,
            cache: outcome.status.to_string(),
            key: outcome.key.as_ref().map(|k| k.to_string()),
            counters,
            hit_ratio: counters.hit_ratio(),
            body,
        });
    } else {
        ctx.output.kv("URL", &request.url);
        ctx.output
            .kv("Status", &http_status(response.status, response.status_text()));
        ctx.output.kv("Cache", &cache_badge(outcome.status));
        if let Some(key) = &outcome.key {
            ctx.output.kv("Key", key.as_str());
        }
        ctx.output.raw("");
        match &body {
            serde_json::Value::String(text) => ctx.output.raw(text),
            value => ctx.output.raw(&serde_json::to_string_pretty(value)?),
        }
    }

    if outcome.status == CacheStatus::Error {
        bail!("Backend unreachable and no stored response for {}", request.url);
    }

    Ok(())
}
