//! Inspect the response cache.

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use salesdesk_cache::{CacheEntry, CacheKey, CacheStore, FileStore};
use serde::Serialize;

use super::{CacheArgs, CacheCommand};
use crate::context::Context;
use crate::output::{format_bytes, http_status, short_key};

/// Run the cache command.
pub async fn run(args: CacheArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    match args.command {
        CacheCommand::List => list(&store, ctx).await,
        CacheCommand::Show { key } => show(&store, &key, ctx).await,
        CacheCommand::Stats => stats(&store, ctx).await,
    }
}

async fn entries(store: &FileStore, ctx: &Context) -> Result<Vec<CacheEntry>> {
    let mut entries = Vec::new();
    for key in store.keys().await? {
        match store.get(&key).await {
            Ok(Some(entry)) => entries.push(entry),
            Ok(None) => {}
            Err(e) => ctx.output.warn(&format!("Skipping {}: {}", short_key(key.as_str()), e)),
        }
    }
    entries.sort_by(|a, b| b.stored_at.cmp(&a.stored_at));
    Ok(entries)
}

#[derive(Serialize)]
struct EntrySummary<'a> {
    key: &'a CacheKey,
    method: String,
    url: &'a str,
    status: u16,
    bytes: usize,
    stored_at: DateTime<Utc>,
}

async fn list(store: &FileStore, ctx: &Context) -> Result<()> {
    let entries = entries(store, ctx).await?;

    if ctx.output.is_json() {
        let rows: Vec<_> = entries
            .iter()
            .map(|e| EntrySummary {
                key: &e.key,
                method: e.method.to_string(),
                url: &e.url,
                status: e.status,
                bytes: e.body_len(),
                stored_at: e.stored_at,
            })
            .collect();
        ctx.output.json(&rows);
        return Ok(());
    }

    ctx.output.header(&format!("Cached responses ({})", entries.len()));
    if entries.is_empty() {
        ctx.output.info("Cache is empty");
        return Ok(());
    }

    let widths = [12, 6, 6, 10, 19, 0];
    ctx.output
        .table_row(&["KEY", "METHOD", "STATUS", "SIZE", "STORED", "URL"], &widths);
    for e in &entries {
        ctx.output.table_row(
            &[
                short_key(e.key.as_str()),
                e.method.as_str(),
                &e.status.to_string(),
                &format_bytes(e.body_len() as u64),
                &e.stored_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                &e.url,
            ],
            &widths,
        );
    }
    Ok(())
}

async fn resolve_key(store: &FileStore, input: &str) -> Result<CacheKey> {
    if let Some(key) = CacheKey::parse(input) {
        return Ok(key);
    }
    if input.len() < 4 {
        bail!("Key prefix {:?} is too short (need at least 4 characters)", input);
    }

    let matches: Vec<CacheKey> = store
        .keys()
        .await?
        .into_iter()
        .filter(|k| k.as_str().starts_with(input))
        .collect();

    match matches.as_slice() {
        [] => bail!("No cached response matches {:?}", input),
        [key] => Ok(key.clone()),
        many => bail!("Key prefix {:?} is ambiguous ({} matches)", input, many.len()),
    }
}

async fn show(store: &FileStore, input: &str, ctx: &Context) -> Result<()> {
    let key = resolve_key(store, input).await?;
    let Some(entry) = store.get(&key).await? else {
        bail!("No cached response for key {}", key);
    };

    if ctx.output.is_json() {
        let body = serde_json::from_slice::<serde_json::Value>(&entry.body).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&entry.body).into_owned())
        });
        ctx.output.json(&serde_json::json!({
            "key": entry.key,
            "method": entry.method,
            "url": entry.url,
            "status": entry.status,
            "headers": entry.headers,
            "stored_at": entry.stored_at,
            "body": body,
        }));
        return Ok(());
    }

    let response = entry.to_response();
    ctx.output.header("Cached response");
    ctx.output.kv("Key", entry.key.as_str());
    ctx.output.kv("Request", &format!("{} {}", entry.method, entry.url));
    ctx.output
        .kv("Status", &http_status(entry.status, response.status_text()));
    ctx.output.kv("Stored", &entry.stored_at.to_rfc3339());
    ctx.output.kv("Size", &format_bytes(entry.body_len() as u64));

    let mut headers: Vec<_> = entry.headers.iter().collect();
    headers.sort();
    for (name, value) in headers {
        ctx.output.list_item(&format!("{}: {}", name, value));
    }

    ctx.output.raw("");
    match response.json::<serde_json::Value>() {
        Ok(value) => ctx.output.raw(&serde_json::to_string_pretty(&value)?),
        Err(_) => ctx.output.raw(&String::from_utf8_lossy(&entry.body)),
    }
    Ok(())
}

#[derive(Serialize)]
struct StoreStats {
    namespace: String,
    path: String,
    entries: usize,
    body_bytes: u64,
    oldest: Option<DateTime<Utc>>,
    newest: Option<DateTime<Utc>>,
}

async fn stats(store: &FileStore, ctx: &Context) -> Result<()> {
    let entries = entries(store, ctx).await?;
    let stats = StoreStats {
        namespace: store.namespace().to_string(),
        path: store.root().display().to_string(),
        entries: entries.len(),
        body_bytes: entries.iter().map(|e| e.body_len() as u64).sum(),
        oldest: entries.iter().map(|e| e.stored_at).min(),
        newest: entries.iter().map(|e| e.stored_at).max(),
    };

    if ctx.output.is_json() {
        ctx.output.json(&stats);
        return Ok(());
    }

    ctx.output.header("Cache statistics");
    ctx.output.kv("Namespace", &stats.namespace);
    ctx.output.kv("Path", &stats.path);
    ctx.output.kv("Entries", &stats.entries.to_string());
    ctx.output.kv("Body size", &format_bytes(stats.body_bytes));
    if let (Some(oldest), Some(newest)) = (stats.oldest, stats.newest) {
        ctx.output.kv("Oldest", &oldest.to_rfc3339());
        ctx.output.kv("Newest", &newest.to_rfc3339());
    }
    Ok(())
}
