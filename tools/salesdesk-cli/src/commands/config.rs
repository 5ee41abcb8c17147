//! Configuration management commands.

use std::path::Path;

use anyhow::{bail, Context as _, Result};
use salesdesk_core::ConsoleConfig;

use super::{ConfigArgs, ConfigCommand};
use crate::config::{self, generate_default_config, CONFIG_NAMES};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { force, output } => init_config(force, output.as_deref(), ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(none found, using defaults)"),
    }

    let config = &ctx.config;

    ctx.output.info("[api]");
    ctx.output.kv("base_url", &config.api.base_url);
    ctx.output.kv("token_header", &config.api.token_header);
    if let Some(secs) = config.api.timeout_secs {
        ctx.output.kv("timeout_secs", &secs.to_string());
    }

    ctx.output.info("[cache]");
    ctx.output.kv("enabled", &config.cache.enabled.to_string());
    ctx.output.kv("namespace", &config.cache.namespace);
    ctx.output.kv("dir", &ctx.cache_dir().display().to_string());
    ctx.output.kv(
        "key_strategy",
        &serde_json::to_value(config.cache.key_strategy)?
            .as_str()
            .unwrap_or_default()
            .to_string(),
    );

    ctx.output.info("[sale]");
    ctx.output.kv("currency", &config.sale.currency);

    ctx.output.info("[log]");
    ctx.output.kv(
        "format",
        &serde_json::to_value(config.log.format)?
            .as_str()
            .unwrap_or_default()
            .to_string(),
    );
    if let Some(filter) = &config.log.filter {
        ctx.output.kv("filter", filter);
    }

    Ok(())
}

async fn init_config(force: bool, output: Option<&str>, ctx: &Context) -> Result<()> {
    let config_path = match output {
        Some(path) => ctx.resolve_path(path),
        None => ctx.cwd.join(CONFIG_NAMES[0]),
    };

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    write_default(&config_path)?;
    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

// TOML gets the annotated template, JSON the serialized defaults.
fn write_default(path: &Path) -> Result<()> {
    if config::is_json(path) {
        config::save(&ConsoleConfig::default(), path)
    } else {
        std::fs::write(path, generate_default_config())
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}
