//! SalesDesk CLI - operator tool for the sales console backend.
//!
//! Commands:
//! - `salesdesk fetch` - Issue a request through the offline response cache
//! - `salesdesk cache` - Inspect stored responses
//! - `salesdesk login` / `logout` / `whoami` - Manage the access token
//! - `salesdesk sale total` - Compute a sale's total and outstanding balance
//! - `salesdesk config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use salesdesk_core::{LogConfig, LogFormat};
use salesdesk_observability::{command_span, init_tracing, VERBOSE_FILTER};
use tracing::Instrument;

use commands::{CacheArgs, ConfigArgs, FetchArgs, LoginArgs, SaleArgs};

/// SalesDesk CLI - Work with the sales console backend, online or offline
#[derive(Parser)]
#[command(name = "salesdesk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a request through the response cache
    Fetch(FetchArgs),

    /// Inspect the response cache
    Cache(CacheArgs),

    /// Store an access token
    Login(LoginArgs),

    /// Remove the stored access token
    Logout,

    /// Show the stored access token
    Whoami,

    /// Sale calculations
    Sale(SaleArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Fetch(_) => "fetch",
            Commands::Cache(_) => "cache",
            Commands::Login(_) => "login",
            Commands::Logout => "logout",
            Commands::Whoami => "whoami",
            Commands::Sale(_) => "sale",
            Commands::Config(_) => "config",
        }
    }
}

fn log_config(base: &LogConfig, verbose: bool, json: bool) -> LogConfig {
    let mut log = base.clone();
    if json {
        log.format = LogFormat::Json;
    }
    if verbose && log.filter.is_none() {
        log.filter = Some(VERBOSE_FILTER.to_string());
    }
    log
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    init_tracing(&log_config(&ctx.config.log, cli.verbose, cli.json))?;

    let (request_id, span) = command_span(cli.command.name());
    tracing::debug!(request_id = %request_id, "starting command");

    // Execute command
    let result = async {
        match cli.command {
            Commands::Fetch(args) => commands::fetch::run(args, &ctx).await,
            Commands::Cache(args) => commands::cache::run(args, &ctx).await,
            Commands::Login(args) => commands::auth::run_login(args, &ctx).await,
            Commands::Logout => commands::auth::run_logout(&ctx).await,
            Commands::Whoami => commands::auth::run_whoami(&ctx).await,
            Commands::Sale(args) => commands::sale::run(args, &ctx).await,
            Commands::Config(args) => commands::config::run(args, &ctx).await,
        }
    }
    .instrument(span)
    .await;

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
