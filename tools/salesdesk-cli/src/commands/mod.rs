//! CLI command implementations.

pub mod auth;
pub mod cache;
pub mod config;
pub mod fetch;
pub mod sale;

use clap::{Args, Subcommand};
use salesdesk_commerce::sale::LineItem;
use salesdesk_core::Method;

/// Arguments for the fetch command.
#[derive(Args)]
pub struct FetchArgs {
    /// Path relative to the API base URL, or an absolute URL.
    pub path: String,

    /// HTTP method.
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: Method,

    /// JSON request body.
    #[arg(short, long)]
    pub data: Option<String>,
}

/// Arguments for the cache command.
#[derive(Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommand,
}

#[derive(Subcommand)]
pub enum CacheCommand {
    /// List stored responses.
    List,
    /// Show one stored response.
    Show {
        /// Cache key, or a unique prefix of one.
        key: String,
    },
    /// Show store size.
    Stats,
}

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// Store this access token instead of signing in.
    #[arg(short, long, conflicts_with = "email")]
    pub token: Option<String>,

    /// Account email (prompted for when omitted).
    #[arg(short, long)]
    pub email: Option<String>,
}

/// Arguments for the sale command.
#[derive(Args)]
pub struct SaleArgs {
    #[command(subcommand)]
    pub command: SaleCommand,
}

#[derive(Subcommand)]
pub enum SaleCommand {
    /// Compute total and outstanding balance of a sale.
    Total {
        /// Line item as PRODUCT_ID:QUANTITY (repeatable).
        #[arg(short, long = "item", required = true)]
        items: Vec<LineItem>,

        /// Amount already paid.
        #[arg(short, long)]
        paid: Option<String>,

        /// Product listing JSON file (fetched from /products when omitted).
        #[arg(long)]
        catalog: Option<String>,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,

        /// File to write; a `.json` name writes JSON (default: salesdesk.toml).
        #[arg(short, long)]
        output: Option<String>,
    },
}
