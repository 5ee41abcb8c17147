//! Sale computations.

use anyhow::{Context as _, Result};
use salesdesk_commerce::catalog::Catalog;
use salesdesk_commerce::sale::{summarize, LineItem, SaleSummary};
use salesdesk_commerce::{Currency, Money};

use super::{SaleArgs, SaleCommand};
use crate::context::Context;

/// Run the sale command.
pub async fn run(args: SaleArgs, ctx: &Context) -> Result<()> {
    match args.command {
        SaleCommand::Total {
            items,
            paid,
            catalog,
        } => total(&items, paid.as_deref(), catalog.as_deref(), ctx).await,
    }
}

async fn total(
    items: &[LineItem],
    paid: Option<&str>,
    catalog_file: Option<&str>,
    ctx: &Context,
) -> Result<()> {
    let currency = ctx.currency()?;
    let catalog = match catalog_file {
        Some(path) => load_catalog(path, currency, ctx)?,
        None => fetch_catalog(currency, ctx).await?,
    };
    ctx.output
        .debug(&format!("Catalog has {} products", catalog.len()));

    let paid = match paid {
        Some(amount) => Money::parse(amount, currency)?,
        None => Money::zero(currency),
    };

    let summary = summarize(items, &catalog, paid)?;

    if ctx.output.is_json() {
        ctx.output.json(&summary);
        return Ok(());
    }

    print_summary(&summary, ctx);
    Ok(())
}

fn load_catalog(path: &str, currency: Currency, ctx: &Context) -> Result<Catalog> {
    let path = ctx.resolve_path(path);
    let bytes = std::fs::read(&path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
    Catalog::from_json(&bytes, currency)
        .with_context(|| format!("Failed to parse catalog file: {}", path.display()))
}

async fn fetch_catalog(currency: Currency, ctx: &Context) -> Result<Catalog> {
    let client = ctx.api_client()?;

    let spinner = ctx.output.spinner("Loading products");
    let response = client.get("/products").await;
    spinner.finish_and_clear();

    let response = response
        .context("Failed to load products")?
        .error_for_status()
        .context("Failed to load products (is the backend reachable, are you logged in?)")?;
    Catalog::from_json(&response.body, currency).context("Unexpected /products response")
}

fn print_summary(summary: &SaleSummary, ctx: &Context) {
    ctx.output.header("Sale");

    let widths = [24, 18, 14];
    for line in &summary.lines {
        let name = line
            .name
            .clone()
            .unwrap_or_else(|| line.product_id.to_string());
        ctx.output.table_row(
            &[&name, &line.label(), &line.subtotal.display()],
            &widths,
        );
    }

    ctx.output.raw("");
    ctx.output.kv("Total", &summary.total.display());
    ctx.output.kv("Paid", &summary.paid.display());
    ctx.output.kv("Outstanding", &summary.outstanding.display());

    if summary.change_due().is_positive() {
        ctx.output
            .info(&format!("Change due: {}", summary.change_due().display()));
    }

    for line in summary.unresolved() {
        ctx.output.warn(&format!(
            "Product {} not in catalog; counted as zero",
            line.product_id
        ));
    }
}
