// src/driver.rs

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::{io, path::PathBuf};
use tracing::{info, instrument};

use crate::crawler::{CrawlOptions, Crawler};
use crate::export;
use crate::fetch::fetch_document;
use crate::table::PricingTable;
use crate::vendor::Vendor;

/// Output modes selected on the command line. Each one is independent.
#[derive(Debug, Clone, Default)]
pub struct Outputs {
    pub print: bool,
    pub csv: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

/// Fetch one vendor page and run its first extraction pass.
#[instrument(level = "info", skip_all, fields(vendor = vendor.enterprise()))]
pub fn crawl<V: Vendor>(
    client: &Client,
    vendor: V,
    options: &CrawlOptions,
) -> Result<PricingTable> {
    let enterprise = vendor.enterprise();
    let url = vendor.url();
    info!(url, "fetching pricing page");

    let document = fetch_document(client, url, options.parse_mode)
        .with_context(|| format!("fetching {} pricing", enterprise))?;
    let crawler = Crawler::new(vendor, document, options.clone())
        .with_context(|| format!("extracting {} pricing", enterprise))?;

    Ok(crawler.data().clone())
}

/// Crawl `vendors` one after another and stack their tables in that order.
/// The first failure aborts the run.
pub fn crawl_all(
    client: &Client,
    vendors: &[&dyn Vendor],
    options: &CrawlOptions,
) -> Result<PricingTable> {
    let mut tables = Vec::with_capacity(vendors.len());
    for &vendor in vendors {
        tables.push(crawl(client, vendor, options)?);
    }
    let combined = PricingTable::concat(&tables);
    info!(vendors = vendors.len(), rows = combined.len(), "combined tables");
    Ok(combined)
}

/// Emit `table` through every selected output.
pub fn render(table: &PricingTable, outputs: &Outputs) -> Result<()> {
    if outputs.print {
        let stdout = io::stdout();
        export::print_table(table, &mut stdout.lock())?;
    }
    if let Some(path) = &outputs.csv {
        export::save_csv(table, path)
            .with_context(|| format!("saving {}", path.display()))?;
        info!(path = %path.display(), rows = table.len(), "wrote CSV");
    }
    if let Some(path) = &outputs.json {
        export::save_json(table, path)
            .with_context(|| format!("saving {}", path.display()))?;
        info!(path = %path.display(), rows = table.len(), "wrote JSON");
    }
    Ok(())
}
