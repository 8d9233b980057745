//! Catalog listing command
//!
//! Prints the options a guided conversation offers: the genres and tags
//! fetched from the remote catalog followed by the fixed platform families.

use crate::catalog::{platform_options, CatalogLoader, HttpCatalogLoader, SelectionOption};
use crate::config::Config;
use crate::error::{GameScoutError, Result};
use prettytable::{cell, row, Table};
use std::time::Duration;

/// List the selectable options
///
/// # Arguments
///
/// * `config` - Configuration containing the catalog endpoint
/// * `json` - Print JSON instead of a table
///
/// # Errors
///
/// Returns `GameScoutError::CatalogLoad` if the catalog cannot be fetched
///
/// # Examples
///
/// ```no_run
/// use gamescout::config::Config;
/// use gamescout::commands::catalog::list_catalog;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::default();
/// list_catalog(&config, false).await?;
/// # Ok(())
/// # }
/// ```
pub async fn list_catalog(config: &Config, json: bool) -> Result<()> {
    let timeout = Duration::from_secs(config.gateway.timeout_seconds);
    let loader = HttpCatalogLoader::new(config.catalog_settings(), timeout)?;

    tracing::info!("Listing option catalog from {}", loader.endpoint());

    let options = collect_options(&loader).await?;

    if json {
        output_options_json(&options)?;
    } else {
        output_options_table(&options);
    }
    Ok(())
}

/// Catalog options followed by the platform families
pub async fn collect_options(loader: &dyn CatalogLoader) -> Result<Vec<SelectionOption>> {
    let mut options = loader.load().await?;
    options.extend(platform_options());
    Ok(options)
}

fn output_options_json(options: &[SelectionOption]) -> Result<()> {
    let json = serde_json::to_string_pretty(options).map_err(GameScoutError::Serialization)?;
    println!("{}", json);
    Ok(())
}

fn output_options_table(options: &[SelectionOption]) {
    if options.is_empty() {
        println!("No options available");
        return;
    }

    let mut table = Table::new();
    table.add_row(row!["Name", "Slug", "Kind", "Code"]);
    for option in options {
        let code = option
            .code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(row![option.name, option.slug, option.kind, code]);
    }

    println!("\nSelectable options ({}):\n", options.len());
    table.printstd();
    println!();
}
