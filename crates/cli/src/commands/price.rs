use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::commands::CommandResult;
use aluquote_core::config::{AppConfig, LoadOptions};
use aluquote_core::domain::catalog::Catalog;
use aluquote_core::domain::series::{AreaRateTable, SeriesTier};
use aluquote_core::pricing::cart::{AddItemRequest, QuotationCart};
use aluquote_core::pricing::summary::summarize;
use aluquote_db::{connect_with_settings, fixtures, CatalogRepository, SqlCatalogRepository};

/// On-disk cart shape. Items are applied in file order.
#[derive(Debug, Deserialize)]
struct CartFile {
    series_tier: Option<SeriesTier>,
    wastage_percent: Option<Decimal>,
    discount_percent: Option<Decimal>,
    tax_percent: Option<Decimal>,
    items: Vec<AddItemRequest>,
}

pub fn run(cart_path: &Path, demo: bool) -> CommandResult {
    let raw = match fs::read_to_string(cart_path) {
        Ok(raw) => raw,
        Err(error) => {
            return CommandResult::failure(
                "price",
                "cart_file",
                format!("could not read {}: {error}", cart_path.display()),
                2,
            );
        }
    };
    let cart_file: CartFile = match serde_json::from_str(&raw) {
        Ok(cart_file) => cart_file,
        Err(error) => {
            return CommandResult::failure(
                "price",
                "cart_parse",
                format!("invalid cart file: {error}"),
                2,
            );
        }
    };

    let catalog = if demo {
        Catalog::new(fixtures::demo_catalog())
    } else {
        match load_catalog_from_database() {
            Ok(catalog) => catalog,
            Err((error_class, message, exit_code)) => {
                return CommandResult::failure("price", error_class, message, exit_code);
            }
        }
    };

    match price_cart(&catalog, cart_file) {
        Ok(output) => CommandResult::success("price", output),
        Err(message) => CommandResult::failure("price", "pricing", message, 6),
    }
}

fn price_cart(catalog: &Catalog, cart_file: CartFile) -> Result<String, String> {
    let rates = AreaRateTable::default();
    let mut cart = QuotationCart::new();

    if let Some(tier) = cart_file.series_tier {
        cart.set_series_tier(&rates, tier).map_err(|error| error.to_string())?;
    }
    if let Some(percent) = cart_file.wastage_percent {
        cart.set_wastage_percent(percent).map_err(|error| error.to_string())?;
    }
    if let Some(percent) = cart_file.discount_percent {
        cart.set_discount_percent(percent).map_err(|error| error.to_string())?;
    }
    if let Some(percent) = cart_file.tax_percent {
        cart.set_tax_percent(percent).map_err(|error| error.to_string())?;
    }
    for request in cart_file.items {
        cart.add_item(catalog, &rates, request).map_err(|error| error.to_string())?;
    }

    let payload = serde_json::json!({
        "items": cart.items(),
        "summary": summarize(&cart),
    });
    serde_json::to_string_pretty(&payload).map_err(|error| error.to_string())
}

fn load_catalog_from_database() -> Result<Catalog, (&'static str, String, u8)> {
    let config = AppConfig::load(LoadOptions::default())
        .map_err(|error| ("config_validation", format!("configuration issue: {error}"), 3u8))?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| {
            ("runtime_init", format!("failed to initialize async runtime: {error}"), 3u8)
        })?;

    runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        let repository = SqlCatalogRepository::new(pool.clone());
        let items =
            repository.list().await.map_err(|error| ("catalog_load", error.to_string(), 5u8))?;
        pool.close().await;
        Ok(Catalog::new(items))
    })
}
