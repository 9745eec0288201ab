//! Supermarket management commands.
//!
//! Supermarkets are administrative data: the API matches against them but
//! never creates them. `add` registers one with its CEP coverage range,
//! `list` shows what is registered.

use tracing::info;

use dona_oferta_core::{ExtractionMode, PostalCode};
use dona_oferta_server::db::SupermarketRepository;
use dona_oferta_server::models::NewSupermarket;

/// Register a new supermarket.
///
/// The CEP bounds accept the same formats as user registration (digits with
/// optional separators) and must form a non-inverted range.
///
/// # Errors
///
/// Returns an error if the arguments are invalid or the insert fails.
pub async fn add(
    name: &str,
    region: &str,
    range_start: &str,
    range_end: &str,
    mode: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = PostalCode::parse(range_start)?;
    let end = PostalCode::parse(range_end)?;
    if start.as_i32() > end.as_i32() {
        return Err(format!("inverted CEP range: {start} > {end}").into());
    }
    let extraction_mode: ExtractionMode = mode.parse()?;

    let pool = super::connect().await?;

    let new = NewSupermarket {
        name: name.to_owned(),
        region: region.to_owned(),
        postal_range_start: start.as_i32(),
        postal_range_end: end.as_i32(),
        extraction_mode,
    };
    let market = SupermarketRepository::new(&pool).create(&new).await?;

    info!(
        "Registered supermarket #{}: {} ({}, CEP {} - {}, {})",
        market.id, market.name, market.region, start, end, market.extraction_mode
    );
    Ok(())
}

/// List registered supermarkets.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn list() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    let markets = SupermarketRepository::new(&pool).list().await?;
    if markets.is_empty() {
        info!("No supermarkets registered");
        return Ok(());
    }

    for market in markets {
        info!(
            "#{} {} | {} | CEP {:08} - {:08} | {}",
            market.id,
            market.name,
            market.region,
            market.postal_range_start,
            market.postal_range_end,
            market.extraction_mode
        );
    }
    Ok(())
}
