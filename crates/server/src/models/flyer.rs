//! Stored flyer (encarte) domain types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use dona_oferta_core::{FlyerId, SupermarketId};

/// A registered flyer document for one supermarket on one date.
///
/// The binary itself lives in the blob store; only the opaque storage URL is
/// kept here.
#[derive(Debug, Clone, Serialize)]
pub struct Flyer {
    pub id: FlyerId,
    #[serde(rename = "supermercado_id")]
    pub supermarket_id: SupermarketId,
    #[serde(rename = "data_encarte")]
    pub flyer_date: NaiveDate,
    #[serde(rename = "url_storage")]
    pub storage_url: String,
    pub created_at: DateTime<Utc>,
}

/// Data for registering a new flyer during ingestion.
#[derive(Debug, Clone)]
pub struct NewFlyer {
    pub supermarket_id: SupermarketId,
    pub flyer_date: NaiveDate,
    pub storage_url: String,
}

/// A flyer joined with its supermarket's display name, as returned to
/// pdf-format users.
#[derive(Debug, Clone, Serialize)]
pub struct FlyerWithMarket {
    #[serde(flatten)]
    pub flyer: Flyer,
    #[serde(rename = "supermercado")]
    pub supermarket: MarketName,
}

/// Nested supermarket name object on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct MarketName {
    pub nome: String,
}
