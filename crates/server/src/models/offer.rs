//! Offer domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use dona_oferta_core::{OfferId, SupermarketId};

/// A single scraped product offer.
#[derive(Debug, Clone)]
pub struct Offer {
    pub id: OfferId,
    pub supermarket_id: SupermarketId,
    pub product_name: String,
    /// Non-negative price in BRL.
    pub price: Decimal,
    /// First day the offer is valid, inclusive.
    pub valid_from: NaiveDate,
    /// Last day the offer is valid, inclusive.
    pub valid_until: NaiveDate,
    /// When the extraction collaborator captured the offer.
    pub extracted_at: DateTime<Utc>,
    /// When the row was inserted; drives the retention purge.
    pub created_at: DateTime<Utc>,
}

/// A validated offer ready for insertion.
#[derive(Debug, Clone)]
pub struct NewOffer {
    pub supermarket_id: SupermarketId,
    pub product_name: String,
    pub price: Decimal,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
    pub extracted_at: DateTime<Utc>,
}

/// An offer joined with its supermarket's display name, as loaded for
/// personalization.
#[derive(Debug, Clone)]
pub struct OfferWithMarket {
    pub offer: Offer,
    pub supermarket_name: String,
}
