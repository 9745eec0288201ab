//! Offer ingestion: retention purge, batch insert, flyer registration.

use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;

use dona_oferta_core::{ExtractionMode, SupermarketId};

use crate::db::{
    FlyerRepository, IngestionLock, OfferRepository, RepositoryError, SupermarketRepository,
};
use crate::models::{NewFlyer, NewOffer, Supermarket};

/// Offers older than this are purged on the next ingestion for their
/// supermarket, regardless of their own validity window.
pub const RETENTION_DAYS: i64 = 7;

/// A freshly extracted offer as delivered by the scraping collaborator.
///
/// Field names are the wire names. The price arrives as a string or a bare
/// number depending on the extractor, so it is validated per item rather
/// than at deserialization time; the dates likewise.
#[derive(Debug, Clone, Deserialize)]
pub struct RawOffer {
    pub nome_produto: String,
    pub preco: serde_json::Value,
    #[serde(default)]
    pub data_inicio_validade: Option<String>,
    #[serde(default)]
    pub data_fim_validade: Option<String>,
}

/// Why a single raw offer was rejected during mapping.
#[derive(Debug, Error)]
pub enum OfferValidationError {
    #[error("price is not a valid decimal: {0}")]
    InvalidPrice(String),
    #[error("price is negative: {0}")]
    NegativePrice(Decimal),
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("missing end-of-validity date")]
    MissingValidUntil,
    #[error("validity window is inverted: {0} > {1}")]
    InvertedWindow(NaiveDate, NaiveDate),
}

/// Outcome of an ingestion run.
#[derive(Debug)]
pub enum IngestionOutcome {
    /// The batch was processed (possibly with individual items skipped).
    Processed(IngestionReport),
    /// The supermarket does not exist; nothing was touched.
    SupermarketNotFound,
}

/// What an ingestion run did.
#[derive(Debug)]
pub struct IngestionReport {
    pub supermarket_name: String,
    /// Offers actually inserted.
    pub inserted: u64,
    /// Raw offers rejected by per-item validation.
    pub skipped: usize,
    /// Whether a flyer was registered for today.
    pub flyer_registered: bool,
}

/// Ingest a batch of freshly extracted offers for one supermarket.
///
/// Purges the supermarket's offers older than [`RETENTION_DAYS`] (even when
/// the new batch is empty), inserts the valid part of the batch, and - for
/// pdf-mode supermarkets with a document URL - registers today's flyer once.
/// A per-supermarket advisory lock serializes overlapping runs.
///
/// The purge is best-effort: a purge failure is logged and ingestion
/// continues. An insert failure aborts the call without undoing the purge.
///
/// # Errors
///
/// Returns `RepositoryError` for store failures; an unknown supermarket is
/// the [`IngestionOutcome::SupermarketNotFound`] outcome, not an error.
pub async fn ingest_offers(
    pool: &PgPool,
    supermarket_id: SupermarketId,
    offers: Vec<RawOffer>,
    document_url: Option<String>,
) -> Result<IngestionOutcome, RepositoryError> {
    let Some(supermarket) = SupermarketRepository::new(pool).get(supermarket_id).await? else {
        tracing::info!(%supermarket_id, "Ingestion rejected: unknown supermarket");
        return Ok(IngestionOutcome::SupermarketNotFound);
    };

    tracing::info!(supermarket = %supermarket.name, batch = offers.len(), "Processing offers");

    let lock = IngestionLock::acquire(pool, supermarket.id).await?;
    let result = run_locked(pool, &supermarket, offers, document_url).await;
    lock.release().await;

    Ok(IngestionOutcome::Processed(result?))
}

/// The ingestion steps executed under the per-supermarket lock.
async fn run_locked(
    pool: &PgPool,
    supermarket: &Supermarket,
    offers: Vec<RawOffer>,
    document_url: Option<String>,
) -> Result<IngestionReport, RepositoryError> {
    let now = Utc::now();
    let today = now.date_naive();
    let offer_repo = OfferRepository::new(pool);

    // Retention first, unconditionally - it runs even for an empty batch.
    let cutoff = now - Duration::days(RETENTION_DAYS);
    match offer_repo.purge_older_than(supermarket.id, cutoff).await {
        Ok(purged) if purged > 0 => {
            tracing::info!(supermarket = %supermarket.name, purged, "Purged aged-out offers");
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(supermarket = %supermarket.name, error = %e, "Retention purge failed");
        }
    }

    let mut mapped = Vec::with_capacity(offers.len());
    let mut skipped = 0_usize;
    for (index, raw) in offers.iter().enumerate() {
        match map_raw_offer(raw, supermarket.id, today, now) {
            Ok(offer) => mapped.push(offer),
            Err(e) => {
                skipped += 1;
                tracing::warn!(
                    supermarket = %supermarket.name,
                    index,
                    product = %raw.nome_produto,
                    error = %e,
                    "Skipping invalid offer"
                );
            }
        }
    }

    let inserted = offer_repo.insert_batch(&mapped).await?;
    tracing::info!(supermarket = %supermarket.name, inserted, "Offers inserted");

    let mut flyer_registered = false;
    if let Some(url) = document_url
        && supermarket.extraction_mode == ExtractionMode::Pdf
    {
        let flyer = NewFlyer {
            supermarket_id: supermarket.id,
            flyer_date: today,
            storage_url: url,
        };
        // Same-day re-ingestion is a silent no-op; failures don't fail the batch
        match FlyerRepository::new(pool).register_if_absent(&flyer).await {
            Ok(registered) => {
                flyer_registered = registered;
                if registered {
                    tracing::info!(supermarket = %supermarket.name, "Flyer registered");
                }
            }
            Err(e) => {
                tracing::error!(supermarket = %supermarket.name, error = %e, "Flyer registration failed");
            }
        }
    }

    Ok(IngestionReport {
        supermarket_name: supermarket.name.clone(),
        inserted,
        skipped,
        flyer_registered,
    })
}

/// Validate one raw offer into an insertable record.
///
/// The price may be a JSON string or number; `data_inicio_validade` defaults
/// to today; `data_fim_validade` is required and must not precede the start.
fn map_raw_offer(
    raw: &RawOffer,
    supermarket_id: SupermarketId,
    today: NaiveDate,
    extracted_at: DateTime<Utc>,
) -> Result<NewOffer, OfferValidationError> {
    let price = parse_price(&raw.preco)?;
    if price.is_sign_negative() {
        return Err(OfferValidationError::NegativePrice(price));
    }

    let valid_from = match raw.data_inicio_validade.as_deref() {
        Some(s) => parse_date(s)?,
        None => today,
    };
    let valid_until = match raw.data_fim_validade.as_deref() {
        Some(s) => parse_date(s)?,
        None => return Err(OfferValidationError::MissingValidUntil),
    };

    if valid_from > valid_until {
        return Err(OfferValidationError::InvertedWindow(valid_from, valid_until));
    }

    Ok(NewOffer {
        supermarket_id,
        product_name: raw.nome_produto.clone(),
        price,
        valid_from,
        valid_until,
        extracted_at,
    })
}

fn parse_price(value: &serde_json::Value) -> Result<Decimal, OfferValidationError> {
    match value {
        serde_json::Value::String(s) => Decimal::from_str(s.trim())
            .map_err(|_| OfferValidationError::InvalidPrice(s.clone())),
        serde_json::Value::Number(n) => Decimal::from_str(&n.to_string())
            .map_err(|_| OfferValidationError::InvalidPrice(n.to_string())),
        other => Err(OfferValidationError::InvalidPrice(other.to_string())),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, OfferValidationError> {
    s.trim()
        .parse()
        .map_err(|_| OfferValidationError::InvalidDate(s.to_owned()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw(preco: serde_json::Value, inicio: Option<&str>, fim: Option<&str>) -> RawOffer {
        RawOffer {
            nome_produto: "Arroz 5kg".to_string(),
            preco,
            data_inicio_validade: inicio.map(String::from),
            data_fim_validade: fim.map(String::from),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 20).unwrap()
    }

    #[test]
    fn test_maps_string_price_and_required_fields() {
        let offer = map_raw_offer(
            &raw(json!("22.90"), None, Some("2025-01-31")),
            SupermarketId::new(1),
            today(),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(offer.product_name, "Arroz 5kg");
        assert_eq!(offer.price, Decimal::new(2290, 2));
        assert_eq!(offer.valid_from, today());
        assert_eq!(
            offer.valid_until,
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
        );
    }

    #[test]
    fn test_maps_numeric_price() {
        let offer = map_raw_offer(
            &raw(json!(9.99), None, Some("2025-01-31")),
            SupermarketId::new(1),
            today(),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(offer.price, Decimal::new(999, 2));
    }

    #[test]
    fn test_explicit_start_date_is_kept() {
        let offer = map_raw_offer(
            &raw(json!("5.50"), Some("2025-01-10"), Some("2025-01-31")),
            SupermarketId::new(1),
            today(),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(
            offer.valid_from,
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
        );
    }

    #[test]
    fn test_rejects_unparseable_price() {
        let err = map_raw_offer(
            &raw(json!("R$ vinte"), None, Some("2025-01-31")),
            SupermarketId::new(1),
            today(),
            Utc::now(),
        )
        .unwrap_err();

        assert!(matches!(err, OfferValidationError::InvalidPrice(_)));
    }

    #[test]
    fn test_rejects_negative_price() {
        let err = map_raw_offer(
            &raw(json!("-1.00"), None, Some("2025-01-31")),
            SupermarketId::new(1),
            today(),
            Utc::now(),
        )
        .unwrap_err();

        assert!(matches!(err, OfferValidationError::NegativePrice(_)));
    }

    #[test]
    fn test_rejects_missing_valid_until() {
        let err = map_raw_offer(
            &raw(json!("1.00"), None, None),
            SupermarketId::new(1),
            today(),
            Utc::now(),
        )
        .unwrap_err();

        assert!(matches!(err, OfferValidationError::MissingValidUntil));
    }

    #[test]
    fn test_rejects_inverted_window() {
        let err = map_raw_offer(
            &raw(json!("1.00"), Some("2025-02-01"), Some("2025-01-31")),
            SupermarketId::new(1),
            today(),
            Utc::now(),
        )
        .unwrap_err();

        assert!(matches!(err, OfferValidationError::InvertedWindow(_, _)));
    }

    #[test]
    fn test_rejects_bad_date() {
        let err = map_raw_offer(
            &raw(json!("1.00"), None, Some("31/01/2025")),
            SupermarketId::new(1),
            today(),
            Utc::now(),
        )
        .unwrap_err();

        assert!(matches!(err, OfferValidationError::InvalidDate(_)));
    }

    #[test]
    fn test_raw_offer_deserializes_wire_shape() {
        let raw: RawOffer = serde_json::from_value(json!({
            "nome_produto": "Feijão 1kg",
            "preco": "8.75",
            "data_fim_validade": "2025-01-31"
        }))
        .unwrap();

        assert_eq!(raw.nome_produto, "Feijão 1kg");
        assert!(raw.data_inicio_validade.is_none());
    }
}
