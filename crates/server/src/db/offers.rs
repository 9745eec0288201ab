//! Offer repository and the per-supermarket ingestion lock.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Connection, PgConnection, PgPool};

use dona_oferta_core::{OfferId, SupermarketId};

use super::RepositoryError;
use crate::models::{NewOffer, Offer, OfferWithMarket};

/// Advisory lock class for ingestion locks (first key of the two-int form).
const INGESTION_LOCK_CLASS: i32 = 0x6F66;

/// Database row for an offer joined with its supermarket name.
#[derive(sqlx::FromRow)]
struct OfferWithMarketRow {
    id: OfferId,
    supermarket_id: SupermarketId,
    product_name: String,
    price: Decimal,
    valid_from: NaiveDate,
    valid_until: NaiveDate,
    extracted_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    supermarket_name: String,
}

impl From<OfferWithMarketRow> for OfferWithMarket {
    fn from(row: OfferWithMarketRow) -> Self {
        Self {
            offer: Offer {
                id: row.id,
                supermarket_id: row.supermarket_id,
                product_name: row.product_name,
                price: row.price,
                valid_from: row.valid_from,
                valid_until: row.valid_until,
                extracted_at: row.extracted_at,
                created_at: row.created_at,
            },
            supermarket_name: row.supermarket_name,
        }
    }
}

/// Repository for offer database operations.
pub struct OfferRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OfferRepository<'a> {
    /// Create a new offer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Delete this supermarket's offers created before the cutoff.
    ///
    /// Retention is storage hygiene: it looks only at row age, never at the
    /// offers' own validity windows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn purge_older_than(
        &self,
        supermarket_id: SupermarketId,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM offers WHERE supermarket_id = $1 AND created_at < $2")
            .bind(supermarket_id)
            .bind(cutoff)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Bulk-insert a batch of offers, returning the number inserted.
    ///
    /// The batch goes in as a single multi-row insert, so a failure inserts
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert_batch(&self, offers: &[NewOffer]) -> Result<u64, RepositoryError> {
        if offers.is_empty() {
            return Ok(0);
        }

        let mut supermarket_ids = Vec::with_capacity(offers.len());
        let mut product_names = Vec::with_capacity(offers.len());
        let mut prices = Vec::with_capacity(offers.len());
        let mut valid_froms = Vec::with_capacity(offers.len());
        let mut valid_untils = Vec::with_capacity(offers.len());
        let mut extracted_ats = Vec::with_capacity(offers.len());

        for offer in offers {
            supermarket_ids.push(offer.supermarket_id.as_i32());
            product_names.push(offer.product_name.clone());
            prices.push(offer.price);
            valid_froms.push(offer.valid_from);
            valid_untils.push(offer.valid_until);
            extracted_ats.push(offer.extracted_at);
        }

        let result = sqlx::query(
            "INSERT INTO offers \
                 (supermarket_id, product_name, price, valid_from, valid_until, extracted_at) \
             SELECT * FROM UNNEST \
                 ($1::integer[], $2::text[], $3::numeric[], $4::date[], $5::date[], \
                  $6::timestamptz[])",
        )
        .bind(&supermarket_ids)
        .bind(&product_names)
        .bind(&prices)
        .bind(&valid_froms)
        .bind(&valid_untils)
        .bind(&extracted_ats)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Load the newest still-valid offers for a set of supermarkets.
    ///
    /// Validity means `valid_until >= today`; rows come back newest-first by
    /// creation time, capped at `limit`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn current_for_markets(
        &self,
        supermarkets: &[SupermarketId],
        today: NaiveDate,
        limit: i64,
    ) -> Result<Vec<OfferWithMarket>, RepositoryError> {
        let ids: Vec<i32> = supermarkets.iter().map(|id| id.as_i32()).collect();

        let rows = sqlx::query_as::<_, OfferWithMarketRow>(
            "SELECT o.id, o.supermarket_id, o.product_name, o.price, o.valid_from, \
                    o.valid_until, o.extracted_at, o.created_at, s.name AS supermarket_name \
             FROM offers o \
             JOIN supermarkets s ON s.id = o.supermarket_id \
             WHERE o.supermarket_id = ANY($1) AND o.valid_until >= $2 \
             ORDER BY o.created_at DESC \
             LIMIT $3",
        )
        .bind(&ids)
        .bind(today)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(OfferWithMarket::from).collect())
    }
}

/// Per-supermarket advisory lock serializing overlapping ingestion runs.
///
/// The lock is taken on a connection detached from the pool, so dropping the
/// guard (on any path, including panics) closes the session and releases the
/// lock. Ingestion for different supermarkets proceeds in parallel.
pub struct IngestionLock {
    conn: PgConnection,
}

impl IngestionLock {
    /// Block until the lock for this supermarket is acquired.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if no connection can be acquired
    /// or the lock query fails.
    pub async fn acquire(
        pool: &PgPool,
        supermarket_id: SupermarketId,
    ) -> Result<Self, RepositoryError> {
        let mut conn = pool.acquire().await?.detach();

        sqlx::query("SELECT pg_advisory_lock($1, $2)")
            .bind(INGESTION_LOCK_CLASS)
            .bind(supermarket_id.as_i32())
            .execute(&mut conn)
            .await?;

        Ok(Self { conn })
    }

    /// Release the lock and close its connection.
    ///
    /// Failures are ignored; closing the session releases the lock anyway.
    pub async fn release(mut self) {
        let _ = sqlx::query("SELECT pg_advisory_unlock_all()")
            .execute(&mut self.conn)
            .await;
        let _ = self.conn.close().await;
    }
}
