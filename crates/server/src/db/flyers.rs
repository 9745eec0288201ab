//! Stored flyer repository.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use dona_oferta_core::{FlyerId, SupermarketId};

use super::RepositoryError;
use crate::models::{Flyer, FlyerWithMarket, NewFlyer};
use crate::models::flyer::MarketName;

/// Database row for a flyer joined with its supermarket name.
#[derive(sqlx::FromRow)]
struct FlyerWithMarketRow {
    id: FlyerId,
    supermarket_id: SupermarketId,
    flyer_date: NaiveDate,
    storage_url: String,
    created_at: DateTime<Utc>,
    supermarket_name: String,
}

impl From<FlyerWithMarketRow> for FlyerWithMarket {
    fn from(row: FlyerWithMarketRow) -> Self {
        Self {
            flyer: Flyer {
                id: row.id,
                supermarket_id: row.supermarket_id,
                flyer_date: row.flyer_date,
                storage_url: row.storage_url,
                created_at: row.created_at,
            },
            supermarket: MarketName {
                nome: row.supermarket_name,
            },
        }
    }
}

/// Repository for stored flyer database operations.
pub struct FlyerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> FlyerRepository<'a> {
    /// Create a new flyer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Register a flyer unless one already exists for this supermarket and
    /// date.
    ///
    /// Returns `true` when a row was inserted, `false` when the (supermarket,
    /// date) pair was already registered. The unique constraint makes this
    /// idempotent even under concurrent ingestion.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn register_if_absent(&self, new: &NewFlyer) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO stored_flyers (supermarket_id, flyer_date, storage_url) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (supermarket_id, flyer_date) DO NOTHING",
        )
        .bind(new.supermarket_id)
        .bind(new.flyer_date)
        .bind(&new.storage_url)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Load the newest flyers for a set of supermarkets, by flyer date.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn latest_for_markets(
        &self,
        supermarkets: &[SupermarketId],
        limit: i64,
    ) -> Result<Vec<FlyerWithMarket>, RepositoryError> {
        let ids: Vec<i32> = supermarkets.iter().map(|id| id.as_i32()).collect();

        let rows = sqlx::query_as::<_, FlyerWithMarketRow>(
            "SELECT f.id, f.supermarket_id, f.flyer_date, f.storage_url, f.created_at, \
                    s.name AS supermarket_name \
             FROM stored_flyers f \
             JOIN supermarkets s ON s.id = f.supermarket_id \
             WHERE f.supermarket_id = ANY($1) \
             ORDER BY f.flyer_date DESC \
             LIMIT $2",
        )
        .bind(&ids)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(FlyerWithMarket::from).collect())
    }
}
