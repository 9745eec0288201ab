//! Supermarket repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use dona_oferta_core::{ExtractionMode, PostalCode, SupermarketId};

use super::RepositoryError;
use crate::models::{NewSupermarket, Supermarket};

/// Database row for a supermarket.
#[derive(sqlx::FromRow)]
struct SupermarketRow {
    id: SupermarketId,
    name: String,
    region: String,
    postal_range_start: i32,
    postal_range_end: i32,
    extraction_mode: String,
    created_at: DateTime<Utc>,
}

impl SupermarketRow {
    fn into_supermarket(self) -> Result<Supermarket, RepositoryError> {
        let extraction_mode: ExtractionMode = self.extraction_mode.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid extraction mode in database: {e}"))
        })?;

        Ok(Supermarket {
            id: self.id,
            name: self.name,
            region: self.region,
            postal_range_start: self.postal_range_start,
            postal_range_end: self.postal_range_end,
            extraction_mode,
            created_at: self.created_at,
        })
    }
}

const SELECT_COLUMNS: &str = "id, name, region, postal_range_start, postal_range_end, \
                              extraction_mode, created_at";

/// Repository for supermarket database operations.
pub struct SupermarketRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SupermarketRepository<'a> {
    /// Create a new supermarket repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a supermarket by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored extraction
    /// mode is invalid.
    pub async fn get(&self, id: SupermarketId) -> Result<Option<Supermarket>, RepositoryError> {
        let row = sqlx::query_as::<_, SupermarketRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM supermarkets WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(SupermarketRow::into_supermarket).transpose()
    }

    /// Find every supermarket whose coverage range contains the postal code.
    ///
    /// An empty result is a valid outcome meaning the region is not covered.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` on invalid stored data.
    pub async fn serving(&self, code: PostalCode) -> Result<Vec<Supermarket>, RepositoryError> {
        let rows = sqlx::query_as::<_, SupermarketRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM supermarkets \
             WHERE postal_range_start <= $1 AND postal_range_end >= $1 \
             ORDER BY id"
        ))
        .bind(code)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(SupermarketRow::into_supermarket)
            .collect()
    }

    /// List all supermarkets.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` on invalid stored data.
    pub async fn list(&self) -> Result<Vec<Supermarket>, RepositoryError> {
        let rows = sqlx::query_as::<_, SupermarketRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM supermarkets ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(SupermarketRow::into_supermarket)
            .collect()
    }

    /// Register a new supermarket (admin CLI).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails, including
    /// when the range check constraint rejects an inverted range.
    pub async fn create(&self, new: &NewSupermarket) -> Result<Supermarket, RepositoryError> {
        let row = sqlx::query_as::<_, SupermarketRow>(&format!(
            "INSERT INTO supermarkets \
                 (name, region, postal_range_start, postal_range_end, extraction_mode) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(&new.name)
        .bind(&new.region)
        .bind(new.postal_range_start)
        .bind(new.postal_range_end)
        .bind(new.extraction_mode.to_string())
        .fetch_one(self.pool)
        .await?;

        row.into_supermarket()
    }
}
