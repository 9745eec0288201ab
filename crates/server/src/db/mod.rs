//! Database operations for the Dona Oferta `PostgreSQL` store.
//!
//! # Tables
//!
//! - `supermarkets` - coverage ranges and extraction modes
//! - `users` - WhatsApp users with their subscription snapshot
//! - `offers` - scraped offers, purged by the 7-day retention policy
//! - `stored_flyers` - registered flyer documents for pdf-mode supermarkets
//!
//! Queries use the runtime `sqlx::query`/`query_as` API with bound
//! parameters; rows decode into plain row structs that are converted to the
//! domain types in [`crate::models`], reporting invalid stored data as
//! [`RepositoryError::DataCorruption`].
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p dona-oferta-cli -- migrate
//! ```

pub mod flyers;
pub mod offers;
pub mod supermarkets;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use flyers::FlyerRepository;
pub use offers::{IngestionLock, OfferRepository};
pub use supermarkets::SupermarketRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate phone number).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
