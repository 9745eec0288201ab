//! Shared helpers for Dona Oferta integration tests.
//!
//! The tests in `tests/` drive a running server over HTTP and seed fixture
//! data straight into `PostgreSQL`. Nothing here runs in a plain
//! `cargo test`; every test is `#[ignore]`d until a server and database are
//! available.

#![cfg_attr(not(test), forbid(unsafe_code))]

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("SERVER_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Connect to the test database for seeding fixtures.
///
/// # Panics
///
/// Panics if no database URL is configured or the connection fails; these
/// tests cannot run without one.
pub async fn test_pool() -> PgPool {
    dotenvy::dotenv().ok();

    let url = std::env::var("DONA_OFERTA_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .expect("DONA_OFERTA_DATABASE_URL must be set for integration tests");

    PgPool::connect(url.expose_secret())
        .await
        .expect("Failed to connect to test database")
}

/// Insert a supermarket fixture, returning its id.
pub async fn seed_supermarket(
    pool: &PgPool,
    name: &str,
    range_start: i32,
    range_end: i32,
    extraction_mode: &str,
) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO supermarkets (name, region, postal_range_start, postal_range_end, extraction_mode) \
         VALUES ($1, 'Test Region', $2, $3, $4) RETURNING id",
    )
    .bind(name)
    .bind(range_start)
    .bind(range_end)
    .bind(extraction_mode)
    .fetch_one(pool)
    .await
    .expect("Failed to seed supermarket")
}

/// Remove a supermarket fixture; offers and flyers cascade.
pub async fn delete_supermarket(pool: &PgPool, id: i32) {
    let _ = sqlx::query("DELETE FROM supermarkets WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await;
}

/// Remove a user fixture by phone.
pub async fn delete_user(pool: &PgPool, phone: &str) {
    let _ = sqlx::query("DELETE FROM users WHERE phone = $1")
        .bind(phone)
        .execute(pool)
        .await;
}
