//! CLI command implementations.

pub mod migrate;
pub mod supermarket;

use secrecy::SecretString;
use sqlx::PgPool;

use dona_oferta_server::db;

/// Connect to the database using the server's environment configuration.
///
/// # Errors
///
/// Returns an error if the database URL is missing or the connection fails.
pub async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DONA_OFERTA_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "DONA_OFERTA_DATABASE_URL not set")?;

    Ok(db::create_pool(&database_url).await?)
}
