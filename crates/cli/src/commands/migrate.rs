//! Database migration command.
//!
//! Runs the server's migrations from `crates/server/migrations/`, embedded
//! at compile time.

use tracing::info;

/// Run database migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    info!("Connected to database");

    info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    info!("Migrations complete!");
    Ok(())
}
