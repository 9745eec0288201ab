//! User registration.

use chrono::{Duration, Utc};
use sqlx::PgPool;

use dona_oferta_core::{DeliveryFormat, Phone, PostalCode};

use crate::db::{RepositoryError, SupermarketRepository, UserRepository};
use crate::models::{NewUser, Supermarket, User};

/// Length of the free trial granted at registration.
pub const TRIAL_PERIOD_DAYS: i64 = 60;

/// Outcome of a registration attempt.
#[derive(Debug)]
pub enum RegistrationOutcome {
    /// A new user was created.
    Registered {
        user: User,
        /// The supermarkets serving the user's CEP, now their subscription
        /// snapshot.
        available: Vec<Supermarket>,
    },
    /// The phone number is already registered. The existing record is
    /// returned untouched; duplicates are reported, never merged.
    AlreadyRegistered { existing: User },
    /// No supermarket covers the CEP; nothing was created.
    UncoveredRegion { postal_code: PostalCode },
}

/// Register a new WhatsApp user.
///
/// Looks up the phone number, matches the CEP against supermarket coverage
/// ranges, and creates the user with a fresh trial window and the coverage
/// snapshot as their subscribed set.
///
/// # Errors
///
/// Returns `RepositoryError` only for store failures; every business result
/// is a [`RegistrationOutcome`].
pub async fn register_user(
    pool: &PgPool,
    phone: Phone,
    postal_code: PostalCode,
    tax_id: Option<String>,
    preferred_format: Option<DeliveryFormat>,
) -> Result<RegistrationOutcome, RepositoryError> {
    let users = UserRepository::new(pool);

    if let Some(existing) = users.get_by_phone(&phone).await? {
        tracing::info!(phone = %phone, "Registration rejected: already registered");
        return Ok(RegistrationOutcome::AlreadyRegistered { existing });
    }

    let available = SupermarketRepository::new(pool)
        .serving(postal_code)
        .await?;
    if available.is_empty() {
        tracing::info!(cep = %postal_code, "Registration rejected: uncovered region");
        return Ok(RegistrationOutcome::UncoveredRegion { postal_code });
    }

    let new_user = NewUser {
        phone,
        postal_code,
        tax_id,
        preferred_format: preferred_format.unwrap_or_default(),
        trial_ends_at: Utc::now() + Duration::days(TRIAL_PERIOD_DAYS),
        subscribed_supermarkets: available.iter().map(|m| m.id).collect(),
    };

    match users.create(&new_user).await {
        Ok(user) => {
            tracing::info!(
                user_id = %user.id,
                supermarkets = available.len(),
                "User registered"
            );
            Ok(RegistrationOutcome::Registered { user, available })
        }
        // Lost a race against a concurrent registration for the same phone;
        // report the record that won, same as the up-front check would have.
        Err(RepositoryError::Conflict(_)) => match users.get_by_phone(&new_user.phone).await? {
            Some(existing) => Ok(RegistrationOutcome::AlreadyRegistered { existing }),
            None => Err(RepositoryError::Conflict(
                "phone registered concurrently but not found".to_owned(),
            )),
        },
        Err(e) => Err(e),
    }
}
