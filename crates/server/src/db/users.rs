//! User repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use dona_oferta_core::{Phone, Plan, PostalCode, SupermarketId, UserId};

use super::RepositoryError;
use crate::models::{NewUser, User};

/// Database row for a user.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    phone: String,
    postal_code: PostalCode,
    tax_id: Option<String>,
    plan: String,
    trial_ends_at: DateTime<Utc>,
    active: bool,
    preferred_format: String,
    subscribed_supermarkets: Vec<SupermarketId>,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        let phone = Phone::parse(&self.phone).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid phone in database: {e}"))
        })?;

        let plan: Plan = self.plan.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid plan in database: {e}"))
        })?;

        Ok(User {
            id: self.id,
            phone,
            postal_code: self.postal_code,
            tax_id: self.tax_id,
            plan,
            trial_ends_at: self.trial_ends_at,
            active: self.active,
            // Kept raw; an unknown stored format is a business outcome, not corruption
            preferred_format: self.preferred_format,
            subscribed_supermarkets: self.subscribed_supermarkets,
            created_at: self.created_at,
        })
    }
}

const SELECT_COLUMNS: &str = "id, phone, postal_code, tax_id, plan, trial_ends_at, active, \
                              preferred_format, subscribed_supermarkets, created_at";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by phone number, regardless of active state.
    ///
    /// Used by registration to detect duplicates: an inactive user still
    /// holds their phone number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` on invalid stored data.
    pub async fn get_by_phone(&self, phone: &Phone) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM users WHERE phone = $1"
        ))
        .bind(phone)
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Get an active user by phone number.
    ///
    /// Personalization only sees active users; a deactivated user resolves to
    /// `None` here, like a missing one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` on invalid stored data.
    pub async fn get_active_by_phone(
        &self,
        phone: &Phone,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM users WHERE phone = $1 AND active = TRUE"
        ))
        .bind(phone)
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Create a new user.
    ///
    /// New users always start on the trial plan, active, with the
    /// subscription snapshot computed by the caller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the phone number is already
    /// registered. Returns `RepositoryError::Database` for other database
    /// errors.
    pub async fn create(&self, new: &NewUser) -> Result<User, RepositoryError> {
        let subscribed: Vec<i32> = new
            .subscribed_supermarkets
            .iter()
            .map(|id| id.as_i32())
            .collect();

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users \
                 (phone, postal_code, tax_id, plan, trial_ends_at, active, \
                  preferred_format, subscribed_supermarkets) \
             VALUES ($1, $2, $3, $4, $5, TRUE, $6, $7) \
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(&new.phone)
        .bind(new.postal_code)
        .bind(&new.tax_id)
        .bind(Plan::Trial.to_string())
        .bind(new.trial_ends_at)
        .bind(new.preferred_format.as_str())
        .bind(&subscribed)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("phone number already registered".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.into_user()
    }
}
