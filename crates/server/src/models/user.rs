//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use dona_oferta_core::{DeliveryFormat, Phone, Plan, PostalCode, SupermarketId, UserId};

/// A registered WhatsApp user.
///
/// `subscribed_supermarkets` is a snapshot of the supermarkets serving the
/// user's CEP at registration time; it is not re-evaluated when coverage
/// ranges change later.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// WhatsApp phone number; the contact identifier, unique across users.
    #[serde(rename = "telefone_whatsapp")]
    pub phone: Phone,
    /// The user's CEP.
    #[serde(rename = "cep")]
    pub postal_code: PostalCode,
    /// Optional CPF, stored as given.
    #[serde(rename = "cpf")]
    pub tax_id: Option<String>,
    /// Subscription plan.
    #[serde(rename = "plano")]
    pub plan: Plan,
    /// When the trial window closes. Only meaningful while `plan` is trial.
    #[serde(rename = "data_fim_trial")]
    pub trial_ends_at: DateTime<Utc>,
    /// Inactive users are invisible to personalization.
    #[serde(rename = "ativo")]
    pub active: bool,
    /// Preferred delivery format, as stored. Kept raw so an unknown value can
    /// be reported as an unsupported format instead of failing decode.
    #[serde(rename = "formato_oferta_preferido")]
    pub preferred_format: String,
    /// Snapshot of serving supermarkets taken at registration.
    #[serde(rename = "supermercados_preferidos")]
    pub subscribed_supermarkets: Vec<SupermarketId>,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether the trial window has closed for a trial-plan user.
    ///
    /// Always `false` for paid plans, whatever `trial_ends_at` says.
    #[must_use]
    pub fn trial_expired(&self, now: DateTime<Utc>) -> bool {
        self.plan.is_trial() && now > self.trial_ends_at
    }

    /// The user's delivery format, if the stored value is a known one.
    #[must_use]
    pub fn delivery_format(&self) -> Option<DeliveryFormat> {
        DeliveryFormat::parse(&self.preferred_format)
    }
}

/// Data for creating a new user at registration.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub phone: Phone,
    pub postal_code: PostalCode,
    pub tax_id: Option<String>,
    pub preferred_format: DeliveryFormat,
    pub trial_ends_at: DateTime<Utc>,
    pub subscribed_supermarkets: Vec<SupermarketId>,
}
