//! Personalized offer building: eligibility, selection and rendering.

use chrono::Utc;
use sqlx::PgPool;

use dona_oferta_core::{DeliveryFormat, Phone};

use crate::db::{FlyerRepository, OfferRepository, RepositoryError, UserRepository};
use crate::models::{FlyerWithMarket, OfferWithMarket};

/// How many valid offers are considered per request.
pub const OFFER_LIMIT: i64 = 20;

/// How many flyers a pdf-format user receives.
pub const FLYER_LIMIT: i64 = 3;

/// How many offers are rendered per supermarket group in a text message.
pub const GROUP_RENDER_CAP: usize = 5;

const MESSAGE_HEADER: &str = "🛒 *Ofertas Especiais para Você!*\n\n";
const MESSAGE_FOOTER: &str = "✨ _Dona Oferta - Economize sempre!_";

/// Outcome of building a personalized payload.
///
/// Every variant is a legitimate business result; delivery mechanics are the
/// caller's problem.
#[derive(Debug)]
pub enum PersonalizationOutcome {
    /// A rendered WhatsApp text message.
    TextMessage { message: String, total_offers: usize },
    /// Flyer references for pdf-format users, newest first.
    FlyerList {
        flyers: Vec<FlyerWithMarket>,
        total_offers: usize,
    },
    /// No active user with this phone number.
    UserNotFound,
    /// Trial window closed; the user record is left untouched.
    TrialExpired,
    /// No valid offer for the user's subscribed supermarkets.
    NoOffers,
    /// The stored preferred format is not one we can render.
    UnsupportedFormat { stored: String },
}

/// Build the personalized offer payload for one user.
///
/// Each call is a fresh evaluation: resolve the active user, gate on trial
/// expiry, load the newest valid offers for their subscription snapshot, and
/// render per their preferred format.
///
/// # Errors
///
/// Returns `RepositoryError` only for store failures.
pub async fn build_personalized_offers(
    pool: &PgPool,
    phone: &Phone,
) -> Result<PersonalizationOutcome, RepositoryError> {
    let Some(user) = UserRepository::new(pool).get_active_by_phone(phone).await? else {
        tracing::info!(phone = %phone, "Personalization: no active user");
        return Ok(PersonalizationOutcome::UserNotFound);
    };

    let now = Utc::now();
    if user.trial_expired(now) {
        tracing::info!(user_id = %user.id, "Personalization: trial expired");
        return Ok(PersonalizationOutcome::TrialExpired);
    }

    let offers = OfferRepository::new(pool)
        .current_for_markets(&user.subscribed_supermarkets, now.date_naive(), OFFER_LIMIT)
        .await?;
    if offers.is_empty() {
        return Ok(PersonalizationOutcome::NoOffers);
    }
    let total_offers = offers.len();

    match user.delivery_format() {
        Some(DeliveryFormat::Text) => Ok(PersonalizationOutcome::TextMessage {
            message: render_text_message(&offers),
            total_offers,
        }),
        Some(DeliveryFormat::Pdf) => {
            let flyers = FlyerRepository::new(pool)
                .latest_for_markets(&user.subscribed_supermarkets, FLYER_LIMIT)
                .await?;
            Ok(PersonalizationOutcome::FlyerList {
                flyers,
                total_offers,
            })
        }
        None => Ok(PersonalizationOutcome::UnsupportedFormat {
            stored: user.preferred_format,
        }),
    }
}

/// Group offers by supermarket name, preserving first-appearance order.
///
/// A deterministic transform: offers arrive newest-first, so each group's
/// internal order stays newest-first and the group order follows the first
/// offer seen per supermarket.
fn group_by_market(offers: &[OfferWithMarket]) -> Vec<(&str, Vec<&OfferWithMarket>)> {
    let mut groups: Vec<(&str, Vec<&OfferWithMarket>)> = Vec::new();
    for item in offers {
        match groups
            .iter_mut()
            .find(|(name, _)| *name == item.supermarket_name.as_str())
        {
            Some((_, members)) => members.push(item),
            None => groups.push((item.supermarket_name.as_str(), vec![item])),
        }
    }
    groups
}

/// Render the WhatsApp text message for a set of offers.
///
/// Offers are grouped per supermarket; each group renders at most
/// [`GROUP_RENDER_CAP`] lines of product, price (two decimal places) and
/// localized validity date.
fn render_text_message(offers: &[OfferWithMarket]) -> String {
    let mut message = String::from(MESSAGE_HEADER);

    for (market, members) in group_by_market(offers) {
        message.push_str(&format!("🏪 *{market}*\n"));
        for item in members.iter().take(GROUP_RENDER_CAP) {
            let validity = item.offer.valid_until.format("%d/%m/%Y");
            message.push_str(&format!("• {}\n", item.offer.product_name));
            message.push_str(&format!("  💰 `R$ {:.2}`\n", item.offer.price));
            message.push_str(&format!("  📅 Válido até {validity}\n\n"));
        }
        message.push('\n');
    }

    message.push_str(MESSAGE_FOOTER);
    message
}
