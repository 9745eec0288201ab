//! Personalized offers endpoint (`POST /ofertas-personalizadas`).

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use dona_oferta_core::Phone;

use crate::error::AppError;
use crate::models::FlyerWithMarket;
use crate::services::personalization::{self, PersonalizationOutcome};
use crate::state::AppState;

/// Personalization request body.
#[derive(Debug, Deserialize)]
pub struct PersonalizedOffersRequest {
    pub telefone_usuario: String,
}

/// Personalization response bodies (reference wire shapes).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PersonalizedOffersResponse {
    Text {
        success: bool,
        formato: &'static str,
        mensagem: String,
        total_ofertas: usize,
    },
    Pdf {
        success: bool,
        formato: &'static str,
        encartes: Vec<FlyerWithMarket>,
        total_ofertas: usize,
    },
    TrialExpired {
        success: bool,
        message: String,
        trial_expirado: bool,
    },
    Denied {
        success: bool,
        message: String,
    },
}

/// Build the personalized offer payload for one user.
///
/// Missing/inactive users, expired trials, empty offer sets and unsupported
/// stored formats are all HTTP 200 business failures the bot branches on.
///
/// # Errors
///
/// Returns `AppError` for invalid request bodies and store failures.
#[instrument(skip_all)]
pub async fn build(
    State(state): State<AppState>,
    payload: Result<Json<PersonalizedOffersRequest>, JsonRejection>,
) -> Result<Json<PersonalizedOffersResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::InvalidRequest(e.body_text()))?;

    let phone = Phone::parse(&request.telefone_usuario)
        .map_err(|e| AppError::InvalidRequest(e.to_string()))?;

    let outcome = personalization::build_personalized_offers(state.pool(), &phone).await?;

    let response = match outcome {
        PersonalizationOutcome::TextMessage {
            message,
            total_offers,
        } => PersonalizedOffersResponse::Text {
            success: true,
            formato: "texto",
            mensagem: message,
            total_ofertas: total_offers,
        },
        PersonalizationOutcome::FlyerList {
            flyers,
            total_offers,
        } => PersonalizedOffersResponse::Pdf {
            success: true,
            formato: "pdf",
            encartes: flyers,
            total_ofertas: total_offers,
        },
        PersonalizationOutcome::UserNotFound => PersonalizedOffersResponse::Denied {
            success: false,
            message: "Usuário não encontrado ou inativo".to_string(),
        },
        PersonalizationOutcome::TrialExpired => PersonalizedOffersResponse::TrialExpired {
            success: false,
            message: "Trial expirado - necessário assinar um plano".to_string(),
            trial_expirado: true,
        },
        PersonalizationOutcome::NoOffers => PersonalizedOffersResponse::Denied {
            success: false,
            message: "Nenhuma oferta disponível no momento".to_string(),
        },
        PersonalizationOutcome::UnsupportedFormat { stored } => {
            tracing::warn!(stored = %stored, "Unsupported stored delivery format");
            PersonalizedOffersResponse::Denied {
                success: false,
                message: "Formato de oferta não suportado".to_string(),
            }
        }
    };

    Ok(Json(response))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_text_response_shape() {
        let response = PersonalizedOffersResponse::Text {
            success: true,
            formato: "texto",
            mensagem: "🛒 ...".to_string(),
            total_ofertas: 12,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["formato"], "texto");
        assert_eq!(json["total_ofertas"], 12);
        assert!(json.get("encartes").is_none());
    }

    #[test]
    fn test_trial_expired_response_shape() {
        let response = PersonalizedOffersResponse::TrialExpired {
            success: false,
            message: "Trial expirado - necessário assinar um plano".to_string(),
            trial_expirado: true,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["trial_expirado"], true);
    }

    #[test]
    fn test_denied_response_has_no_extra_fields() {
        let response = PersonalizedOffersResponse::Denied {
            success: false,
            message: "Nenhuma oferta disponível no momento".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("trial_expirado").is_none());
        assert!(json.get("formato").is_none());
    }
}
