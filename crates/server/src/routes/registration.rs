//! Registration endpoint (`POST /usuarios-whatsapp`).

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use dona_oferta_core::{DeliveryFormat, Phone, PostalCode};

use crate::error::AppError;
use crate::models::{Supermarket, User};
use crate::services::registration::{self, RegistrationOutcome};
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub telefone: String,
    pub cep: String,
    #[serde(default)]
    pub cpf: Option<String>,
    #[serde(default)]
    pub formato_preferido: Option<DeliveryFormat>,
}

/// Registration response bodies (reference wire shapes).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RegisterResponse {
    Created {
        success: bool,
        message: String,
        usuario: User,
        supermercados_disponiveis: Vec<Supermarket>,
    },
    Duplicate {
        success: bool,
        message: String,
        usuario: User,
    },
    Uncovered {
        success: bool,
        message: String,
        cep: PostalCode,
    },
}

/// Register a new WhatsApp user.
///
/// Duplicate phone numbers and uncovered regions are HTTP 200 business
/// failures; only malformed bodies (400) and store failures (500) use error
/// statuses.
///
/// # Errors
///
/// Returns `AppError` for invalid request bodies and store failures.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::InvalidRequest(e.body_text()))?;

    let phone =
        Phone::parse(&request.telefone).map_err(|e| AppError::InvalidRequest(e.to_string()))?;
    let postal_code =
        PostalCode::parse(&request.cep).map_err(|e| AppError::InvalidRequest(e.to_string()))?;

    let outcome = registration::register_user(
        state.pool(),
        phone,
        postal_code,
        request.cpf,
        request.formato_preferido,
    )
    .await?;

    let response = match outcome {
        RegistrationOutcome::Registered { user, available } => RegisterResponse::Created {
            success: true,
            message: "Usuário cadastrado com sucesso!".to_string(),
            usuario: user,
            supermercados_disponiveis: available,
        },
        RegistrationOutcome::AlreadyRegistered { existing } => RegisterResponse::Duplicate {
            success: false,
            message: "Usuário já cadastrado".to_string(),
            usuario: existing,
        },
        RegistrationOutcome::UncoveredRegion { postal_code } => RegisterResponse::Uncovered {
            success: false,
            message: "Região não coberta ainda".to_string(),
            cep: postal_code,
        },
    };

    Ok(Json(response))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_minimal_body() {
        let request: RegisterRequest = serde_json::from_str(
            r#"{"telefone": "+5511999998888", "cep": "02010-000"}"#,
        )
        .unwrap();

        assert_eq!(request.telefone, "+5511999998888");
        assert!(request.cpf.is_none());
        assert!(request.formato_preferido.is_none());
    }

    #[test]
    fn test_request_rejects_unknown_format() {
        let result = serde_json::from_str::<RegisterRequest>(
            r#"{"telefone": "+5511999998888", "cep": "02010-000", "formato_preferido": "fax"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_uncovered_response_shape() {
        let response = RegisterResponse::Uncovered {
            success: false,
            message: "Região não coberta ainda".to_string(),
            cep: PostalCode::parse("99999-999").unwrap(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["cep"], 99_999_999);
        assert!(json.get("usuario").is_none());
    }
}
