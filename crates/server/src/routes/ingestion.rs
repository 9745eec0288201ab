//! Offer ingestion endpoint (`POST /processar-ofertas`).

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use dona_oferta_core::SupermarketId;

use crate::error::AppError;
use crate::services::ingestion::{self, IngestionOutcome, RawOffer};
use crate::state::AppState;

/// Ingestion request body, as sent by the extraction collaborator.
#[derive(Debug, Deserialize)]
pub struct ProcessOffersRequest {
    pub supermercado_id: SupermarketId,
    pub ofertas_extraidas: Vec<RawOffer>,
    #[serde(default)]
    pub url_pdf: Option<String>,
}

/// Ingestion response bodies (reference wire shapes).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ProcessOffersResponse {
    Processed {
        success: bool,
        message: String,
        ofertas_inseridas: u64,
        supermercado: String,
    },
    NotFound {
        success: bool,
        message: String,
    },
}

/// Ingest a batch of extracted offers for one supermarket.
///
/// An unknown supermarket is an HTTP 200 business failure; store failures
/// surface as 500.
///
/// # Errors
///
/// Returns `AppError` for invalid request bodies and store failures.
#[instrument(skip_all, fields(supermercado_id))]
pub async fn process(
    State(state): State<AppState>,
    payload: Result<Json<ProcessOffersRequest>, JsonRejection>,
) -> Result<Json<ProcessOffersResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::InvalidRequest(e.body_text()))?;
    tracing::Span::current().record("supermercado_id", request.supermercado_id.as_i32());

    let outcome = ingestion::ingest_offers(
        state.pool(),
        request.supermercado_id,
        request.ofertas_extraidas,
        request.url_pdf,
    )
    .await?;

    let response = match outcome {
        IngestionOutcome::Processed(report) => ProcessOffersResponse::Processed {
            success: true,
            message: format!(
                "{} ofertas processadas para {}",
                report.inserted, report.supermarket_name
            ),
            ofertas_inseridas: report.inserted,
            supermercado: report.supermarket_name,
        },
        IngestionOutcome::SupermarketNotFound => ProcessOffersResponse::NotFound {
            success: false,
            message: "Supermercado não encontrado".to_string(),
        },
    };

    Ok(Json(response))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let request: ProcessOffersRequest = serde_json::from_str(
            r#"{
                "supermercado_id": 1,
                "ofertas_extraidas": [
                    {"nome_produto": "Arroz 5kg", "preco": "22.90", "data_fim_validade": "2025-01-31"}
                ],
                "url_pdf": "https://storage.example/1/2025-01-20/encarte.pdf"
            }"#,
        )
        .unwrap();

        assert_eq!(request.supermercado_id.as_i32(), 1);
        assert_eq!(request.ofertas_extraidas.len(), 1);
        assert!(request.url_pdf.is_some());
    }

    #[test]
    fn test_processed_response_shape() {
        let response = ProcessOffersResponse::Processed {
            success: true,
            message: "1 ofertas processadas para Mercado Bom Preço".to_string(),
            ofertas_inseridas: 1,
            supermercado: "Mercado Bom Preço".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["ofertas_inseridas"], 1);
        assert_eq!(json["supermercado"], "Mercado Bom Preço");
    }
}
