//! Integration tests for offer ingestion.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p dona-oferta-server)
//!
//! Run with: cargo test -p dona-oferta-integration-tests -- --ignored --test-threads=1

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use dona_oferta_integration_tests::{base_url, delete_supermarket, seed_supermarket, test_pool};

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_ingest_single_offer() {
    let pool = test_pool().await;
    let market_id = seed_supermarket(&pool, "Mercado Ingestão A", 1_000_000, 5_999_999, "site").await;

    let resp = Client::new()
        .post(format!("{}/processar-ofertas", base_url()))
        .json(&json!({
            "supermercado_id": market_id,
            "ofertas_extraidas": [
                {"nome_produto": "Arroz 5kg", "preco": "22.90", "data_fim_validade": "2099-01-31"}
            ]
        }))
        .send()
        .await
        .expect("Failed to call processar-ofertas");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");

    assert_eq!(body["success"], true);
    assert_eq!(body["ofertas_inseridas"], 1);
    assert_eq!(body["supermercado"], "Mercado Ingestão A");

    delete_supermarket(&pool, market_id).await;
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_unknown_supermarket_is_reported() {
    let resp = Client::new()
        .post(format!("{}/processar-ofertas", base_url()))
        .json(&json!({"supermercado_id": 987_654, "ofertas_extraidas": []}))
        .send()
        .await
        .expect("Failed to call processar-ofertas");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Supermercado não encontrado");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_empty_batch_still_purges_old_offers() {
    let pool = test_pool().await;
    let market_id = seed_supermarket(&pool, "Mercado Ingestão B", 1_000_000, 5_999_999, "site").await;

    // One offer aged past retention, one fresh
    sqlx::query(
        "INSERT INTO offers (supermarket_id, product_name, price, valid_from, valid_until, \
                             extracted_at, created_at) \
         VALUES ($1, 'Antiga', 1.00, now()::date, now()::date, now(), now() - interval '8 days'), \
                ($1, 'Recente', 1.00, now()::date, now()::date, now(), now() - interval '1 day')",
    )
    .bind(market_id)
    .execute(&pool)
    .await
    .expect("Failed to seed offers");

    let body: Value = Client::new()
        .post(format!("{}/processar-ofertas", base_url()))
        .json(&json!({"supermercado_id": market_id, "ofertas_extraidas": []}))
        .send()
        .await
        .expect("Failed to call processar-ofertas")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(body["success"], true);
    assert_eq!(body["ofertas_inseridas"], 0);

    let remaining: Vec<String> =
        sqlx::query_scalar("SELECT product_name FROM offers WHERE supermarket_id = $1")
            .bind(market_id)
            .fetch_all(&pool)
            .await
            .expect("Failed to list offers");
    assert_eq!(remaining, vec!["Recente".to_string()]);

    delete_supermarket(&pool, market_id).await;
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_flyer_registration_is_idempotent_per_day() {
    let pool = test_pool().await;
    let market_id = seed_supermarket(&pool, "Mercado Ingestão C", 1_000_000, 5_999_999, "pdf").await;

    let client = Client::new();
    let request = json!({
        "supermercado_id": market_id,
        "ofertas_extraidas": [],
        "url_pdf": "https://storage.example/encarte.pdf"
    });

    for _ in 0..2 {
        let body: Value = client
            .post(format!("{}/processar-ofertas", base_url()))
            .json(&request)
            .send()
            .await
            .expect("Failed to call processar-ofertas")
            .json()
            .await
            .expect("Failed to parse response");
        assert_eq!(body["success"], true);
    }

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM stored_flyers WHERE supermarket_id = $1")
            .bind(market_id)
            .fetch_one(&pool)
            .await
            .expect("Failed to count flyers");
    assert_eq!(count, 1);

    delete_supermarket(&pool, market_id).await;
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_invalid_items_are_skipped_not_fatal() {
    let pool = test_pool().await;
    let market_id = seed_supermarket(&pool, "Mercado Ingestão D", 1_000_000, 5_999_999, "site").await;

    let body: Value = Client::new()
        .post(format!("{}/processar-ofertas", base_url()))
        .json(&json!({
            "supermercado_id": market_id,
            "ofertas_extraidas": [
                {"nome_produto": "Válida", "preco": "9.99", "data_fim_validade": "2099-01-31"},
                {"nome_produto": "Sem validade", "preco": "5.00"},
                {"nome_produto": "Preço ruim", "preco": "caro", "data_fim_validade": "2099-01-31"}
            ]
        }))
        .send()
        .await
        .expect("Failed to call processar-ofertas")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(body["success"], true);
    assert_eq!(body["ofertas_inseridas"], 1);

    delete_supermarket(&pool, market_id).await;
}
