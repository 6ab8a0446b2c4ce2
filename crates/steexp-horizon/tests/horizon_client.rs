use std::collections::HashMap;
use std::time::Duration;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use steexp_horizon::{AccountRecordFetcher, HorizonClient, HorizonConfig};
use steexp_types::{AssetType, FeedKind, FeedRequest, FetchError, FlagValue};

fn account_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "account_id": id,
        "sequence": "4294967296",
        "thresholds": {"low_threshold": 0, "med_threshold": 1, "high_threshold": 2},
        "flags": {"auth_required": true, "auth_revocable": 0},
        "balances": [
            {"balance": "25.0000000", "limit": "100.0000000", "asset_type": "credit_alphanum4",
             "asset_code": "EUR", "asset_issuer": "GISSUER"},
            {"balance": "500.0000000", "asset_type": "native"}
        ],
        "signers": [{"weight": 1, "key": id, "type": "ed25519_public_key"}]
    })
}

async fn account(Path(id): Path<String>) -> Response {
    match id.as_str() {
        "GNOTFOUND" => (
            StatusCode::NOT_FOUND,
            Json(json!({"title": "Resource Missing", "status": 404})),
        )
            .into_response(),
        "GBADID" => (
            StatusCode::BAD_REQUEST,
            Json(json!({"title": "Bad Request", "detail": "invalid account id", "status": 400})),
        )
            .into_response(),
        "GDOWN" => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"title": "Service Unavailable", "detail": "ingestion lagging"})),
        )
            .into_response(),
        "GGARBAGE" => (StatusCode::OK, "<html>definitely not json</html>").into_response(),
        "GBROKEN" => {
            let mut body = account_json(&id);
            body["balances"][0]["asset_issuer"] = serde_json::Value::Null;
            Json(body).into_response()
        }
        _ => Json(account_json(&id)).into_response(),
    }
}

async fn operations(Path(id): Path<String>, Query(params): Query<HashMap<String, String>>) -> Response {
    let limit: usize = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(10);
    let start: u64 = params
        .get("cursor")
        .and_then(|c| c.parse::<u64>().ok())
        .map(|c| c + 1)
        .unwrap_or(100);
    let records: Vec<_> = (start..start + limit as u64)
        .map(|n| {
            json!({
                "id": n.to_string(),
                "paging_token": n.to_string(),
                "type": "payment",
                "created_at": "2018-03-01T12:00:00Z",
                "transaction_hash": format!("hash{}", n),
                "source_account": id,
            })
        })
        .collect();
    Json(json!({"_embedded": {"records": records}})).into_response()
}

async fn transactions(Path(id): Path<String>) -> Response {
    Json(json!({"_embedded": {"records": [{
        "id": "tx1",
        "paging_token": "77",
        "hash": "tx1",
        "created_at": "2018-03-01T12:00:00Z",
        "source_account": id,
        "operation_count": 2,
        "successful": true
    }]}}))
    .into_response()
}

async fn spawn_horizon() -> HorizonClient {
    let app = Router::new()
        .route("/accounts/:id", get(account))
        .route("/accounts/:id/operations", get(operations))
        .route("/accounts/:id/transactions", get(transactions));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    HorizonClient::new(HorizonConfig {
        base_url: format!("http://{}", addr),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetch_account_record() {
    let horizon = spawn_horizon().await;

    let record = horizon.fetch("GABC").await.unwrap();

    assert_eq!(record.id, "GABC");
    assert_eq!(record.balances.len(), 2);
    assert_eq!(record.balances[0].asset_code.as_deref(), Some("EUR"));
    assert_eq!(record.balances[1].asset_type, AssetType::Native);
    assert_eq!(record.thresholds.medium, 1);
    assert_eq!(record.flags["auth_required"], FlagValue::Bool(true));
    assert_eq!(record.flags["auth_revocable"], FlagValue::Int(0));
}

#[tokio::test]
async fn test_not_found_is_classified() {
    let horizon = spawn_horizon().await;

    let err = horizon.fetch("GNOTFOUND").await.unwrap_err();

    assert_eq!(
        err,
        FetchError::NotFound {
            account_id: "GNOTFOUND".to_string()
        }
    );
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_bad_request_is_not_found() {
    let horizon = spawn_horizon().await;

    let err = horizon.fetch("GBADID").await.unwrap_err();

    assert_eq!(
        err,
        FetchError::NotFound {
            account_id: "GBADID".to_string()
        }
    );
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_server_failure_is_transport() {
    let horizon = spawn_horizon().await;

    let err = horizon.fetch("GDOWN").await.unwrap_err();

    match err {
        FetchError::Transport { status, message } => {
            assert_eq!(status, Some(503));
            assert_eq!(message, "ingestion lagging");
        }
        other => panic!("expected transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_server_is_transport() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let horizon = HorizonClient::new(HorizonConfig {
        base_url: format!("http://{}", addr),
        timeout: Duration::from_secs(2),
    })
    .unwrap();

    let err = horizon.fetch("GABC").await.unwrap_err();
    assert!(matches!(err, FetchError::Transport { status: None, .. }));
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let horizon = spawn_horizon().await;

    let err = horizon.fetch("GGARBAGE").await.unwrap_err();
    assert!(matches!(err, FetchError::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_invariant_violation_is_malformed() {
    let horizon = spawn_horizon().await;

    let err = horizon.fetch("GBROKEN").await.unwrap_err();
    match err {
        FetchError::MalformedResponse { reason } => assert!(reason.contains("issuer")),
        other => panic!("expected malformed response, got {:?}", other),
    }
}

#[tokio::test]
async fn test_operations_feed_pages() {
    let horizon = spawn_horizon().await;
    let request = FeedRequest::new(FeedKind::Operations, "GABC", 20, true);

    let first = horizon.operations(&request, None).await.unwrap();
    assert_eq!(first.records.len(), 20);
    assert_eq!(first.records[0].source_account, "GABC");
    assert_eq!(first.next_cursor.as_deref(), Some("119"));

    let second = horizon
        .operations(&request, first.next_cursor.as_deref())
        .await
        .unwrap();
    assert_eq!(second.records[0].id, "120");
}

#[tokio::test]
async fn test_transactions_feed_short_page() {
    let horizon = spawn_horizon().await;
    let request = FeedRequest::new(FeedKind::Transactions, "GABC", 10, true);

    let page = horizon.transactions(&request, None).await.unwrap();
    assert_eq!(page.records.len(), 1);
    assert_eq!(page.records[0].operation_count, 2);
    assert!(page.next_cursor.is_none());
}
