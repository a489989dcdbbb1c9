//! Tests for the Plaid proxy endpoints, run against a stand-in client.

#[macro_use]
mod common;

use std::sync::{Arc, atomic::Ordering};

use actix_web::{http::StatusCode, test};
use common::{INTERNAL_ERROR_TEXT, StubClient};
use credlink_server::TransactionsSync;
use serde_json::{Value, json};

fn exchange_request(public_token: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/exchange_public_token")
        .set_json(json!({ "publicToken": public_token }))
}

fn link_request(body: Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/create_link_token")
        .set_json(body)
}

#[actix_web::test]
async fn create_link_token_returns_token() {
    let stub = Arc::new(StubClient::new());
    let app = init_app!(stub.clone());

    let req = link_request(json!({ "clientUserId": "user-1" })).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "linkToken": "link-sandbox-stub" }));
    assert_eq!(stub.link_calls.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn create_link_token_accepts_snake_case_field() {
    let stub = Arc::new(StubClient::new());
    let app = init_app!(stub.clone());

    let req = link_request(json!({ "client_user_id": "user-1" })).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(stub.link_calls.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn empty_inputs_are_rejected_before_calling_plaid() {
    let stub = Arc::new(StubClient::new());
    let app = init_app!(stub.clone());

    let cases = [
        link_request(json!({ "clientUserId": "" })),
        link_request(json!({})),
        exchange_request(""),
        test::TestRequest::post()
            .uri("/exchange_public_token")
            .set_json(json!({ "somethingElse": "x" })),
    ];

    for req in cases {
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["detail"].is_string());
    }

    let malformed = test::TestRequest::post()
        .uri("/create_link_token")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, malformed).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(stub.total_calls(), 0);
}

#[actix_web::test]
async fn balances_and_transactions_require_a_token() {
    let stub = Arc::new(StubClient::new());
    let app = init_app!(stub.clone());

    for uri in ["/accounts_balance", "/transactions"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "detail": "Access token not found" }));
    }

    assert_eq!(stub.total_calls(), 0, "no Plaid call without a token");
}

#[actix_web::test]
async fn exchange_then_balances_returns_accounts_verbatim() {
    let accounts = vec![
        json!({
            "account_id": "acc-1",
            "balances": { "available": 100.25, "current": 110, "iso_currency_code": "USD" },
            "mask": "0000",
            "name": "Plaid Checking",
            "subtype": "checking",
            "type": "depository"
        }),
        json!({ "account_id": "acc-2", "balances": { "available": null }, "nested": [[1], { "k": "v" }] }),
    ];
    let stub = Arc::new(StubClient {
        accounts: accounts.clone(),
        ..StubClient::new()
    });
    let app = init_app!(stub.clone());

    let resp = test::call_service(&app, exchange_request("public-sandbox-1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "accessToken": "access-sandbox-stub" }));

    let req = test::TestRequest::get().uri("/accounts_balance").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;

    assert_eq!(body, json!({ "accounts": accounts }));
    assert_eq!(stub.seen_access_tokens(), vec!["access-sandbox-stub"]);
}

#[actix_web::test]
async fn transactions_return_only_added_entries() {
    let added = vec![
        json!({ "transaction_id": "t-added-1", "amount": 12.5 }),
        json!({ "transaction_id": "t-added-2", "amount": 4 }),
    ];
    let stub = Arc::new(StubClient {
        sync_page: TransactionsSync {
            added: added.clone(),
            modified: vec![json!({ "transaction_id": "t-modified" })],
            removed: vec![json!({ "transaction_id": "t-removed" })],
            next_cursor: Some("cursor-abc".into()),
            has_more: true,
        },
        ..StubClient::new()
    });
    let app = init_app!(stub.clone());

    test::call_service(&app, exchange_request("public-sandbox-1").to_request()).await;

    let req = test::TestRequest::get().uri("/transactions").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;

    assert_eq!(body, json!({ "transactions": added }));
    let rendered = body.to_string();
    assert!(!rendered.contains("t-modified"));
    assert!(!rendered.contains("t-removed"));
    assert!(!rendered.contains("cursor-abc"));
    assert_eq!(stub.transaction_calls.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn later_exchange_replaces_stored_token() {
    let stub = Arc::new(StubClient {
        access_tokens: vec!["access-first".into(), "access-second".into()],
        ..StubClient::new()
    });
    let app = init_app!(stub.clone());

    test::call_service(&app, exchange_request("public-1").to_request()).await;
    test::call_service(&app, test::TestRequest::get().uri("/accounts_balance").to_request()).await;
    test::call_service(&app, exchange_request("public-2").to_request()).await;
    test::call_service(&app, test::TestRequest::get().uri("/transactions").to_request()).await;

    assert_eq!(
        stub.seen_access_tokens(),
        vec!["access-first", "access-second"]
    );
}

#[actix_web::test]
async fn failed_exchange_keeps_session_empty() {
    let stub = Arc::new(StubClient {
        fail_exchange: true,
        ..StubClient::new()
    });
    let app = init_app!(stub.clone());

    let resp = test::call_service(&app, exchange_request("public-1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let req = test::TestRequest::get().uri("/accounts_balance").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(stub.balance_calls.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn upstream_failures_return_generic_500() {
    let stub = Arc::new(StubClient {
        fail_link: true,
        fail_exchange: true,
        ..StubClient::new()
    });
    let app = init_app!(stub.clone());

    let cases = [
        (
            link_request(json!({ "clientUserId": "user-1" })),
            "Failed to create link token",
        ),
        (exchange_request("public-1"), "Failed to exchange public token"),
    ];

    for (req, expected) in cases {
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "detail": expected }));
        assert!(!body.to_string().contains(INTERNAL_ERROR_TEXT));
    }
}

#[actix_web::test]
async fn balance_and_transaction_failures_return_generic_500() {
    let stub = Arc::new(StubClient {
        fail_balances: true,
        fail_transactions: true,
        ..StubClient::new()
    });
    let app = init_app!(stub.clone());

    let resp = test::call_service(&app, exchange_request("public-1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cases = [
        ("/accounts_balance", "Failed to fetch account balances"),
        ("/transactions", "Failed to fetch transactions"),
    ];

    for (uri, expected) in cases {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "detail": expected }));
        assert!(!body.to_string().contains(INTERNAL_ERROR_TEXT));
    }

    assert_eq!(stub.balance_calls.load(Ordering::SeqCst), 1);
    assert_eq!(stub.transaction_calls.load(Ordering::SeqCst), 1);
}
