use aurum_api::config::ApiConfig;
use aurum_core::UserId;
use reqwest::StatusCode;
use serde_json::json;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app = aurum_api::app::build_app(&ApiConfig::default()).expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn post_tx(
    client: &reqwest::Client,
    srv: &TestServer,
    user: UserId,
    kind: &str,
    amount: f64,
) -> (StatusCode, serde_json::Value) {
    let res = client
        .post(srv.url("/transactions"))
        .header("x-user-id", user.to_string())
        .json(&json!({ "type": kind, "amount": amount }))
        .send()
        .await
        .unwrap();
    let status = res.status();
    (status, res.json().await.unwrap())
}

async fn get_json(
    client: &reqwest::Client,
    url: String,
    user: Option<UserId>,
) -> (StatusCode, serde_json::Value) {
    let mut req = client.get(url);
    if let Some(user) = user {
        req = req.header("x-user-id", user.to_string());
    }
    let res = req.send().await.unwrap();
    let status = res.status();
    let body = res.json().await.unwrap_or(serde_json::Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn user_header_required_for_account_endpoints() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) = get_json(&client, srv.url("/account"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthenticated");

    let res = client
        .get(srv.url("/account"))
        .header("x-user-id", "not-a-uuid")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let (status, _) = get_json(&client, srv.url("/whoami"), Some(UserId::new())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deposit_and_convert_updates_balances() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let user = UserId::new();

    let (status, body) = post_tx(&client, &srv, user, "DEPOSIT", 100.0).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["balances"]["cash_balance"], 100.0);
    assert_eq!(body["transaction"]["type"], "DEPOSIT");
    let reference = body["transaction"]["reference"].as_str().unwrap();
    assert!(reference.starts_with("0x"));
    assert_eq!(reference.len(), 66);

    // No vault state yet: conversion uses the 2000 USD fallback quote.
    let (status, body) = post_tx(&client, &srv, user, "REBALANCE", 40.0).await;
    assert_eq!(status, StatusCode::CREATED);
    let cash = body["balances"]["cash_balance"].as_f64().unwrap();
    let gold = body["balances"]["gold_balance"].as_f64().unwrap();
    assert!((cash - 60.0).abs() < 1e-9);
    assert!((gold - 0.02).abs() < 1e-12);

    let (status, body) = get_json(&client, srv.url("/account"), Some(user)).await;
    assert_eq!(status, StatusCode::OK);
    assert!((body["cash_balance"].as_f64().unwrap() - 60.0).abs() < 1e-9);

    let (_, body) = get_json(&client, srv.url("/transactions"), Some(user)).await;
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["type"], "REBALANCE");
    assert_eq!(items[1]["type"], "DEPOSIT");
}

#[tokio::test]
async fn overdrawn_withdraw_is_rejected_without_side_effects() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let user = UserId::new();

    post_tx(&client, &srv, user, "DEPOSIT", 50.0).await;
    let (status, body) = post_tx(&client, &srv, user, "WITHDRAW", 100.0).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "insufficient_funds");

    let (_, account) = get_json(&client, srv.url("/account"), Some(user)).await;
    assert_eq!(account["cash_balance"], 50.0);
    let (_, txs) = get_json(&client, srv.url("/transactions"), Some(user)).await;
    assert_eq!(txs["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_requests_map_to_client_errors() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let user = UserId::new();

    let (status, body) = post_tx(&client, &srv, user, "DEPOSIT", 0.0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_amount");

    let (status, body) = post_tx(&client, &srv, user, "DEPOSIT", -10.0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_amount");

    let (status, body) = post_tx(&client, &srv, user, "STAKE", 10.0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "unknown_kind");
}

async fn post_raw_tx(
    client: &reqwest::Client,
    srv: &TestServer,
    user: UserId,
    body: &'static str,
) -> (StatusCode, serde_json::Value) {
    let res = client
        .post(srv.url("/transactions"))
        .header("x-user-id", user.to_string())
        .header("content-type", "application/json")
        .body(body)
        .send()
        .await
        .unwrap();
    let status = res.status();
    (status, res.json().await.unwrap())
}

#[tokio::test]
async fn malformed_transaction_bodies_return_json_errors() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let user = UserId::new();

    for body in [
        r#"{"type":"DEPOSIT","amount":"abc"}"#,
        r#"{"type":"DEPOSIT","amount":null}"#,
        r#"{"type":"DEPOSIT"}"#,
        r#"{"type":"DEPOSIT","amount":1e400}"#,
    ] {
        let (status, json) = post_raw_tx(&client, &srv, user, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(json["error"], "invalid_amount", "{body}");
        assert!(json["message"].is_string(), "{body}");
    }

    for body in [r#"{"amount":10}"#, r#"{"type":"DEPOSIT","#, "[]"] {
        let (status, json) = post_raw_tx(&client, &srv, user, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(json["error"], "invalid_request", "{body}");
    }

    let (_, txs) = get_json(&client, srv.url("/transactions"), Some(user)).await;
    assert!(txs["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn balances_are_isolated_per_user() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let alice = UserId::new();
    let bob = UserId::new();

    post_tx(&client, &srv, alice, "DEPOSIT", 75.0).await;

    let (_, account) = get_json(&client, srv.url("/account"), Some(bob)).await;
    assert_eq!(account["cash_balance"], 0.0);
    assert_eq!(account["gold_balance"], 0.0);
    let (_, txs) = get_json(&client, srv.url("/transactions"), Some(bob)).await;
    assert!(txs["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn vault_seed_history_and_toggle() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, _) = get_json(&client, srv.url("/vault/state"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let res = client.post(srv.url("/vault/toggle")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.post(srv.url("/vault/seed")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["inserted"], 30);

    let res = client.post(srv.url("/vault/seed")).send().await.unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["inserted"], 0);

    let (status, history) = get_json(&client, srv.url("/vault/history"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history["items"].as_array().unwrap().len(), 30);

    let (_, before) = get_json(&client, srv.url("/vault/state"), None).await;
    let res = client.post(srv.url("/vault/toggle")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let after: serde_json::Value = res.json().await.unwrap();
    assert_ne!(after["status"], before["status"]);
    assert_eq!(after["gold_price"], before["gold_price"]);

    let (_, latest) = get_json(&client, srv.url("/vault/state"), None).await;
    assert_eq!(latest["id"], after["id"]);
}

#[tokio::test]
async fn rebalance_prices_off_latest_vault_state() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let user = UserId::new();

    let res = client.post(srv.url("/vault/seed")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let (_, state) = get_json(&client, srv.url("/vault/state"), None).await;
    let price = state["gold_price"].as_f64().unwrap();

    post_tx(&client, &srv, user, "DEPOSIT", 500.0).await;
    let (status, body) = post_tx(&client, &srv, user, "REBALANCE", 500.0).await;
    assert_eq!(status, StatusCode::CREATED);
    let gold = body["balances"]["gold_balance"].as_f64().unwrap();
    assert!((gold - 500.0 / price).abs() < 1e-12);
    assert_eq!(body["balances"]["cash_balance"], 0.0);
}

#[tokio::test]
async fn vault_state_cannot_be_written_over_http() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/vault/state"))
        .json(&json!({
            "status": "RISK_OFF",
            "current_apy": 7.5,
            "tvl": 1_025_000.0,
            "gold_price": -2500.0,
            "qie_price": 0.51,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = get_json(&client, srv.url("/vault/state"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
