use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use engine::{Engine, Ledger, LedgerStore, MemoryStore, StoreError};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tower::ServiceExt;

fn app() -> Router {
    server::app(Engine::builder().store(MemoryStore::new()).build().unwrap())
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    call(app, Method::POST, uri, Some(body)).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    call(app, Method::GET, uri, None).await
}

#[tokio::test]
async fn root_reports_running() {
    let app = app();
    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
}

#[tokio::test]
async fn budget_and_expense_flow() {
    let app = app();

    let (status, body) = post(&app, "/create-budget", json!({ "total_budget": 1000.0 })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["categories"]["food"], 400.0);
    assert_eq!(body["remaining"], 1000.0);

    let (status, body) = post(
        &app,
        "/add-expense",
        json!({ "category": "food", "amount": 50.0, "vendor_name": "Pizza Palace" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["index"], 0);
    assert_eq!(body["category_balance"], 350.0);
    assert_eq!(body["remaining"], 950.0);
    assert_eq!(body["expense"]["status"], "pending");

    let (status, body) = get(&app, "/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ledger"]["expenses"].as_array().unwrap().len(), 1);
    assert!(body["insights"]["feedback"].is_string());

    let (status, body) = call(&app, Method::DELETE, "/delete-expense/0", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["remaining"], 1000.0);

    let (status, body) = call(&app, Method::DELETE, "/delete-expense/0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No expenses recorded");
}

#[tokio::test]
async fn engine_errors_map_to_statuses() {
    let app = app();

    let (status, body) = post(&app, "/add-expense", json!({ "category": "food", "amount": 5.0 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("No budget"));

    post(&app, "/create-budget", json!({ "total_budget": 100.0 })).await;
    post(&app, "/add-expense", json!({ "category": "food", "amount": 5.0 })).await;

    let (status, _) = call(&app, Method::DELETE, "/delete-expense/7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post(
        &app,
        "/reallocate-funds",
        json!({ "from_category": "venue", "to_category": "food", "amount": 1000000.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        &app,
        "/reallocate-funds",
        json!({ "from_category": "food", "to_category": "food", "amount": 1.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn request_validation_rejects_bad_input() {
    let app = app();

    let (status, body) = post(&app, "/create-budget", json!({ "total_budget": -1.0 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "total_budget must be greater than 0");

    let (status, _) = post(&app, "/add-expense", json!({ "category": "  ", "amount": 1.0 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post(
        &app,
        "/send-interac",
        json!({ "recipient_email": "not-an-email", "amount": 10.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn wallet_and_bulk_payment() {
    let app = app();
    post(&app, "/create-budget", json!({ "total_budget": 500.0 })).await;
    post(&app, "/add-expense", json!({ "category": "food", "amount": 30.0 })).await;
    post(&app, "/add-expense", json!({ "category": "venue", "amount": 50.0 })).await;

    let (status, body) = post(&app, "/bulk-pay-vendors", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Insufficient wallet balance"));

    let (status, body) = post(&app, "/wallet/add-funds", json!({ "amount": 80.0 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["new_balance"], 80.0);
    assert_eq!(body["transaction"]["payment_method"], "interac_debit");

    let (status, body) = post(&app, "/bulk-pay-vendors", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["payments"].as_array().unwrap().len(), 2);
    assert_eq!(body["wallet_balance"], 0.0);

    let (_, body) = get(&app, "/wallet/balance").await;
    assert_eq!(body["formatted"], "$0.00");

    let (_, body) = get(&app, "/wallet/transactions?limit=2").await;
    assert_eq!(body["count"], 2);

    let (_, body) = get(&app, "/wallet/stats").await;
    assert_eq!(body["total_added"], 80.0);
    assert_eq!(body["transaction_count"], 3);
}

#[tokio::test]
async fn receipt_upload_adds_expense() {
    let app = app();
    post(&app, "/create-budget", json!({ "total_budget": 200.0 })).await;

    let (status, body) = post(
        &app,
        "/upload-receipt",
        json!({ "text": "Grand Hall rental\nTOTAL: $120.00", "filename": "hall.pdf" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["analysis"]["category"], "venue");
    assert_eq!(body["analysis"]["verification"]["status"], "verified");
    assert_eq!(body["remaining"], 80.0);
}

#[tokio::test]
async fn interac_transfers_and_suggestions() {
    let app = app();
    post(&app, "/create-budget", json!({ "total_budget": 300.0 })).await;
    post(&app, "/add-expense", json!({ "category": "food", "amount": 60.0 })).await;

    let (status, body) = post(
        &app,
        "/send-interac",
        json!({ "recipient_email": "kim@example.com", "amount": 40.0, "message": "pizza" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["transfer"]["type"], "send");

    let (status, body) = post(
        &app,
        "/request-money",
        json!({ "requester_email": "lee@example.com", "amount": 15.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "pending");

    let (status, _) = post(
        &app,
        "/settle-expense",
        json!({ "expense_index": 0, "recipient_email": "kim@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get(&app, "/transactions").await;
    assert_eq!(body["transfers"].as_array().unwrap().len(), 2);
    assert_eq!(body["money_requests"].as_array().unwrap().len(), 1);

    let (_, body) = get(&app, "/settlement-suggestions?split_ways=3").await;
    assert_eq!(body["split_ways"], 3);
    assert_eq!(body["suggestions"][0]["suggested_split"], 20.0);

    let (status, body) = post(&app, "/fake-payment", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
}

#[tokio::test]
async fn shopping_search_and_purchase() {
    let app = app();

    let (status, body) = get(&app, "/shop/categories").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categories"].as_array().unwrap().len(), 4);

    let (status, body) = post(
        &app,
        "/shop/search",
        json!({ "category": "food", "optimize_for": "cheapest" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["products"].as_array().unwrap().len(), 5);
    assert!(body["comparison"]["best_price"]["name"].is_string());

    let (_, body) = post(&app, "/shop/search", json!({ "category": "travel" })).await;
    assert_eq!(body["status"], "no_results");

    post(&app, "/create-budget", json!({ "total_budget": 1000.0 })).await;
    let (status, body) = post(
        &app,
        "/shop/purchase",
        json!({ "product_index": 0, "category": "decor" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payment_method"], "interac");
    assert_eq!(body["expense_added"], true);

    let (status, _) = post(
        &app,
        "/shop/purchase",
        json!({ "product_index": 42, "category": "decor" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn spawned_server_answers_over_tcp() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let engine = Engine::builder().store(MemoryStore::new()).build().unwrap();
    let addr = server::spawn_with_listener(server::app(engine), listener).unwrap();

    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /wallet/balance HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("\"formatted\":\"$0.00\""));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_writes_run_off_the_async_workers() {
    let app = app();
    post(&app, "/create-budget", json!({ "total_budget": 100.0 })).await;

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..20 {
        let app = app.clone();
        tasks.spawn(async move { post(&app, "/wallet/add-funds", json!({ "amount": 1.25 })).await });
    }
    while let Some(done) = tasks.join_next().await {
        assert_eq!(done.unwrap().0, StatusCode::OK);
    }

    let (_, body) = get(&app, "/wallet/balance").await;
    assert_eq!(body["balance"], 25.0);
    let (_, body) = get(&app, "/wallet/stats").await;
    assert_eq!(body["transaction_count"], 20);
}

#[tokio::test]
async fn cors_allows_any_origin_by_default() {
    let app = app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/create-budget")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn cors_restricts_to_configured_origins() {
    let engine = Engine::builder().store(MemoryStore::new()).build().unwrap();
    let app = server::app_with_origins(engine, &["http://localhost:5173".to_string()]);

    let request = |origin: &str| {
        Request::builder()
            .uri("/")
            .header("origin", origin)
            .body(Body::empty())
            .unwrap()
    };

    let allowed = app
        .clone()
        .oneshot(request("http://localhost:5173"))
        .await
        .unwrap();
    assert_eq!(
        allowed.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );

    let other = app.oneshot(request("https://elsewhere.example")).await.unwrap();
    assert!(!other.headers().contains_key("access-control-allow-origin"));
}

/// Loads like a real store but cannot write.
struct ReadOnlyStore {
    ledger: Ledger,
}

impl LedgerStore for ReadOnlyStore {
    fn load(&self) -> Option<Ledger> {
        Some(self.ledger.clone())
    }

    fn save(&self, _: &Ledger) -> Result<(), StoreError> {
        Err(std::io::Error::other("read-only filesystem").into())
    }
}

#[tokio::test]
async fn store_failure_is_a_500_without_details() {
    let engine = Engine::builder()
        .store(ReadOnlyStore {
            ledger: Ledger::new(100.0, &[]).unwrap(),
        })
        .build()
        .unwrap();
    let app = server::app(engine);

    let (status, body) = post(&app, "/add-expense", json!({ "category": "food", "amount": 5.0 })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal server error");

    let (status, body) = get(&app, "/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ledger"]["remaining"], 100.0);
}

