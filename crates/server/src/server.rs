use axum::{
    Router,
    http::HeaderValue,
    routing::{delete, get, post},
};
use tower_http::cors::{Any, CorsLayer};

use std::{net::SocketAddr, sync::Arc};

use crate::{ServerError, budget, expenses, interac, shop, wallet};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

impl ServerState {
    /// Runs `op` on the blocking pool. Engine calls hold a lock and touch the
    /// ledger file, so they stay off the async workers.
    pub(crate) async fn run<T, F>(&self, op: F) -> Result<T, ServerError>
    where
        F: FnOnce(&Engine) -> T + Send + 'static,
        T: Send + 'static,
    {
        let engine = Arc::clone(&self.engine);
        tokio::task::spawn_blocking(move || op(&engine))
            .await
            .map_err(|err| ServerError::Internal(format!("engine task failed: {err}")))
    }
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(budget::root))
        .route("/create-budget", post(budget::create_budget))
        .route("/dashboard", get(budget::dashboard))
        .route("/add-expense", post(expenses::add_expense))
        .route("/delete-expense/{index}", delete(expenses::delete_expense))
        .route("/reallocate-funds", post(expenses::reallocate_funds))
        .route("/bulk-pay-vendors", post(expenses::bulk_pay_vendors))
        .route("/upload-receipt", post(expenses::upload_receipt))
        .route("/wallet/balance", get(wallet::balance))
        .route("/wallet/add-funds", post(wallet::add_funds))
        .route("/wallet/transactions", get(wallet::transactions))
        .route("/wallet/stats", get(wallet::stats))
        .route("/send-interac", post(interac::send))
        .route("/request-money", post(interac::request_money))
        .route("/settle-expense", post(interac::settle_expense))
        .route("/transactions", get(interac::list))
        .route("/settlement-suggestions", get(interac::suggestions))
        .route("/fake-payment", post(interac::fake_payment))
        .route("/shop/search", post(shop::search))
        .route("/shop/purchase", post(shop::purchase))
        .route("/shop/categories", get(shop::categories))
        .with_state(state)
}

/// CORS for browser clients. An empty list or `*` allows any origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() || origins.iter().any(|o| o.trim() == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(allowed)
}

/// The full HTTP application over `engine`, open to any origin.
pub fn app(engine: Engine) -> Router {
    app_with_origins(engine, &[])
}

pub fn app_with_origins(engine: Engine, origins: &[String]) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
    })
    .layer(cors_layer(origins))
}

pub async fn run_with_listener(
    app: Router,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await
}

pub fn spawn_with_listener(
    app: Router,
    listener: tokio::net::TcpListener,
) -> Result<SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(app, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
