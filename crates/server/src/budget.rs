//! Budget API endpoints.

use api_types::{StatusMessage, budget::BudgetNew};
use axum::{Json, extract::State, http::StatusCode};
use engine::{Dashboard, Ledger};
use serde::Serialize;

use crate::{ServerError, server::ServerState, validate};

#[derive(Serialize)]
pub struct BudgetCreated {
    status: &'static str,
    #[serde(flatten)]
    ledger: Ledger,
}

pub async fn root() -> Json<StatusMessage> {
    Json(StatusMessage {
        status: "running".to_string(),
        message: "KYFH-Interac API".to_string(),
    })
}

pub async fn create_budget(
    State(state): State<ServerState>,
    Json(payload): Json<BudgetNew>,
) -> Result<(StatusCode, Json<BudgetCreated>), ServerError> {
    let total = validate::positive(payload.total_budget, "total_budget")?;
    let keep_wallet = payload.keep_wallet;
    let ledger = state
        .run(move |engine| engine.create_budget(total, keep_wallet))
        .await??;

    Ok((
        StatusCode::CREATED,
        Json(BudgetCreated {
            status: "ok",
            ledger,
        }),
    ))
}

pub async fn dashboard(State(state): State<ServerState>) -> Result<Json<Dashboard>, ServerError> {
    Ok(Json(state.run(|engine| engine.dashboard()).await?))
}
