//! Wallet API endpoints.

use api_types::wallet::{AddFunds, TransactionsQuery, WalletBalance};
use axum::{
    Json,
    extract::{Query, State},
};
use engine::{FundsAdded, WalletStats, WalletTransaction, money};
use serde::Serialize;

use crate::{ServerError, server::ServerState, validate};

#[derive(Serialize)]
pub struct FundsResponse {
    status: &'static str,
    message: String,
    #[serde(flatten)]
    added: FundsAdded,
}

#[derive(Serialize)]
pub struct TransactionsResponse {
    count: usize,
    transactions: Vec<WalletTransaction>,
}

pub async fn balance(State(state): State<ServerState>) -> Result<Json<WalletBalance>, ServerError> {
    let balance = state.run(|engine| engine.wallet_balance()).await?;
    Ok(Json(WalletBalance {
        balance,
        formatted: money::format_amount(balance),
    }))
}

pub async fn add_funds(
    State(state): State<ServerState>,
    Json(payload): Json<AddFunds>,
) -> Result<Json<FundsResponse>, ServerError> {
    let amount = validate::positive(payload.amount, "amount")?;
    let method = validate::non_empty(&payload.payment_method, "payment_method")?.to_string();

    let added = state
        .run(move |engine| engine.add_funds(amount, &method))
        .await??;
    Ok(Json(FundsResponse {
        status: "success",
        message: format!("Successfully added {} to wallet", money::format_amount(amount)),
        added,
    }))
}

pub async fn transactions(
    State(state): State<ServerState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Json<TransactionsResponse>, ServerError> {
    let limit = query.limit;
    let transactions = state
        .run(move |engine| engine.wallet_transactions(limit))
        .await?;
    Ok(Json(TransactionsResponse {
        count: transactions.len(),
        transactions,
    }))
}

pub async fn stats(State(state): State<ServerState>) -> Result<Json<WalletStats>, ServerError> {
    Ok(Json(state.run(|engine| engine.wallet_stats()).await?))
}
