//! Simulated Interac endpoints. Nothing here moves real money.

use api_types::{
    StatusMessage,
    interac::{RequestMoney, SendInterac, SettleExpense, SuggestionsQuery},
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use engine::{
    InteracTransfer, MoneyRequest, SettlementSuggestion, TransferHistory, WalletTransaction,
};
use serde::Serialize;

use crate::{ServerError, server::ServerState, validate};

const DEFAULT_SPLIT_WAYS: u32 = 2;

#[derive(Serialize)]
pub struct SendResponse {
    status: &'static str,
    transfer: InteracTransfer,
    #[serde(skip_serializing_if = "Option::is_none")]
    wallet_transaction: Option<WalletTransaction>,
}

#[derive(Serialize)]
pub struct SuggestionsResponse {
    split_ways: u32,
    suggestions: Vec<SettlementSuggestion>,
}

pub async fn send(
    State(state): State<ServerState>,
    Json(payload): Json<SendInterac>,
) -> Result<(StatusCode, Json<SendResponse>), ServerError> {
    let recipient = validate::email(&payload.recipient_email, "recipient_email")?;
    let amount = validate::positive(payload.amount, "amount")?;

    let send = engine::SendInterac {
        recipient_email: recipient.to_string(),
        amount,
        message: payload.message,
        security_question: payload.security_question,
        security_answer: payload.security_answer,
        from_wallet: payload.from_wallet,
    };
    let sent = state.run(move |engine| engine.send_interac(send)).await??;

    Ok((
        StatusCode::CREATED,
        Json(SendResponse {
            status: "success",
            transfer: sent.transfer,
            wallet_transaction: sent.wallet_transaction,
        }),
    ))
}

pub async fn request_money(
    State(state): State<ServerState>,
    Json(payload): Json<RequestMoney>,
) -> Result<(StatusCode, Json<MoneyRequest>), ServerError> {
    let requester = validate::email(&payload.requester_email, "requester_email")?.to_string();
    let amount = validate::positive(payload.amount, "amount")?;
    let reason = payload.reason;

    let request = state
        .run(move |engine| engine.request_money(&requester, amount, reason.as_deref()))
        .await??;
    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn settle_expense(
    State(state): State<ServerState>,
    Json(payload): Json<SettleExpense>,
) -> Result<Json<InteracTransfer>, ServerError> {
    let recipient = validate::email(&payload.recipient_email, "recipient_email")?.to_string();
    let index = payload.expense_index;
    let transfer = state
        .run(move |engine| engine.settle_expense(index, &recipient))
        .await??;
    Ok(Json(transfer))
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<TransferHistory>, ServerError> {
    Ok(Json(state.run(|engine| engine.transfers()).await?))
}

pub async fn suggestions(
    State(state): State<ServerState>,
    Query(query): Query<SuggestionsQuery>,
) -> Result<Json<SuggestionsResponse>, ServerError> {
    let split_ways = query.split_ways.unwrap_or(DEFAULT_SPLIT_WAYS);
    if split_ways == 0 {
        return Err(ServerError::Generic(
            "split_ways must be greater than 0".to_string(),
        ));
    }
    let suggestions = state
        .run(move |engine| engine.settlement_suggestions(split_ways))
        .await?;
    Ok(Json(SuggestionsResponse {
        split_ways,
        suggestions,
    }))
}

pub async fn fake_payment() -> Json<StatusMessage> {
    Json(StatusMessage {
        status: "success".to_string(),
        message: "Interac payment simulated".to_string(),
    })
}
