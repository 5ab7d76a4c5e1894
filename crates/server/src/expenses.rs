//! Expense, reallocation and receipt endpoints.

use api_types::expense::{ExpenseNew, Reallocate, ReceiptUpload};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{BulkPayment, ExpenseChange, NewExpense, Reallocation, ReceiptAnalysis};
use serde::Serialize;

use crate::{ServerError, server::ServerState, validate};

#[derive(Serialize)]
pub struct ExpenseResponse {
    status: &'static str,
    #[serde(flatten)]
    change: ExpenseChange,
}

#[derive(Serialize)]
pub struct ReceiptResponse {
    status: &'static str,
    analysis: ReceiptAnalysis,
    #[serde(flatten)]
    change: ExpenseChange,
}

pub async fn add_expense(
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseResponse>), ServerError> {
    let amount = validate::positive(payload.amount, "amount")?;
    let category = validate::non_empty(&payload.category, "category")?;

    let mut new = NewExpense::new(category, amount);
    new.vendor_name = payload.vendor_name;
    let change = state.run(move |engine| engine.add_expense(new)).await??;

    Ok((
        StatusCode::CREATED,
        Json(ExpenseResponse {
            status: "added",
            change,
        }),
    ))
}

pub async fn delete_expense(
    State(state): State<ServerState>,
    Path(index): Path<usize>,
) -> Result<Json<ExpenseResponse>, ServerError> {
    let change = state.run(move |engine| engine.delete_expense(index)).await??;
    Ok(Json(ExpenseResponse {
        status: "deleted",
        change,
    }))
}

pub async fn reallocate_funds(
    State(state): State<ServerState>,
    Json(payload): Json<Reallocate>,
) -> Result<Json<Reallocation>, ServerError> {
    let amount = validate::positive(payload.amount, "amount")?;
    let from = validate::non_empty(&payload.from_category, "from_category")?.to_string();
    let to = validate::non_empty(&payload.to_category, "to_category")?.to_string();

    let reallocation = state
        .run(move |engine| engine.reallocate_funds(&from, &to, amount))
        .await??;
    Ok(Json(reallocation))
}

pub async fn bulk_pay_vendors(
    State(state): State<ServerState>,
) -> Result<Json<BulkPayment>, ServerError> {
    Ok(Json(state.run(|engine| engine.bulk_pay_vendors()).await??))
}

pub async fn upload_receipt(
    State(state): State<ServerState>,
    Json(payload): Json<ReceiptUpload>,
) -> Result<(StatusCode, Json<ReceiptResponse>), ServerError> {
    let text = validate::non_empty(&payload.text, "text")?.to_string();
    let filename = validate::non_empty(&payload.filename, "filename")?.to_string();
    let category = payload.category;

    let upload = state
        .run(move |engine| engine.upload_receipt(&text, &filename, category.as_deref()))
        .await??;

    Ok((
        StatusCode::CREATED,
        Json(ReceiptResponse {
            status: "added",
            analysis: upload.analysis,
            change: upload.added,
        }),
    ))
}
