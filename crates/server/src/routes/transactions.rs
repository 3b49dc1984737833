use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use common::types::Message;
use models::{Transaction, TransactionInput};
use service::stores::TransactionFilter;
use tracing::info;

use crate::errors::JsonApiError;
use crate::routes::observe;
use crate::state::ServerState;

const COLLECTION: &str = "transactions";

#[utoipa::path(
    post, path = "/add_transaction", tag = "ledger",
    request_body = crate::openapi::TransactionInputDoc,
    responses(
        (status = 200, description = "Stored transaction with generated ids", body = crate::openapi::TransactionDoc),
        (status = 422, description = "Invalid body")
    )
)]
pub async fn add_transaction(
    State(state): State<ServerState>,
    body: Result<Json<TransactionInput>, JsonRejection>,
) -> Result<Json<Transaction>, JsonApiError> {
    let Json(input) = body?;
    let res = state.transactions.create(input).await;
    observe(COLLECTION, "create", &res);
    Ok(Json(res?))
}

#[utoipa::path(
    get, path = "/transactions/{phone_number}", tag = "ledger",
    params(("phone_number" = String, Path, description = "Phone number on the transactions")),
    responses(
        (status = 200, description = "Transactions for the phone number", body = [crate::openapi::TransactionDoc]),
        (status = 404, description = "No transactions found")
    )
)]
pub async fn get_transactions(
    State(state): State<ServerState>,
    Path(phone_number): Path<String>,
) -> Result<Json<Vec<Transaction>>, JsonApiError> {
    let res = state.transactions.by_phone(&phone_number).await;
    observe(COLLECTION, "by_phone", &res);
    Ok(Json(res?))
}

#[utoipa::path(
    get, path = "/transactions/search", tag = "ledger",
    params(
        ("phone_number" = Option<String>, Query, description = "Exact phone number"),
        ("transaction_type" = Option<String>, Query, description = "Exact transaction type"),
        ("category" = Option<String>, Query, description = "Case-insensitive substring of Category"),
        ("merchant" = Option<String>, Query, description = "Case-insensitive substring of Merchant_or_Payee"),
        ("mode" = Option<String>, Query, description = "Case-insensitive substring of Mode"),
        ("location" = Option<String>, Query, description = "Case-insensitive substring of Location")
    ),
    responses(
        (status = 200, description = "Matching transactions", body = [crate::openapi::TransactionDoc]),
        (status = 404, description = "No matching transactions"),
        (status = 500, description = "Internal error")
    )
)]
pub async fn search_transactions(
    State(state): State<ServerState>,
    query: Result<Query<TransactionFilter>, QueryRejection>,
) -> Result<Json<Vec<Transaction>>, JsonApiError> {
    let Query(filter) = query?;
    let res = state.transactions.search(&filter).await;
    observe(COLLECTION, "search", &res);
    let found = res?;
    info!(count = found.len(), unfiltered = filter.is_empty(), "search transactions");
    Ok(Json(found))
}

#[utoipa::path(
    put, path = "/update_transaction/{phone_number}/{txn_id}", tag = "ledger",
    params(
        ("phone_number" = String, Path, description = "Phone number on the transaction"),
        ("txn_id" = String, Path, description = "Generated transaction id")
    ),
    request_body = crate::openapi::TransactionInputDoc,
    responses(
        (status = 200, description = "Updated transaction", body = crate::openapi::TransactionDoc),
        (status = 404, description = "Transaction not found")
    )
)]
pub async fn update_transaction(
    State(state): State<ServerState>,
    Path((phone_number, txn_id)): Path<(String, String)>,
    body: Result<Json<TransactionInput>, JsonRejection>,
) -> Result<Json<Transaction>, JsonApiError> {
    let Json(input) = body?;
    let res = state.transactions.update(&phone_number, &txn_id, input).await;
    observe(COLLECTION, "update", &res);
    Ok(Json(res?))
}

#[utoipa::path(
    delete, path = "/delete_transaction/{phone_number}/{txn_id}", tag = "ledger",
    params(
        ("phone_number" = String, Path, description = "Phone number on the transaction"),
        ("txn_id" = String, Path, description = "Generated transaction id")
    ),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::MessageDoc),
        (status = 404, description = "Transaction not found")
    )
)]
pub async fn delete_transaction(
    State(state): State<ServerState>,
    Path((phone_number, txn_id)): Path<(String, String)>,
) -> Result<Json<Message>, JsonApiError> {
    let res = state.transactions.delete(&phone_number, &txn_id).await;
    observe(COLLECTION, "delete", &res);
    let deleted = res?;
    Ok(Json(Message::new(format!("Transaction {deleted} deleted successfully."))))
}
