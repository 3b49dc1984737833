pub mod profiles;
pub mod transactions;

use axum::{
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::errors::ServiceError;

use crate::errors::JsonApiError;
use crate::openapi::ApiDoc;
use crate::state::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics() -> (StatusCode, String) {
    common::metrics::encode_metrics()
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn not_found() -> JsonApiError {
    JsonApiError::new(StatusCode::NOT_FOUND, "Not Found")
}

async fn method_not_allowed() -> JsonApiError {
    JsonApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

/// Count the outcome of one store operation.
pub(crate) fn observe<T>(collection: &str, operation: &str, res: &Result<T, ServiceError>) {
    let outcome = match res {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    common::metrics::record_operation(collection, operation, outcome);
}

/// Build the full application router: KYC registry, transaction ledger and ops endpoints.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let ops = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api-docs/openapi.json", get(openapi_json));

    let kyc = Router::new()
        .route("/add_profile", post(profiles::add_profile))
        .route("/profiles", get(profiles::list_profiles))
        .route("/profile", get(profiles::get_profile))
        .route("/update_profile/:phone/:kyc_id", put(profiles::update_profile))
        .route("/delete_profile/:phone/:kyc_id", delete(profiles::delete_profile));

    // static `/transactions/search` wins over the `:phone_number` capture
    let ledger = Router::new()
        .route("/add_transaction", post(transactions::add_transaction))
        .route("/transactions/search", get(transactions::search_transactions))
        .route("/transactions/:phone_number", get(transactions::get_transactions))
        .route("/update_transaction/:phone_number/:txn_id", put(transactions::update_transaction))
        .route("/delete_transaction/:phone_number/:txn_id", delete(transactions::delete_transaction));

    ops.merge(kyc)
        .merge(ledger)
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
