use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use common::types::Message;
use models::{KycProfile, KycProfileInput};
use service::stores::ProfileQuery;
use tracing::info;

use crate::errors::JsonApiError;
use crate::routes::observe;
use crate::state::ServerState;

const COLLECTION: &str = "kyc_profiles";

#[utoipa::path(
    post, path = "/add_profile", tag = "kyc",
    request_body = crate::openapi::KycProfileInputDoc,
    responses(
        (status = 200, description = "Stored profile with generated KYC_ID", body = crate::openapi::KycProfileDoc),
        (status = 400, description = "Profile with this PAN already exists"),
        (status = 422, description = "Invalid body")
    )
)]
pub async fn add_profile(
    State(state): State<ServerState>,
    body: Result<Json<KycProfileInput>, JsonRejection>,
) -> Result<Json<KycProfile>, JsonApiError> {
    let Json(input) = body?;
    let res = state.profiles.create(input).await;
    observe(COLLECTION, "create", &res);
    Ok(Json(res?))
}

#[utoipa::path(
    get, path = "/profiles", tag = "kyc",
    responses((status = 200, description = "All profiles", body = [crate::openapi::KycProfileDoc]))
)]
pub async fn list_profiles(State(state): State<ServerState>) -> Result<Json<Vec<KycProfile>>, JsonApiError> {
    let res = state.profiles.list().await;
    observe(COLLECTION, "list", &res);
    let all = res?;
    info!(count = all.len(), "list profiles");
    Ok(Json(all))
}

#[utoipa::path(
    get, path = "/profile", tag = "kyc",
    params(
        ("phone" = Option<String>, Query, description = "Mobile number; alone, or with pan"),
        ("dob" = Option<String>, Query, description = "Date of birth; only together with pan"),
        ("pan" = Option<String>, Query, description = "PAN; with dob or with phone")
    ),
    responses(
        (status = 200, description = "Matching profiles", body = [crate::openapi::KycProfileDoc]),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn get_profile(
    State(state): State<ServerState>,
    query: Result<Query<ProfileQuery>, QueryRejection>,
) -> Result<Json<Vec<KycProfile>>, JsonApiError> {
    let Query(q) = query?;
    let res = state.profiles.find(&q.lookup()).await;
    observe(COLLECTION, "find", &res);
    Ok(Json(res?))
}

#[utoipa::path(
    put, path = "/update_profile/{phone}/{kyc_id}", tag = "kyc",
    params(
        ("phone" = String, Path, description = "Mobile number on the profile"),
        ("kyc_id" = String, Path, description = "Generated KYC id")
    ),
    request_body = crate::openapi::KycProfileInputDoc,
    responses(
        (status = 200, description = "Updated profile", body = crate::openapi::KycProfileDoc),
        (status = 400, description = "PAN belongs to another profile"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn update_profile(
    State(state): State<ServerState>,
    Path((phone, kyc_id)): Path<(String, String)>,
    body: Result<Json<KycProfileInput>, JsonRejection>,
) -> Result<Json<KycProfile>, JsonApiError> {
    let Json(input) = body?;
    let res = state.profiles.update(&phone, &kyc_id, input).await;
    observe(COLLECTION, "update", &res);
    Ok(Json(res?))
}

#[utoipa::path(
    delete, path = "/delete_profile/{phone}/{kyc_id}", tag = "kyc",
    params(
        ("phone" = String, Path, description = "Mobile number on the profile"),
        ("kyc_id" = String, Path, description = "Generated KYC id")
    ),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::MessageDoc),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn delete_profile(
    State(state): State<ServerState>,
    Path((phone, kyc_id)): Path<(String, String)>,
) -> Result<Json<Message>, JsonApiError> {
    let res = state.profiles.delete(&phone, &kyc_id).await;
    observe(COLLECTION, "delete", &res);
    let deleted = res?;
    Ok(Json(Message::new(format!("Profile {deleted} deleted successfully."))))
}
