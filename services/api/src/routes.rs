use crate::infra::AppState;
use address_verify::error::AppError;
use address_verify::verification::ClosestMatch;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::Ordering;
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct VerifyAddressRequest {
    pub(crate) address: String,
    #[serde(default)]
    pub(crate) user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct VerifyAddressResponse {
    pub(crate) status: VerificationStatus,
    pub(crate) closest_match: ClosestMatch,
    pub(crate) checked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum VerificationStatus {
    Deliverable,
}

pub(crate) fn address_routes() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/addresses/verify", post(verify_address_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn verify_address_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<VerifyAddressRequest>,
) -> Result<Json<VerifyAddressResponse>, AppError> {
    let VerifyAddressRequest { address, user_id } = payload;
    let user_id = state
        .credential_for(user_id)
        .ok_or(AppError::MissingCredential)?;

    let closest_match = state.validator.validate(&address, &user_id).await?;
    info!(zip = %closest_match.zip, "address confirmed deliverable");

    Ok(Json(VerifyAddressResponse {
        status: VerificationStatus::Deliverable,
        closest_match,
        checked_at: Utc::now(),
    }))
}
