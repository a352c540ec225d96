//! Axum REST API handlers.
//!
//! Failures of any kind come back as `400 {"success": false, "error": ...}`.
//! Successful writes return `201` with the stored record so the caller sees
//! the assigned timestamp.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db;
use crate::models::{CharityTransfer, DonationLog, NewDonation, NewTransfer};

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct RecordResponse<T> {
    pub success: bool,
    pub data: T,
}

#[derive(Serialize)]
pub struct AllLogsResponse {
    pub success: bool,
    pub donations: Vec<DonationLog>,
    pub transfers: Vec<CharityTransfer>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

fn bad_request(error: String) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            success: false,
            error,
        }),
    )
        .into_response()
}

fn created<T: Serialize>(data: T) -> axum::response::Response {
    (
        StatusCode::CREATED,
        Json(serde_json::json!(RecordResponse {
            success: true,
            data,
        })),
    )
        .into_response()
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /logs/donation`
///
/// Records a confirmed donation. Duplicate `txHash` submissions are rejected
/// without touching the stored record.
pub async fn record_donation(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<NewDonation>, JsonRejection>,
) -> impl IntoResponse {
    let Json(new) = match body {
        Ok(json) => json,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match db::insert_donation(&state.pool, &new).await {
        Ok(stored) => created(stored),
        Err(e) => bad_request(e.to_string()),
    }
}

/// `POST /logs/charity-transfer`
///
/// Records a threshold settlement observed in a deposit receipt.
pub async fn record_transfer(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<NewTransfer>, JsonRejection>,
) -> impl IntoResponse {
    let Json(new) = match body {
        Ok(json) => json,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match db::insert_transfer(&state.pool, &new).await {
        Ok(stored) => created(stored),
        Err(e) => bad_request(e.to_string()),
    }
}

/// `GET /logs/all`
///
/// Both event kinds, each newest first. Unfiltered and unpaginated.
pub async fn get_all_logs(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    let donations = match db::list_donations(&state.pool).await {
        Ok(rows) => rows,
        Err(e) => return bad_request(e.to_string()),
    };
    let transfers = match db::list_transfers(&state.pool).await {
        Ok(rows) => rows,
        Err(e) => return bad_request(e.to_string()),
    };

    (
        StatusCode::OK,
        Json(AllLogsResponse {
            success: true,
            donations,
            transfers,
        }),
    )
        .into_response()
}
