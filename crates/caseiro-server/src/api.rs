pub mod alerts;
pub mod email;
pub mod triggers;

use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use caseiro_notify::error::NotifyError;
use caseiro_storage::error::StorageError;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Error envelope (`data` is always null).
#[derive(Serialize, ToSchema)]
pub struct ApiError {
    pub err_code: i32,
    pub err_msg: String,
    pub trace_id: String,
}

/// Response envelope shared by every `/v1` endpoint.
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    /// 0 on success.
    pub err_code: i32,
    pub err_msg: String,
    pub trace_id: String,
    pub data: Option<T>,
}

pub fn success_response<T>(status: StatusCode, trace_id: &str, data: T) -> Response
where
    T: Serialize,
{
    (
        status,
        Json(ApiResponse {
            err_code: 0,
            err_msg: "success".to_string(),
            trace_id: trace_id.to_string(),
            data: Some(data),
        }),
    )
        .into_response()
}

fn to_custom_error_code(code: &str) -> i32 {
    match code {
        "bad_request" => 1001,
        "not_found" => 1004,
        "internal_error" => 1500,
        "upstream_error" => 1502,
        _ => 1999,
    }
}

pub fn error_response(status: StatusCode, trace_id: &str, code: &str, msg: &str) -> Response {
    (
        status,
        Json(ApiResponse::<Value> {
            err_code: to_custom_error_code(code),
            err_msg: msg.to_string(),
            trace_id: trace_id.to_string(),
            data: None,
        }),
    )
        .into_response()
}

/// Status and envelope code for a storage failure.
pub fn storage_error_response(trace_id: &str, err: &StorageError) -> Response {
    match err {
        e if e.is_validation() => {
            error_response(StatusCode::BAD_REQUEST, trace_id, "bad_request", &e.to_string())
        }
        e if e.is_not_found() => {
            error_response(StatusCode::NOT_FOUND, trace_id, "not_found", &e.to_string())
        }
        StorageError::Service { .. } => {
            tracing::error!(error = %err, "Storage call failed");
            error_response(StatusCode::BAD_GATEWAY, trace_id, "upstream_error", &err.to_string())
        }
        _ => {
            tracing::error!(error = %err, "Storage error");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                trace_id,
                "internal_error",
                &err.to_string(),
            )
        }
    }
}

/// Status and envelope code for a notification failure.
pub fn notify_error_response(trace_id: &str, err: &NotifyError) -> Response {
    match err {
        e if e.is_validation() => {
            error_response(StatusCode::BAD_REQUEST, trace_id, "bad_request", &e.to_string())
        }
        NotifyError::Provider { .. } => error_response(
            StatusCode::BAD_GATEWAY,
            trace_id,
            "upstream_error",
            &format!("Failed to send email: {err}"),
        ),
        _ => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            trace_id,
            "internal_error",
            &err.to_string(),
        ),
    }
}

#[derive(Serialize, ToSchema)]
struct HealthResponse {
    version: String,
    uptime_secs: i64,
    alerts_bucket: String,
    triggers_bucket: String,
    storage_backend: String,
}

/// Service health and configured buckets.
#[utoipa::path(
    get,
    path = "/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service health", body = HealthResponse)
    )
)]
async fn health(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let uptime = (Utc::now() - state.start_time).num_seconds();
    success_response(
        StatusCode::OK,
        &trace_id,
        HealthResponse {
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_secs: uptime,
            alerts_bucket: state.alerts.gateway().bucket().to_string(),
            triggers_bucket: state.triggers.gateway().bucket().to_string(),
            storage_backend: state.alerts.gateway().store().backend().to_string(),
        },
    )
}

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health))
        .merge(triggers::trigger_routes())
        .merge(alerts::alert_routes())
        .merge(email::email_routes())
}
