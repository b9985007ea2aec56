use crate::api::{storage_error_response, success_response};
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use caseiro_common::time::display_parts;
use caseiro_common::types::AlertRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// A stored alert with its temporary read link.
#[derive(Serialize, ToSchema)]
pub struct AlertResponse {
    pub key: String,
    /// `s3://bucket/key`
    pub s3_uri: String,
    pub presigned_url: String,
    /// Storage last-modified time.
    pub ts: DateTime<Utc>,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM:SS`
    pub time: String,
    /// The `alert` field, when the document has one.
    pub alert: Option<String>,
    /// Full document, or `{"parse_error": "..."}` when it could not be read.
    #[schema(value_type = Object)]
    pub data: Value,
}

impl AlertResponse {
    pub fn from_record(state: &AppState, record: AlertRecord) -> Self {
        let (date, time) = display_parts(record.ts);
        Self {
            s3_uri: state.alert_uri(&record.key),
            alert: record.alert_text().map(str::to_string),
            key: record.key,
            presigned_url: record.presigned_url,
            ts: record.ts,
            date,
            time,
            data: record.data,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
struct ListAlertsParams {
    /// Maximum number of alerts; 0 or absent means all.
    #[param(required = false)]
    limit: Option<usize>,
}

/// Most recently modified alert.
#[utoipa::path(
    get,
    path = "/v1/alerts/latest",
    tag = "Alerts",
    responses(
        (status = 200, description = "Latest alert", body = AlertResponse),
        (status = 404, description = "No alerts stored", body = crate::api::ApiError),
        (status = 502, description = "Storage call failed", body = crate::api::ApiError)
    )
)]
async fn latest_alert(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match state.alerts.get_latest().await {
        Ok(record) => success_response(
            StatusCode::OK,
            &trace_id,
            AlertResponse::from_record(&state, record),
        ),
        Err(e) => storage_error_response(&trace_id, &e),
    }
}

/// Alerts newest first.
#[utoipa::path(
    get,
    path = "/v1/alerts",
    tag = "Alerts",
    params(ListAlertsParams),
    responses(
        (status = 200, description = "Alerts, newest first", body = Vec<AlertResponse>),
        (status = 502, description = "Storage call failed", body = crate::api::ApiError)
    )
)]
async fn list_alerts(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Query(params): Query<ListAlertsParams>,
) -> impl IntoResponse {
    match state.alerts.get_all(params.limit).await {
        Ok(records) => {
            let items: Vec<AlertResponse> = records
                .into_iter()
                .map(|r| AlertResponse::from_record(&state, r))
                .collect();
            success_response(StatusCode::OK, &trace_id, items)
        }
        Err(e) => storage_error_response(&trace_id, &e),
    }
}

pub fn alert_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(latest_alert))
        .routes(routes!(list_alerts))
}
