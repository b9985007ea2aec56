use crate::api::{notify_error_response, storage_error_response, success_response};
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use caseiro_common::types::AlertRecord;
use caseiro_notify::error::NotifyError;
use caseiro_notify::utils::clean_recipients;
use caseiro_storage::error::StorageError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

#[derive(Debug, thiserror::Error)]
pub enum EmailAlertError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

impl EmailAlertError {
    pub fn into_response(self, trace_id: &str) -> Response {
        match self {
            Self::Storage(e) => storage_error_response(trace_id, &e),
            Self::Notify(e) => notify_error_response(trace_id, &e),
        }
    }
}

/// Emails one alert: the one at `alert_key`, or the latest when absent.
///
/// Recipients and the sender are checked before any storage or email call.
pub async fn email_alert(
    state: &AppState,
    alert_key: Option<&str>,
    recipients: &[String],
) -> Result<(AlertRecord, Vec<String>), EmailAlertError> {
    let recipients = clean_recipients(recipients);
    if recipients.is_empty() {
        return Err(NotifyError::NoRecipients.into());
    }
    if state.config.email.sender.trim().is_empty() {
        return Err(NotifyError::MissingSender.into());
    }

    let record = match alert_key.map(str::trim).filter(|k| !k.is_empty()) {
        Some(key) => state.alerts.get(key).await?,
        None => state.alerts.get_latest().await?,
    };

    let email = state
        .renderer
        .render(&record, &state.alert_uri(&record.key))?;
    state
        .email
        .send(
            &state.config.email.sender,
            &recipients,
            &email.subject,
            &email.html_body,
            &email.text_body,
        )
        .await?;

    Ok((record, recipients))
}

#[derive(Deserialize, ToSchema)]
pub struct EmailAlertRequest {
    /// Alert to send; the latest alert when omitted.
    #[serde(default)]
    pub alert_key: Option<String>,
    /// Defaults to the configured recipients when omitted.
    #[serde(default)]
    pub recipients: Option<Vec<String>>,
}

#[derive(Serialize, ToSchema)]
pub struct EmailAlertResponse {
    pub alert_key: String,
    pub recipients: Vec<String>,
}

/// Emails an alert to maintenance through SES.
#[utoipa::path(
    post,
    path = "/v1/alerts/email",
    tag = "Alerts",
    request_body = EmailAlertRequest,
    responses(
        (status = 200, description = "Email sent", body = EmailAlertResponse),
        (status = 400, description = "No recipients or sender", body = crate::api::ApiError),
        (status = 404, description = "Alert not found", body = crate::api::ApiError),
        (status = 502, description = "Email or storage call failed", body = crate::api::ApiError)
    )
)]
async fn send_alert_email(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Json(req): Json<EmailAlertRequest>,
) -> impl IntoResponse {
    let recipients = req
        .recipients
        .unwrap_or_else(|| state.config.email.recipients.clone());

    match email_alert(&state, req.alert_key.as_deref(), &recipients).await {
        Ok((record, recipients)) => success_response(
            StatusCode::OK,
            &trace_id,
            EmailAlertResponse {
                alert_key: record.key,
                recipients,
            },
        ),
        Err(e) => e.into_response(&trace_id),
    }
}

pub fn email_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(send_alert_email))
}
