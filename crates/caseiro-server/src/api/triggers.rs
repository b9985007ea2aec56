use crate::api::{error_response, storage_error_response, success_response};
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use caseiro_common::triggers::TRIGGERS;
use caseiro_common::types::{RelatedMessage, TriggerEvent};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// One entry of the trigger table.
#[derive(Serialize, ToSchema)]
pub struct TriggerDefinitionResponse {
    /// Label shown in the drop-down, e.g. `trigger amonia`.
    pub label: String,
    /// Path segment under the triggers prefix, e.g. `ammonia`.
    pub key: String,
    pub message: String,
}

#[derive(Deserialize, ToSchema)]
pub struct SendTriggerRequest {
    pub label: String,
}

#[derive(Serialize, ToSchema)]
pub struct TriggerEventResponse {
    pub s3_key: String,
    /// `s3://bucket/key` of the written object.
    pub s3_uri: String,
    pub content: String,
    pub timestamp: String,
    pub trigger_key: String,
}

#[derive(Serialize, ToSchema)]
pub struct RelatedMessageResponse {
    pub s3_key: String,
    pub s3_uri: String,
    pub content: String,
}

#[derive(Serialize, ToSchema)]
pub struct SendTriggerResponse {
    pub trigger: TriggerEventResponse,
    /// Newest related message, when one already exists.
    pub related: Option<RelatedMessageResponse>,
}

fn event_response(state: &AppState, event: TriggerEvent) -> TriggerEventResponse {
    TriggerEventResponse {
        s3_uri: state.triggers.gateway().uri(&event.s3_key),
        s3_key: event.s3_key,
        content: event.content,
        timestamp: event.timestamp,
        trigger_key: event.trigger_key,
    }
}

fn related_response(state: &AppState, msg: RelatedMessage) -> RelatedMessageResponse {
    RelatedMessageResponse {
        s3_uri: state.triggers.gateway().uri(&msg.s3_key),
        s3_key: msg.s3_key,
        content: msg.content,
    }
}

/// Trigger labels the dashboard can send.
#[utoipa::path(
    get,
    path = "/v1/triggers",
    tag = "Triggers",
    responses(
        (status = 200, description = "Trigger table", body = Vec<TriggerDefinitionResponse>)
    )
)]
async fn list_triggers(Extension(trace_id): Extension<TraceId>) -> impl IntoResponse {
    let items: Vec<TriggerDefinitionResponse> = TRIGGERS
        .iter()
        .map(|t| TriggerDefinitionResponse {
            label: t.label.to_string(),
            key: t.key.to_string(),
            message: t.message.to_string(),
        })
        .collect();
    success_response(StatusCode::OK, &trace_id, items)
}

/// Writes a trigger object, then looks up its related message.
#[utoipa::path(
    post,
    path = "/v1/triggers",
    tag = "Triggers",
    request_body = SendTriggerRequest,
    responses(
        (status = 201, description = "Trigger written", body = SendTriggerResponse),
        (status = 400, description = "Unknown trigger label", body = crate::api::ApiError),
        (status = 502, description = "Storage call failed", body = crate::api::ApiError)
    )
)]
async fn send_trigger(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Json(req): Json<SendTriggerRequest>,
) -> impl IntoResponse {
    let event = match state.triggers.send_trigger(&req.label).await {
        Ok(event) => event,
        Err(e) => return storage_error_response(&trace_id, &e),
    };

    let related = match state.triggers.find_related_message(&event.trigger_key).await {
        Ok(related) => related,
        Err(e) => return storage_error_response(&trace_id, &e),
    };

    success_response(
        StatusCode::CREATED,
        &trace_id,
        SendTriggerResponse {
            related: related.map(|m| related_response(&state, m)),
            trigger: event_response(&state, event),
        },
    )
}

/// Newest `.txt` under `messages/{key}/` or `info/{key}/`.
#[utoipa::path(
    get,
    path = "/v1/triggers/{key}/related",
    tag = "Triggers",
    params(("key" = String, Path, description = "Trigger key, e.g. ammonia")),
    responses(
        (status = 200, description = "Related message", body = RelatedMessageResponse),
        (status = 404, description = "No related message yet", body = crate::api::ApiError)
    )
)]
async fn related_message(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> impl IntoResponse {
    match state.triggers.find_related_message(&key).await {
        Ok(Some(msg)) => success_response(StatusCode::OK, &trace_id, related_response(&state, msg)),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            &trace_id,
            "not_found",
            "No related message found yet.",
        ),
        Err(e) => storage_error_response(&trace_id, &e),
    }
}

pub fn trigger_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_triggers, send_trigger))
        .routes(routes!(related_message))
}
