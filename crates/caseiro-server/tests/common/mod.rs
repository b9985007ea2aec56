#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use caseiro_notify::error::{NotifyError, Result as NotifyResult};
use caseiro_notify::{EmailChannel, EmailTransport, OutgoingEmail};
use caseiro_server::app;
use caseiro_server::config::ServerConfig;
use caseiro_server::state::AppState;
use caseiro_storage::memory::MemoryObjectStore;
use caseiro_storage::{AlertStore, Gateway, TriggerDispatcher};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

pub const ALERTS_BUCKET: &str = "alertas-caseiro";
pub const TRIGGERS_BUCKET: &str = "aviario-metrics";

#[derive(Default)]
pub struct RecordingEmail {
    pub sent: Mutex<Vec<OutgoingEmail>>,
    pub fail: Mutex<bool>,
}

#[async_trait]
impl EmailTransport for RecordingEmail {
    async fn deliver(&self, email: &OutgoingEmail) -> NotifyResult<()> {
        if *self.fail.lock().unwrap() {
            return Err(NotifyError::provider(
                "SES",
                "MessageRejected: Email address is not verified",
            ));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }

    fn transport_name(&self) -> &str {
        "recording"
    }
}

pub struct TestContext {
    pub store: Arc<MemoryObjectStore>,
    pub email: Arc<RecordingEmail>,
    pub state: AppState,
    pub app: axum::Router,
}

impl TestContext {
    pub fn sent_emails(&self) -> Vec<OutgoingEmail> {
        self.email.sent.lock().unwrap().clone()
    }
}

pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.email.sender = "Caseiro Alerts <alerts@example.com>".to_string();
    config.email.recipients = vec!["maintenance@company.com".to_string()];
    config
}

pub fn build_test_context() -> Result<TestContext> {
    build_test_context_with(test_config())
}

pub fn build_test_context_with(config: ServerConfig) -> Result<TestContext> {
    // one in-memory backend serves both buckets
    let store = Arc::new(MemoryObjectStore::new());
    let email = Arc::new(RecordingEmail::default());

    let alerts = AlertStore::new(
        Gateway::new(store.clone(), config.alerts.bucket.clone()),
        config.alerts.prefix.clone(),
        config.presign_minutes,
    );
    let triggers = TriggerDispatcher::new(
        Gateway::new(store.clone(), config.triggers.bucket.clone()),
        config.triggers.prefix.clone(),
        config.triggers.source_tag.clone(),
    );
    let state = AppState::new(config, alerts, triggers, EmailChannel::new(email.clone()))?;
    let app = app::build_http_app(state.clone());

    Ok(TestContext {
        store,
        email,
        state,
        app,
    })
}

pub fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 20, 21, minute, 0).unwrap()
}

/// Stores an alert document under `alerts/<name>.json`.
pub fn put_alert(ctx: &TestContext, name: &str, alert: &str, ts: DateTime<Utc>) {
    let doc = serde_json::json!({
        "generated_at": "2025-09-20T21:28:40.000000Z",
        "agent": {
            "agentId": "QAYKR34TMW",
            "agentAliasId": "TSTALIASID",
            "region": "us-east-1",
            "sessionId": "s-1"
        },
        "source": { "bucket": TRIGGERS_BUCKET, "key": format!("{name}.txt") },
        "alert": alert
    });
    ctx.store.insert_at(
        ALERTS_BUCKET,
        &format!("alerts/{name}.json"),
        serde_json::to_vec_pretty(&doc).unwrap(),
        ts,
    );
}

async fn send(app: &axum::Router, req: Request<Body>) -> (StatusCode, Vec<u8>, Option<String>) {
    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("request should be handled");
    let status = resp.status();
    let trace_id = resp
        .headers()
        .get("x-trace-id")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should read");
    (status, bytes.to_vec(), trace_id)
}

fn to_json(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice::<Value>(bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).to_string()))
    }
}

pub async fn request_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value, Option<String>) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.unwrap_or(Value::Null).to_string()))
        .expect("request should build");
    let (status, bytes, trace_id) = send(app, req).await;
    (status, to_json(&bytes), trace_id)
}

pub async fn request_no_body(
    app: &axum::Router,
    method: &str,
    uri: &str,
) -> (StatusCode, Value, Option<String>) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    let (status, bytes, trace_id) = send(app, req).await;
    (status, to_json(&bytes), trace_id)
}

/// Posts `form` (already url-encoded) and returns the rendered page.
pub async fn post_form(app: &axum::Router, uri: &str, form: &str) -> (StatusCode, String) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .expect("request should build");
    let (status, bytes, _) = send(app, req).await;
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

pub async fn get_page(app: &axum::Router, uri: &str) -> (StatusCode, String) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    let (status, bytes, _) = send(app, req).await;
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

pub fn assert_ok_envelope(json: &Value) {
    assert_eq!(json["err_code"], 0);
    assert!(json["err_msg"].is_string());
    assert!(json.get("trace_id").is_some());
}

pub fn assert_err_envelope(json: &Value, err_code: i32) {
    assert_eq!(json["err_code"], err_code);
    assert!(json["err_msg"].is_string());
    assert!(json.get("trace_id").is_some());
    assert!(json.get("data").is_some());
    assert!(json["data"].is_null());
}
