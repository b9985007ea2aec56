//! Server-rendered dashboard.
//!
//! Every action renders the whole page from its own result. The email form
//! carries the key of the alert it sends, so no session state is kept.

use crate::api::email::{email_alert, EmailAlertError};
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use caseiro_common::time::display_parts;
use caseiro_common::triggers;
use caseiro_common::types::AlertRecord;
use caseiro_notify::error::NotifyError;
use caseiro_notify::utils::parse_recipients;
use handlebars::Handlebars;
use serde::{Deserialize, Serialize};

const PAGE: &str = "dashboard";
const MISSING_ALERT: &str = "—";

/// Compiled page templates.
pub struct Pages {
    registry: Handlebars<'static>,
}

impl Pages {
    pub fn new() -> anyhow::Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_template_string(PAGE, include_str!("templates/dashboard.html"))?;
        Ok(Self { registry })
    }

    fn render(&self, view: &PageView) -> Response {
        match self.registry.render(PAGE, view) {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to render dashboard");
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
            }
        }
    }
}

#[derive(Serialize)]
struct LabelOption {
    label: &'static str,
    selected: bool,
}

#[derive(Serialize)]
struct Notice {
    kind: &'static str,
    text: String,
}

#[derive(Serialize)]
struct ObjectView {
    uri: String,
    content: String,
}

#[derive(Serialize)]
struct AlertCard {
    index: usize,
    date: String,
    time: String,
    message: String,
    raw_json: String,
    source_uri: String,
    presigned_url: String,
}

#[derive(Serialize)]
struct PageView {
    triggers_bucket: String,
    labels: Vec<LabelOption>,
    notices: Vec<Notice>,
    trigger: Option<ObjectView>,
    related: Option<ObjectView>,
    alerts: Vec<AlertCard>,
    email_alert_key: String,
    recipients: String,
}

impl PageView {
    fn new(state: &AppState) -> Self {
        Self {
            triggers_bucket: state.triggers.gateway().bucket().to_string(),
            labels: label_options(None),
            notices: Vec::new(),
            trigger: None,
            related: None,
            alerts: Vec::new(),
            email_alert_key: String::new(),
            recipients: state.config.default_recipients(),
        }
    }

    fn notice(&mut self, kind: &'static str, text: impl Into<String>) {
        self.notices.push(Notice {
            kind,
            text: text.into(),
        });
    }

    fn show_alerts(&mut self, state: &AppState, records: &[AlertRecord]) {
        self.alerts = records
            .iter()
            .enumerate()
            .map(|(i, record)| alert_card(state, i + 1, record))
            .collect();
        // latest, or the first of the list
        self.email_alert_key = records.first().map(|r| r.key.clone()).unwrap_or_default();
    }
}

fn label_options(selected: Option<&str>) -> Vec<LabelOption> {
    triggers::labels()
        .enumerate()
        .map(|(i, label)| LabelOption {
            label,
            selected: selected.map_or(i == 0, |s| s == label),
        })
        .collect()
}

fn alert_card(state: &AppState, index: usize, record: &AlertRecord) -> AlertCard {
    let (date, time) = display_parts(record.ts);
    AlertCard {
        index,
        date,
        time,
        message: record.alert_text().unwrap_or(MISSING_ALERT).to_string(),
        raw_json: record.pretty_data(),
        source_uri: state.alert_uri(&record.key),
        presigned_url: record.presigned_url.clone(),
    }
}

async fn index(State(state): State<AppState>) -> Response {
    state.pages.render(&PageView::new(&state))
}

#[derive(Deserialize)]
struct TriggerForm {
    label: String,
}

async fn send_trigger(State(state): State<AppState>, Form(form): Form<TriggerForm>) -> Response {
    let mut view = PageView::new(&state);
    view.labels = label_options(Some(&form.label));

    match state.triggers.send_trigger(&form.label).await {
        Ok(event) => {
            let uri = state.triggers.gateway().uri(&event.s3_key);
            view.notice("success", format!("Trigger sent: {uri}"));
            view.trigger = Some(ObjectView {
                uri,
                content: event.content,
            });

            match state.triggers.find_related_message(&event.trigger_key).await {
                Ok(Some(msg)) => {
                    view.notice("info", "Related message found:");
                    view.related = Some(ObjectView {
                        uri: state.triggers.gateway().uri(&msg.s3_key),
                        content: msg.content,
                    });
                }
                Ok(None) => view.notice("warning", "No related message found yet."),
                Err(e) => view.notice("error", e.to_string()),
            }
        }
        Err(e) => view.notice("error", e.to_string()),
    }

    state.pages.render(&view)
}

async fn latest_alert(State(state): State<AppState>) -> Response {
    let mut view = PageView::new(&state);
    match state.alerts.get_latest().await {
        Ok(record) => {
            view.notice("success", "Latest message loaded.");
            view.show_alerts(&state, std::slice::from_ref(&record));
        }
        Err(e) => view.notice("error", e.to_string()),
    }
    state.pages.render(&view)
}

async fn all_alerts(State(state): State<AppState>) -> Response {
    let mut view = PageView::new(&state);
    match state.alerts.get_all(None).await {
        Ok(records) if records.is_empty() => view.notice("info", "No messages found."),
        Ok(records) => {
            view.notice("success", format!("Loaded {} message(s).", records.len()));
            view.show_alerts(&state, &records);
        }
        Err(e) => view.notice("error", e.to_string()),
    }
    state.pages.render(&view)
}

#[derive(Deserialize)]
struct EmailForm {
    #[serde(default)]
    alert_key: String,
    #[serde(default)]
    recipients: String,
}

async fn send_email(State(state): State<AppState>, Form(form): Form<EmailForm>) -> Response {
    let mut view = PageView::new(&state);
    view.recipients = form.recipients.clone();
    view.email_alert_key = form.alert_key.trim().to_string();

    if view.email_alert_key.is_empty() {
        view.notice("error", "Load a message first.");
        return state.pages.render(&view);
    }

    let recipients = parse_recipients(&form.recipients);
    match email_alert(&state, Some(&view.email_alert_key), &recipients).await {
        Ok((record, _)) => {
            view.notice("success", "Email sent to maintenance.");
            view.show_alerts(&state, std::slice::from_ref(&record));
        }
        Err(EmailAlertError::Notify(NotifyError::NoRecipients)) => {
            view.notice("error", "Please enter at least one recipient email.");
        }
        Err(EmailAlertError::Notify(e)) if !e.is_validation() => {
            view.notice("error", format!("Failed to send email: {e}"));
        }
        Err(e) => view.notice("error", e.to_string()),
    }
    state.pages.render(&view)
}

pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/ui/trigger", post(send_trigger))
        .route("/ui/alerts/latest", post(latest_alert))
        .route("/ui/alerts/all", post(all_alerts))
        .route("/ui/email", post(send_email))
}
