use crate::config::ReactorConfig;
use crate::error::{ReactorError, Result};
use crate::event::{basename_no_ext, parse_event, ObjectRef};
use crate::response::ReactorResponse;
use caseiro_ai::HostedAgent;
use caseiro_common::time::iso_micros;
use caseiro_common::types::{AlertDocument, SourceRef};
use caseiro_notify::SmsChannel;
use caseiro_storage::ObjectStore;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

const ALERT_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// What one successful invocation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedAlert {
    pub output_key: String,
    pub output_uri: String,
    pub document: AlertDocument,
    pub sms_message_id: Option<String>,
}

/// Turns one storage event into an alert document plus an SMS.
///
/// Holds no state between invocations.
#[derive(Clone)]
pub struct Reactor {
    store: Arc<dyn ObjectStore>,
    agent: Arc<dyn HostedAgent>,
    sms: SmsChannel,
    output_bucket: String,
    alerts_prefix: String,
}

impl Reactor {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        agent: Arc<dyn HostedAgent>,
        sms: SmsChannel,
        config: &ReactorConfig,
    ) -> Self {
        Self {
            store,
            agent,
            sms,
            output_bucket: config.output_bucket.clone(),
            alerts_prefix: config.alerts_prefix.clone(),
        }
    }

    /// Entry point: never fails, every error becomes a 400 or 500 response.
    pub async fn handle(&self, event: &Value) -> ReactorResponse {
        match self.process(event).await {
            Ok(done) => ReactorResponse::success(&done.output_uri, &done.document.alert),
            Err(e) if e.is_bad_request() => {
                let message = e.to_string();
                tracing::error!(error = %message, "Rejected storage event");
                ReactorResponse::bad_request(&message)
            }
            Err(e) => {
                tracing::error!(error = %e, "Reactor invocation failed");
                ReactorResponse::server_error(&e.to_string())
            }
        }
    }

    /// Read source, ask the agent, write the alert, then send the SMS.
    ///
    /// A failed SMS leaves the written alert in place.
    pub async fn process(&self, event: &Value) -> Result<ProcessedAlert> {
        tracing::info!(event = %event, "Received storage event");
        let ObjectRef { bucket, key } = parse_event(event)?;

        tracing::info!(bucket = %bucket, key = %key, "Reading source object");
        let body = self.store.get_object(&bucket, &key).await?;
        let prompt = String::from_utf8(body).map_err(|source| ReactorError::SourceNotUtf8 {
            key: key.clone(),
            source,
        })?;

        let session_id = Uuid::new_v4().to_string();
        tracing::info!(
            provider = self.agent.provider(),
            agent_id = self.agent.agent_id(),
            agent_alias_id = self.agent.agent_alias_id(),
            region = self.agent.region(),
            session_id = %session_id,
            "Invoking agent"
        );
        let answer = self.agent.invoke(&prompt, &session_id).await?.trim().to_string();
        tracing::info!(answer = %answer, "Agent answered");

        let output_key = format!("{}{}.json", self.alerts_prefix, basename_no_ext(&key));
        let output_uri = format!("s3://{}/{}", self.output_bucket, output_key);
        let document = AlertDocument {
            generated_at: iso_micros(Utc::now()),
            agent: self.agent.identity(&session_id),
            source: SourceRef { bucket, key },
            alert: answer,
        };

        tracing::info!(output = %output_uri, "Writing alert");
        let payload = serde_json::to_vec_pretty(&document)?;
        self.store
            .put_object(&self.output_bucket, &output_key, payload, Some(ALERT_CONTENT_TYPE))
            .await?;

        tracing::info!(destination = self.sms.destination(), "Sending SMS");
        let sms_message_id = self.sms.send(&document.alert).await?;

        Ok(ProcessedAlert {
            output_key,
            output_uri,
            document,
            sms_message_id,
        })
    }
}
