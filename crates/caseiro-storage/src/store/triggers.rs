use crate::error::{Result, StorageError};
use crate::{has_extension, Gateway, ObjectMeta};
use caseiro_common::time::{date_path, iso_micros};
use caseiro_common::triggers;
use caseiro_common::types::{RelatedMessage, TriggerEvent};
use chrono::{DateTime, Utc};

pub const DEFAULT_TRIGGERS_PREFIX: &str = "triggers/";
pub const DEFAULT_SOURCE_TAG: &str = "Caseiro-UI";

/// Writes trigger text objects and finds the messages downstream processes
/// leave for them.
#[derive(Clone)]
pub struct TriggerDispatcher {
    gateway: Gateway,
    prefix: String,
    source_tag: String,
}

impl TriggerDispatcher {
    pub fn new(gateway: Gateway, prefix: impl Into<String>, source_tag: impl Into<String>) -> Self {
        Self {
            gateway,
            prefix: prefix.into(),
            source_tag: source_tag.into(),
        }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub async fn send_trigger(&self, label: &str) -> Result<TriggerEvent> {
        self.send_trigger_at(label, Utc::now()).await
    }

    /// Writes `<prefix><key>/<yyyy>/<mm>/<dd>/<ts>.txt` for `label` at `now`.
    ///
    /// # Errors
    ///
    /// [`StorageError::UnknownTrigger`] before any write when the label is
    /// not in the trigger table.
    pub async fn send_trigger_at(&self, label: &str, now: DateTime<Utc>) -> Result<TriggerEvent> {
        let def = triggers::lookup(label)
            .ok_or_else(|| StorageError::UnknownTrigger(label.to_string()))?;

        let timestamp = iso_micros(now);
        let content =
            TriggerEvent::render_content(def.message, &timestamp, def.key, &self.source_tag);
        let key = format!("{}{}/{}/{}.txt", self.prefix, def.key, date_path(now), timestamp);

        self.gateway
            .put_object(&key, content.clone().into_bytes(), Some("text/plain; charset=utf-8"))
            .await?;

        tracing::info!(
            trigger_key = def.key,
            object = %self.gateway.uri(&key),
            "Trigger sent"
        );

        Ok(TriggerEvent {
            s3_key: key,
            content,
            timestamp,
            trigger_key: def.key.to_string(),
        })
    }

    /// Default search prefixes for a trigger key.
    pub fn related_prefixes(trigger_key: &str) -> Vec<String> {
        vec![
            format!("messages/{trigger_key}/"),
            format!("info/{trigger_key}/"),
        ]
    }

    pub async fn find_related_message(&self, trigger_key: &str) -> Result<Option<RelatedMessage>> {
        self.find_related_message_in(&Self::related_prefixes(trigger_key))
            .await
    }

    /// Newest `.txt` across all `prefixes`. A later object must be strictly
    /// newer to replace an earlier one.
    pub async fn find_related_message_in(&self, prefixes: &[String]) -> Result<Option<RelatedMessage>> {
        let mut latest: Option<ObjectMeta> = None;
        for prefix in prefixes {
            for obj in self.gateway.list_objects(prefix).await? {
                if !has_extension(&obj.key, ".txt") {
                    continue;
                }
                let newer = latest
                    .as_ref()
                    .map_or(true, |current| obj.last_modified > current.last_modified);
                if newer {
                    latest = Some(obj);
                }
            }
        }

        let Some(meta) = latest else {
            return Ok(None);
        };

        match self.gateway.get_object(&meta.key).await {
            Ok(body) => Ok(Some(RelatedMessage {
                s3_key: meta.key,
                content: String::from_utf8_lossy(&body).into_owned(),
            })),
            Err(e) => {
                tracing::warn!(key = %meta.key, error = %e, "Failed to read related message");
                Ok(None)
            }
        }
    }
}
