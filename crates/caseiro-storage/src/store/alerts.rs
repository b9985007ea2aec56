use crate::error::{Result, StorageError};
use crate::{Gateway, ObjectMeta};
use caseiro_common::types::AlertRecord;
use serde_json::{json, Value};

pub const DEFAULT_ALERTS_PREFIX: &str = "alerts/";
pub const DEFAULT_PRESIGN_MINUTES: u64 = 30;

/// Read side of the alerts prefix: newest-first listing, each record paired
/// with a pre-signed link.
#[derive(Clone)]
pub struct AlertStore {
    gateway: Gateway,
    prefix: String,
    presign_minutes: u64,
}

impl AlertStore {
    pub fn new(gateway: Gateway, prefix: impl Into<String>, presign_minutes: u64) -> Self {
        Self {
            gateway,
            prefix: prefix.into(),
            presign_minutes,
        }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The most recently modified alert.
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`] when the prefix holds no `.json` object.
    pub async fn get_latest(&self) -> Result<AlertRecord> {
        let objects = self.gateway.list_json_objects(&self.prefix).await?;
        let Some(newest) = objects.first() else {
            return Err(StorageError::NotFound("No JSON messages found.".to_string()));
        };
        self.load(newest).await
    }

    /// All alerts, newest first. `limit` of `None` or `Some(0)` means no cap.
    pub async fn get_all(&self, limit: Option<usize>) -> Result<Vec<AlertRecord>> {
        let mut objects = self.gateway.list_json_objects(&self.prefix).await?;
        if let Some(limit) = limit.filter(|l| *l > 0) {
            objects.truncate(limit);
        }

        let mut records = Vec::with_capacity(objects.len());
        for meta in &objects {
            records.push(self.load(meta).await?);
        }
        tracing::info!(
            bucket = %self.gateway.bucket(),
            prefix = %self.prefix,
            count = records.len(),
            "Loaded alerts"
        );
        Ok(records)
    }

    /// One alert by key. The key has to be listed under the alerts prefix.
    pub async fn get(&self, key: &str) -> Result<AlertRecord> {
        let objects = self.gateway.list_json_objects(&self.prefix).await?;
        match objects.iter().find(|o| o.key == key) {
            Some(meta) => self.load(meta).await,
            None => Err(StorageError::NotFound(format!("Alert not found: {key}"))),
        }
    }

    /// Reads and parses one object. Read and parse failures become a
    /// `{"parse_error": ...}` payload; presign failures propagate.
    async fn load(&self, meta: &ObjectMeta) -> Result<AlertRecord> {
        let data = match self.gateway.get_object(&meta.key).await {
            Ok(raw) => parse_alert(&raw),
            Err(e) => {
                tracing::warn!(key = %meta.key, error = %e, "Failed to read alert object");
                json!({ "parse_error": e.to_string() })
            }
        };

        let presigned_url = self.gateway.presign(&meta.key, self.presign_minutes).await?;

        Ok(AlertRecord {
            key: meta.key.clone(),
            data,
            presigned_url,
            ts: meta.last_modified,
        })
    }
}

fn parse_alert(raw: &[u8]) -> Value {
    let text = match std::str::from_utf8(raw) {
        Ok(text) => text,
        Err(e) => return json!({ "parse_error": e.to_string() }),
    };
    match serde_json::from_str::<Value>(text) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Alert object is not valid JSON");
            json!({ "parse_error": e.to_string() })
        }
    }
}
