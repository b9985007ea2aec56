use crate::config::ServerConfig;
use crate::ui::Pages;
use caseiro_notify::{AlertEmailRenderer, EmailChannel};
use caseiro_storage::{AlertStore, TriggerDispatcher};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Shared, read-only handler state.
#[derive(Clone)]
pub struct AppState {
    pub alerts: Arc<AlertStore>,
    pub triggers: Arc<TriggerDispatcher>,
    pub email: EmailChannel,
    pub renderer: Arc<AlertEmailRenderer>,
    pub pages: Arc<Pages>,
    pub start_time: DateTime<Utc>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        alerts: AlertStore,
        triggers: TriggerDispatcher,
        email: EmailChannel,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            alerts: Arc::new(alerts),
            triggers: Arc::new(triggers),
            email,
            renderer: Arc::new(AlertEmailRenderer::new()?),
            pages: Arc::new(Pages::new()?),
            start_time: Utc::now(),
            config: Arc::new(config),
        })
    }

    /// `s3://<alerts bucket>/<key>`
    pub fn alert_uri(&self, key: &str) -> String {
        self.alerts.gateway().uri(key)
    }
}
