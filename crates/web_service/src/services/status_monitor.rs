//! Background gateway health poll.
//!
//! The dashboard's status bar wants a cheap "is the gateway up" answer on
//! every page poll. Instead of probing the gateway per request, one repeating
//! timer task polls `session_status` on a fixed interval and caches the last
//! result; the task is cancelled on server shutdown.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use gateway_client::GatewayClient;
use log::debug;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Serialize)]
pub struct GatewayStatus {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl GatewayStatus {
    fn disconnected(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(error.into()),
            checked_at: Utc::now(),
        }
    }
}

pub struct StatusMonitor {
    latest: Arc<RwLock<Option<GatewayStatus>>>,
    cancel: CancellationToken,
}

impl StatusMonitor {
    /// Start the poll task. Performs one immediate check, then repeats on
    /// `interval` until [`shutdown`](Self::shutdown).
    pub fn spawn(gateway: Arc<GatewayClient>, interval: Duration) -> Self {
        let latest = Arc::new(RwLock::new(None));
        let cancel = CancellationToken::new();

        let cache = Arc::clone(&latest);
        let token = cancel.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!("status monitor stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        let status = poll_once(&gateway).await;
                        *cache.write().await = Some(status);
                    }
                }
            }
        });

        Self { latest, cancel }
    }

    /// Last observed status, if a poll has completed yet.
    pub async fn latest(&self) -> Option<GatewayStatus> {
        self.latest.read().await.clone()
    }

    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for StatusMonitor {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_once(gateway: &GatewayClient) -> GatewayStatus {
    match gateway.session_status().await {
        Ok(response) => match response.into_result() {
            Ok(result) => GatewayStatus {
                ok: true,
                result,
                error: None,
                checked_at: Utc::now(),
            },
            Err(err) => GatewayStatus::disconnected(err.to_string()),
        },
        Err(err) => {
            debug!("gateway status poll failed: {err}");
            GatewayStatus::disconnected("Connection failed")
        }
    }
}
