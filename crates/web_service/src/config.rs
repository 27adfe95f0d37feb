use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_POLL_SECS: u64 = 30;

/// Process-level configuration for the dashboard backend.
///
/// Read once at startup and passed into [`crate::server::run`]; handlers see
/// it through `AppState` rather than ambient lookups.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Root directory the artifacts panel is allowed to read from.
    pub workspace_root: PathBuf,
    /// Interval of the gateway status poll.
    pub status_poll_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace_root: dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("workspace"),
            status_poll_interval: Duration::from_secs(DEFAULT_POLL_SECS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut config = AppConfig::default();
        if let Ok(root) = std::env::var("WORKSPACE_ROOT") {
            if !root.trim().is_empty() {
                config.workspace_root = PathBuf::from(root);
            }
        }
        if let Some(secs) = std::env::var("STATUS_POLL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.status_poll_interval = Duration::from_secs(secs.max(1));
        }
        config
    }
}
