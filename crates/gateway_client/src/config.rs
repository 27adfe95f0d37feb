use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_agent_id")]
    pub agent_id: String,
}

const CONFIG_FILE_PATH: &str = "config.toml";

fn default_base_url() -> String {
    "http://127.0.0.1:18789".to_string()
}

fn default_model() -> String {
    "clawdbot:main".to_string()
}

fn default_agent_id() -> String {
    "main".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            password: String::new(),
            token: String::new(),
            model: default_model(),
            agent_id: default_agent_id(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from `config.toml` (when present), then apply
    /// environment overrides.
    pub fn new() -> Self {
        let mut config = GatewayConfig::default();

        if std::path::Path::new(CONFIG_FILE_PATH).exists() {
            if let Ok(content) = std::fs::read_to_string(CONFIG_FILE_PATH) {
                if let Ok(file_config) = toml::from_str::<GatewayConfig>(&content) {
                    config = file_config;
                }
            }
        }

        if let Ok(base_url) = std::env::var("GATEWAY_URL") {
            config.base_url = base_url;
        }
        if let Ok(password) = std::env::var("GATEWAY_PASSWORD") {
            config.password = password;
        }
        if let Ok(token) = std::env::var("GATEWAY_TOKEN") {
            config.token = token;
        }
        if let Ok(model) = std::env::var("GATEWAY_MODEL") {
            config.model = model;
        }
        config
    }

    /// Bearer value for the `Authorization` header. The shared password wins
    /// over the session token when both are configured.
    pub fn auth_header(&self) -> String {
        if !self.password.is_empty() {
            format!("Bearer {}", self.password)
        } else {
            format!("Bearer {}", self.token)
        }
    }
}
