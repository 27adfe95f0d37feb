use thiserror::Error;

pub type Result<T, E = GatewayError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("gateway returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("stream error: {0}")]
    Stream(String),

    #[error("gateway error ({kind}): {message}")]
    Gateway { kind: String, message: String },

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
