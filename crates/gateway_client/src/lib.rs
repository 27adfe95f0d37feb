//! HTTP client for the assistant gateway.
//!
//! The gateway is an always-on local process that runs the agent, manages
//! sessions and scheduled jobs, and exposes tool invocation over HTTP. This
//! crate wraps its two endpoints (`/tools/invoke` and `/v1/chat/completions`)
//! and owns the SSE token aggregation for streaming chat responses.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod sse;

pub use client::GatewayClient;
pub use config::GatewayConfig;
pub use error::GatewayError;
pub use models::{ChatMessage, Role, ToolResponse};
pub use sse::{aggregate, SseLineParser, StreamOutcome};
