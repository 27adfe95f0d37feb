use std::env;

use gateway_client::GatewayConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use web_service::AppConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_line_number(true)
                .with_file(false),
        )
        .init();

    tracing::info!("Starting Mission Control backend...");

    let port = env::var("APP_PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8080);

    let config = AppConfig::from_env();
    let gateway_config = GatewayConfig::new();

    if let Err(e) = web_service::server::run(config, gateway_config, port).await {
        tracing::error!("Failed to run web service: {}", e);
        std::process::exit(1);
    }
}
