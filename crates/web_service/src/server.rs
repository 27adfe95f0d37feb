use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use gateway_client::{GatewayClient, GatewayConfig};
use log::info;

use crate::config::AppConfig;
use crate::controllers::{
    actions_controller, artifacts_controller, chat_controller, cron_controller, keys_controller,
    status_controller,
};
use crate::services::key_store::KeyStore;
use crate::services::status_monitor::StatusMonitor;

pub struct AppState {
    pub gateway: Arc<GatewayClient>,
    pub key_store: KeyStore,
    pub status: StatusMonitor,
    pub config: AppConfig,
}

const DEFAULT_WORKER_COUNT: usize = 4;

pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(chat_controller::config)
            .configure(actions_controller::config)
            .configure(cron_controller::config)
            .configure(status_controller::config)
            .configure(artifacts_controller::config)
            .configure(keys_controller::config),
    );
}

pub async fn run(
    config: AppConfig,
    gateway_config: GatewayConfig,
    port: u16,
) -> Result<(), String> {
    info!("Starting web service...");

    let gateway = Arc::new(
        GatewayClient::new(gateway_config)
            .map_err(|e| format!("Failed to build gateway client: {e}"))?,
    );
    let status = StatusMonitor::spawn(Arc::clone(&gateway), config.status_poll_interval);

    let app_state = web::Data::new(AppState {
        gateway,
        key_store: KeyStore::open_default(),
        status,
        config,
    });
    let shutdown_state = app_state.clone();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Cors::permissive())
            .configure(app_config)
    })
    .workers(DEFAULT_WORKER_COUNT)
    .bind(("127.0.0.1", port))
    .map_err(|e| format!("Failed to bind 127.0.0.1:{port}: {e}"))?
    .run();

    info!("Web service listening on http://127.0.0.1:{port}");
    let result = server.await.map_err(|e| format!("Server error: {e}"));
    shutdown_state.status.shutdown();
    result
}
