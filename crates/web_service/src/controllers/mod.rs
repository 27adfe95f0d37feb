pub mod actions_controller;
pub mod artifacts_controller;
pub mod chat_controller;
pub mod cron_controller;
pub mod keys_controller;
pub mod status_controller;
