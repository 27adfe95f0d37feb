pub mod key_store;
pub mod status_monitor;
