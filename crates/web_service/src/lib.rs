//! Mission Control backend: a small actix-web API that front-ends the
//! assistant gateway for a single operator's dashboard.

pub mod config;
pub mod controllers;
pub mod error;
pub mod server;
pub mod services;

pub use config::AppConfig;
pub use error::AppError;
pub use server::AppState;
