use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use gateway_client::GatewayError;
use serde::Serialize;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Access denied")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Key store error: {0}")]
    KeyStore(String),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct JsonError {
    message: String,
    r#type: String,
}

#[derive(Serialize)]
struct JsonErrorWrapper {
    ok: bool,
    error: JsonError,
}

impl AppError {
    fn error_type(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "invalid_request",
            AppError::Forbidden => "forbidden",
            AppError::NotFound(_) => "not_found",
            AppError::Gateway(_) => "gateway_error",
            AppError::KeyStore(_) => "key_store_error",
            AppError::InternalError(_) => "api_error",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Gateway(_) => StatusCode::BAD_GATEWAY,
            AppError::KeyStore(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error_response = JsonErrorWrapper {
            ok: false,
            error: JsonError {
                message: self.to_string(),
                r#type: self.error_type().to_string(),
            },
        };
        HttpResponse::build(self.status_code()).json(error_response)
    }
}
