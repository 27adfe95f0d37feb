//! API key management backed by the OS credential store.

use actix_web::{delete, get, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, Result};
use crate::server::AppState;

#[derive(Deserialize)]
struct AddKeyRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    service: String,
    #[serde(default)]
    value: String,
}

#[derive(Deserialize)]
struct DeleteQuery {
    #[serde(default)]
    id: String,
}

#[get("")]
async fn list_keys(state: web::Data<AppState>) -> HttpResponse {
    let keys = state.key_store.list();
    HttpResponse::Ok().json(json!({ "ok": true, "keys": keys }))
}

#[post("")]
async fn add_key(
    state: web::Data<AppState>,
    body: web::Json<AddKeyRequest>,
) -> Result<HttpResponse> {
    let AddKeyRequest {
        name,
        service,
        value,
    } = body.into_inner();
    if name.trim().is_empty() || service.trim().is_empty() || value.is_empty() {
        return Err(AppError::BadRequest(
            "Name, service, and value required".to_string(),
        ));
    }

    let id = state
        .key_store
        .add(&name, &service, &value)
        .map_err(|e| AppError::KeyStore(e.to_string()))?;
    log::info!("stored new api key {id}");
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "id": id })))
}

#[delete("")]
async fn delete_key(
    state: web::Data<AppState>,
    query: web::Query<DeleteQuery>,
) -> Result<HttpResponse> {
    let id = query.into_inner().id;
    if id.trim().is_empty() {
        return Err(AppError::BadRequest("ID required".to_string()));
    }

    state
        .key_store
        .remove(&id)
        .map_err(|e| AppError::KeyStore(e.to_string()))?;
    log::info!("deleted api key {id}");
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

/// Full secret value, for the operator's copy action.
#[get("/{id}")]
async fn reveal_key(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let id = path.into_inner();
    let value = state
        .key_store
        .reveal(&id)
        .map_err(|e| AppError::KeyStore(e.to_string()))?;
    match value {
        Some(value) => Ok(HttpResponse::Ok().json(json!({ "ok": true, "value": value }))),
        None => Err(AppError::NotFound("Key".to_string())),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/keys")
            .service(list_keys)
            .service(add_key)
            .service(delete_key)
            .service(reveal_key),
    );
}
