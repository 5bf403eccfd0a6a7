use crate::AppState;
use crate::services::document_service::UPLOAD_PREFIX;
use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub storage: String,
    pub version: String,
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = state.db.ping().await.is_ok();

    // The upload directory is created at startup; losing it means uploads fail
    let storage_ok = matches!(state.storage.file_exists(UPLOAD_PREFIX).await, Ok(true));

    let label = |ok: bool| if ok { "connected" } else { "disconnected" };

    Json(HealthResponse {
        status: if db_ok && storage_ok { "ok" } else { "degraded" }.to_string(),
        database: label(db_ok).to_string(),
        storage: label(storage_ok).to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
