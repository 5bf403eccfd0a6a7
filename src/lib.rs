pub mod api;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;
pub mod views;

use crate::api::handlers;
use crate::config::AppConfig;
use crate::services::document_service::DocumentService;
use crate::services::flight_service::FlightService;
use crate::services::storage::StorageService;
use axum::{Router, extract::DefaultBodyLimit, routing::get};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub storage: Arc<dyn StorageService>,
    pub flight_service: Arc<FlightService>,
    pub document_service: Arc<DocumentService>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(db: DatabaseConnection, storage: Arc<dyn StorageService>, config: AppConfig) -> Self {
        let flight_service = Arc::new(FlightService::new(db.clone()));
        let document_service = Arc::new(DocumentService::new(
            db.clone(),
            storage.clone(),
            config.max_document_size,
        ));

        Self {
            db,
            storage,
            flight_service,
            document_service,
            config,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let upload_limit = state.config.upload_body_limit();

    Router::new()
        .route("/", get(handlers::logbook::index))
        .route(
            "/detail",
            get(handlers::detail::show).post(handlers::detail::submit),
        )
        .route(
            "/upload",
            get(handlers::upload::show)
                .post(handlers::upload::submit)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/documents/:id", get(handlers::documents::view))
        .route("/health", get(handlers::health::health_check))
        .with_state(state)
}
