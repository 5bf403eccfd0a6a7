#![allow(dead_code)]

use axum::Router;
use drone_logbook::config::AppConfig;
use drone_logbook::infrastructure::database::{connect, run_migrations};
use drone_logbook::models::FlightSubmission;
use drone_logbook::services::storage::LocalStorageService;
use drone_logbook::{AppState, create_app};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Application state over an in-memory database and a temporary blob root.
/// The `TempDir` must outlive the state.
pub async fn setup_state() -> (AppState, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db = connect("sqlite::memory:").await.unwrap();
    run_migrations(&db).await.unwrap();

    let storage = Arc::new(LocalStorageService::new(dir.path()));
    let state = AppState::new(db, storage, AppConfig::in_memory(dir.path()));
    (state, dir)
}

pub async fn setup_app() -> (Router, AppState, TempDir) {
    let (state, dir) = setup_state().await;
    (create_app(state.clone()), state, dir)
}

pub fn submission(pilot: &str, registration: &str, take_off: &str) -> FlightSubmission {
    FlightSubmission {
        action: Some("add_flight".into()),
        entry_id: None,
        operation_name: Some("Site survey".into()),
        pilot: Some(pilot.into()),
        max_flight_height: Some("120".into()),
        location: Some("North field".into()),
        radius: Some("500".into()),
        category_of_operation: Some("Basic".into()),
        activity: Some("Mapping".into()),
        flight_type: Some("VLOS".into()),
        manufacturer: Some("DJI".into()),
        model: Some("Mavic 3".into()),
        registration_number: Some(registration.into()),
        take_off_time: Some(take_off.into()),
        landing_time: Some(take_off.into()),
    }
}

/// Form-urlencoded body for `POST /detail`.
pub fn form_body(pairs: &[(&str, &str)]) -> String {
    serde_urlencoded::to_string(pairs).unwrap()
}

pub const BOUNDARY: &str = "----droneLogbookBoundary7MA4YWxkTrZu0gW";

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

/// Multipart body for `POST /upload`.
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                        name, value
                    )
                    .as_bytes(),
                );
            }
            Part::File(name, filename, data) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/pdf\r\n\r\n",
                        name, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Files currently stored under `<root>/uploads`.
pub fn stored_blobs(root: &Path) -> Vec<String> {
    match std::fs::read_dir(root.join("uploads")) {
        Ok(entries) => {
            let mut names: Vec<String> = entries
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect();
            names.sort();
            names
        }
        Err(_) => Vec::new(),
    }
}
