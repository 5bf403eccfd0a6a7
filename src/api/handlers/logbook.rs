use crate::AppState;
use crate::api::error::AppError;
use crate::entities::documents::DocumentType;
use crate::models::FlightFilter;
use crate::services::export::{self, CSV_FILENAME, PDF_FILENAME};
use crate::views::FlashQuery;
use crate::views::logbook::{LogbookPage, render_logbook};
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct LogbookQuery {
    #[serde(flatten)]
    pub filter: FlightFilter,
    pub action: Option<String>,
    #[serde(flatten)]
    pub flash: FlashQuery,
}

/// `GET /`: the filtered flight listing, or one of its exports when
/// `action` asks for it.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<LogbookQuery>,
) -> Result<Response, AppError> {
    let flights = state.flight_service.list(&query.filter).await?;

    match query.action.as_deref() {
        Some("export_csv") => {
            let body = export::render_csv(&flights)?;
            tracing::info!("📤 CSV export of {} flights", flights.len());
            return Ok((
                super::attachment_headers(&mime::TEXT_CSV_UTF_8, CSV_FILENAME),
                body,
            )
                .into_response());
        }
        Some("export_pdf") => {
            let body = export::render_pdf(&flights)?;
            tracing::info!("📤 PDF export of {} flights", flights.len());
            return Ok((
                super::attachment_headers(&mime::APPLICATION_PDF, PDF_FILENAME),
                body,
            )
                .into_response());
        }
        _ => {}
    }

    let pilots = state.flight_service.pilots().await?;
    let drone_registration = state
        .document_service
        .current(DocumentType::DroneRegistration)
        .await?;
    let pilot_license = state
        .document_service
        .current(DocumentType::PilotLicense)
        .await?;
    let flash = query.flash.flash();

    Ok(Html(render_logbook(&LogbookPage {
        flights: &flights,
        pilots: &pilots,
        filter: &query.filter,
        flash: flash.as_ref(),
        drone_registration: drone_registration.as_ref(),
        pilot_license: pilot_license.as_ref(),
    }))
    .into_response())
}
