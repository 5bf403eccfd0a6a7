use crate::AppState;
use crate::api::error::AppError;
use crate::models::{FlightFormValues, FlightSubmission};
use crate::utils::validation::parse_row_id;
use crate::views::detail::render_detail;
use crate::views::{Flash, FlashQuery, redirect_target};
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct DetailQuery {
    pub id: Option<String>,
    #[serde(flatten)]
    pub flash: FlashQuery,
}

impl DetailQuery {
    fn row_id(&self) -> Option<i32> {
        self.id.as_deref().and_then(parse_row_id)
    }
}

/// `GET /detail`: the edit form for `id`, or a blank form for a new flight.
pub async fn show(
    State(state): State<AppState>,
    Query(query): Query<DetailQuery>,
) -> Result<Response, AppError> {
    let flash = query.flash.flash();

    let Some(id) = query.row_id() else {
        let html = render_detail(&FlightFormValues::default(), flash.as_ref());
        return Ok(Html(html).into_response());
    };

    match state.flight_service.get(id).await {
        Ok(flight) => Ok(Html(render_detail(
            &FlightFormValues::from(&flight),
            flash.as_ref(),
        ))
        .into_response()),
        Err(err @ AppError::NotFound(_)) => Ok(error_page(&FlightFormValues::default(), err)),
        Err(err) => Err(err),
    }
}

/// `POST /detail`: add, update or delete a flight, then redirect.
pub async fn submit(
    State(state): State<AppState>,
    Query(query): Query<DetailQuery>,
    Form(submission): Form<FlightSubmission>,
) -> Response {
    let id = query.row_id();

    match submission.action.as_deref().unwrap_or_default() {
        "add_flight" => match add(&state, &submission).await {
            Ok(target) => Redirect::to(&target).into_response(),
            Err(err) => error_page(&FlightFormValues::from_submission(None, &submission), err),
        },
        "update_flight" => match update(&state, id, &submission).await {
            Ok(target) => Redirect::to(&target).into_response(),
            Err(err) => error_page(&FlightFormValues::from_submission(id, &submission), err),
        },
        "delete_entry" => match delete(&state, &submission).await {
            Ok(target) => Redirect::to(&target).into_response(),
            Err(err) => {
                // Show the stored flight again when it still exists
                let values = match id {
                    Some(id) => state
                        .flight_service
                        .get(id)
                        .await
                        .map(|f| FlightFormValues::from(&f))
                        .unwrap_or_default(),
                    None => FlightFormValues::default(),
                };
                error_page(&values, err)
            }
        },
        other => {
            tracing::warn!("Unknown flight form action '{}'", other);
            error_page(
                &FlightFormValues::from_submission(id, &submission),
                AppError::Validation("Unknown form action.".to_string()),
            )
        }
    }
}

async fn add(state: &AppState, submission: &FlightSubmission) -> Result<String, AppError> {
    let entry = submission.to_entry()?;
    state.flight_service.insert(entry).await?;
    Ok(redirect_target(
        "/",
        &[],
        &Flash::success("Flight entry added successfully."),
    ))
}

async fn update(
    state: &AppState,
    id: Option<i32>,
    submission: &FlightSubmission,
) -> Result<String, AppError> {
    let id = id.ok_or_else(|| AppError::Validation("Invalid entry ID for update.".to_string()))?;
    let entry = submission.to_entry()?;
    let flight = state.flight_service.update(id, entry).await?;
    let id = flight.id.to_string();
    Ok(redirect_target(
        "/detail",
        &[("id", id.as_str())],
        &Flash::success("Flight entry updated successfully."),
    ))
}

async fn delete(state: &AppState, submission: &FlightSubmission) -> Result<String, AppError> {
    let entry_id = submission
        .entry_id
        .as_deref()
        .and_then(parse_row_id)
        .unwrap_or(0);
    state.flight_service.delete(entry_id).await?;
    Ok(redirect_target(
        "/",
        &[],
        &Flash::success("Flight entry deleted successfully."),
    ))
}

/// Re-renders the form with the submitted values and the error message.
fn error_page(values: &FlightFormValues, err: AppError) -> Response {
    let status: StatusCode = err.status();
    tracing::debug!("Flight form rejected with {}: {}", status, err);
    let flash = Flash::error(err.user_message());
    (status, Html(render_detail(values, Some(&flash)))).into_response()
}
