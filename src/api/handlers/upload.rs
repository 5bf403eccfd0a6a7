use crate::AppState;
use crate::api::error::AppError;
use crate::entities::documents::DocumentType;
use crate::utils::validation::{
    client_basename, file_too_large, parse_row_id, validate_file_size, validate_pdf_extension,
};
use crate::views::upload::render_upload;
use crate::views::{Flash, FlashQuery, redirect_target};
use axum::{
    extract::{
        Multipart, Query, State,
        multipart::{Field, MultipartError},
    },
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

/// Fields of the upload page's multipart forms.
#[derive(Debug, Default)]
struct UploadForm {
    action: Option<String>,
    document_type: Option<String>,
    file: Option<(String, Vec<u8>)>,
    doc_id: Option<String>,
}

/// A body cut off by the route's body limit reports 413; anything else is a
/// malformed request.
fn multipart_error(e: MultipartError, max_size: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::debug!("Upload body over the route limit: {}", e.body_text());
        file_too_large(max_size).into()
    } else {
        AppError::Validation(format!("Malformed upload request: {}", e.body_text()))
    }
}

/// Buffers a file field, giving up as soon as it passes `max_size`.
async fn read_capped(mut field: Field<'_>, max_size: usize) -> Result<Vec<u8>, AppError> {
    let mut data = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| multipart_error(e, max_size))?
    {
        data.extend_from_slice(&chunk);
        validate_file_size(data.len(), max_size)?;
    }
    Ok(data)
}

async fn read_form(multipart: &mut Multipart, max_size: usize) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();
    let to_app_error = |e| multipart_error(e, max_size);

    while let Some(field) = multipart.next_field().await.map_err(to_app_error)? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "document_file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                // The type is decided by the name, before any bytes are read
                if !filename.is_empty() {
                    validate_pdf_extension(client_basename(&filename))?;
                }
                let data = read_capped(field, max_size).await?;
                // Browsers send an empty part when no file was chosen
                if !filename.is_empty() || !data.is_empty() {
                    form.file = Some((filename, data));
                }
            }
            "action" => form.action = Some(field.text().await.map_err(to_app_error)?),
            "document_type" => {
                form.document_type = Some(field.text().await.map_err(to_app_error)?)
            }
            "doc_id" => form.doc_id = Some(field.text().await.map_err(to_app_error)?),
            _ => {}
        }
    }

    Ok(form)
}

/// `GET /upload`: upload form and the list of stored documents.
pub async fn show(
    State(state): State<AppState>,
    Query(query): Query<FlashQuery>,
) -> Result<Html<String>, AppError> {
    let documents = state.document_service.list().await?;
    Ok(Html(render_upload(&documents, query.flash().as_ref())))
}

/// `POST /upload`: store or delete a document, then redirect.
pub async fn submit(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let max_size = state.document_service.max_document_size();

    let result = match read_form(&mut multipart, max_size).await {
        Ok(form) => handle(&state, form).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(flash) => Redirect::to(&redirect_target("/upload", &[], &flash)).into_response(),
        Err(err) => {
            let status = err.status();
            let flash = Flash::error(err.user_message());
            tracing::debug!("Upload form rejected with {}: {}", status, err);
            match state.document_service.list().await {
                Ok(documents) => {
                    (status, Html(render_upload(&documents, Some(&flash)))).into_response()
                }
                Err(list_err) => list_err.into_response(),
            }
        }
    }
}

async fn handle(state: &AppState, form: UploadForm) -> Result<Flash, AppError> {
    match form.action.as_deref().unwrap_or_default() {
        "upload_document" => {
            let document_type = form
                .document_type
                .as_deref()
                .and_then(|t| t.parse::<DocumentType>().ok());
            let (Some(document_type), Some((filename, data))) = (document_type, form.file) else {
                return Err(AppError::Validation(
                    "Please select a document type and a file to upload.".to_string(),
                ));
            };

            let outcome = state
                .document_service
                .upload(document_type, &filename, data)
                .await?;
            Ok(Flash::success(outcome.message()))
        }
        "delete_document" => {
            let id = form.doc_id.as_deref().and_then(parse_row_id).unwrap_or(0);
            state.document_service.delete_document(id).await?;
            Ok(Flash::success("Document deleted successfully."))
        }
        other => {
            tracing::warn!("Unknown upload form action '{}'", other);
            Err(AppError::Validation("Unknown form action.".to_string()))
        }
    }
}
