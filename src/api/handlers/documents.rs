use crate::AppState;
use crate::api::error::AppError;
use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};

/// `GET /documents/:id`: the stored PDF, shown inline.
pub async fn view(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let doc = state.document_service.get(id).await?;
    let data = state.document_service.read_blob(&doc).await?;

    Ok((
        [
            (header::CONTENT_TYPE, mime::APPLICATION_PDF.to_string()),
            (
                header::CONTENT_DISPOSITION,
                super::content_disposition("inline", &doc.original_filename),
            ),
        ],
        data,
    ))
}
