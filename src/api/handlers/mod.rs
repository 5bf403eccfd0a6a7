pub mod detail;
pub mod documents;
pub mod health;
pub mod logbook;
pub mod upload;

use axum::http::header;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

/// `Content-Disposition` value with an ASCII fallback name and the RFC 5987
/// UTF-8 form.
pub(crate) fn content_disposition(disposition: &str, filename: &str) -> String {
    let ascii_filename = filename
        .chars()
        .filter(|c| c.is_ascii() && !c.is_control() && *c != '"' && *c != '\\' && *c != ';')
        .take(64)
        .collect::<String>();
    let fallback_filename = if ascii_filename.is_empty() {
        "document.pdf"
    } else {
        &ascii_filename
    };

    let encoded_filename = utf8_percent_encode(filename, NON_ALPHANUMERIC).to_string();

    format!(
        "{}; filename=\"{}\"; filename*=UTF-8''{}",
        disposition, fallback_filename, encoded_filename
    )
}

/// Headers for a generated file sent as a download.
pub(crate) fn attachment_headers(
    content_type: &mime::Mime,
    filename: &str,
) -> [(header::HeaderName, String); 2] {
    [
        (header::CONTENT_TYPE, content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            content_disposition("attachment", filename),
        ),
    ]
}
