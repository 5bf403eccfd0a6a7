use crate::api::error::AppError;
use chrono::NaiveDateTime;

/// Canonical storage format for flight timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats accepted from forms: stored values and the browser
/// `datetime-local` control, with or without seconds.
const ACCEPTED_TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        match e.code {
            "FILE_TOO_LARGE" => AppError::PayloadTooLarge(e.message),
            _ => AppError::Validation(e.message),
        }
    }
}

/// Validates file size against maximum limit
pub fn validate_file_size(size: usize, max_size: usize) -> Result<(), ValidationError> {
    if size > max_size {
        return Err(file_too_large(max_size));
    }
    Ok(())
}

pub fn file_too_large(max_size: usize) -> ValidationError {
    ValidationError {
        code: "FILE_TOO_LARGE",
        message: format!(
            "File size exceeds the {}MB limit.",
            max_size / 1024 / 1024
        ),
    }
}

/// Only PDF documents are accepted; the extension check is case-insensitive.
pub fn validate_pdf_extension(filename: &str) -> Result<(), ValidationError> {
    let is_pdf = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

    if is_pdf {
        Ok(())
    } else {
        Err(ValidationError {
            code: "INVALID_EXTENSION",
            message: "Only PDF files are allowed.".to_string(),
        })
    }
}

/// Runs every document check that can be decided before touching the disk.
pub fn validate_document_upload(
    filename: &str,
    size: usize,
    max_size: usize,
) -> Result<(), ValidationError> {
    validate_pdf_extension(filename)?;
    validate_file_size(size, max_size)?;
    Ok(())
}

/// Final path component of a client filename. Browsers on Windows may send
/// the full client path.
pub fn client_basename(filename: &str) -> &str {
    filename.rsplit(['/', '\\']).next().unwrap_or("").trim()
}

/// Reduces a client-supplied filename to something safe to display. The
/// result is never used to build a storage path.
pub fn sanitize_filename(filename: &str) -> Result<String, ValidationError> {
    let name = client_basename(filename);

    if name.is_empty() {
        return Err(ValidationError {
            code: "INVALID_FILENAME",
            message: "Filename cannot be empty".to_string(),
        });
    }

    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        tracing::warn!("Path components stripped from uploaded filename: {}", filename);
    }

    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_control() || matches!(c, ':' | '*' | '?' | '"' | '<' | '>' | '|' | ';') {
                '_'
            } else {
                c
            }
        })
        .collect();

    Ok(truncate_keeping_extension(sanitized, MAX_FILENAME_BYTES))
}

const MAX_FILENAME_BYTES: usize = 255;

/// Cuts `name` to `max` bytes on a UTF-8 boundary. A short extension is
/// kept and the stem is shortened instead.
fn truncate_keeping_extension(name: String, max: usize) -> String {
    if name.len() <= max {
        return name;
    }

    let (stem, ext) = match name.rfind('.') {
        Some(dot) if dot > 0 && name.len() - dot <= 16 => name.split_at(dot),
        _ => (name.as_str(), ""),
    };

    let mut end = max.saturating_sub(ext.len());
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}", &stem[..end], ext)
}

/// Parses a timestamp from a form and returns it in `TIMESTAMP_FORMAT`.
pub fn normalize_timestamp(raw: &str) -> Option<String> {
    let raw = raw.trim();
    ACCEPTED_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
}

/// Parses a height or radius. Only finite numbers are returned; the sign
/// check is left to the form validator.
pub fn parse_measurement(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a row id from a form or query string. Non-numeric and
/// non-positive values yield `None`.
pub fn parse_row_id(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok().filter(|id| *id > 0)
}
