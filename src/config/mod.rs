use std::env;
use std::path::PathBuf;

/// Runtime configuration for the logbook server
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite connection string (default: "sqlite://data/drone_flights.sqlite?mode=rwc")
    pub database_url: String,

    /// Root directory of the blob store; document keys are relative to it (default: "data")
    pub storage_root: PathBuf,

    /// Maximum accepted document size in bytes (default: 5 MiB)
    pub max_document_size: usize,

    /// Address the HTTP listener binds to (default: "127.0.0.1")
    pub bind_address: String,

    /// Port the HTTP listener binds to (default: 8080)
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://data/drone_flights.sqlite?mode=rwc".to_string(),
            storage_root: PathBuf::from("data"),
            max_document_size: 5 * 1024 * 1024, // 5 MiB
            bind_address: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(default.database_url),

            storage_root: env::var("STORAGE_ROOT")
                .map(PathBuf::from)
                .unwrap_or(default.storage_root),

            max_document_size: env::var("MAX_DOCUMENT_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_document_size),

            bind_address: env::var("BIND_ADDRESS").unwrap_or(default.bind_address),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),
        }
    }

    /// Configuration pointing at an in-memory database and the given blob root
    pub fn in_memory(storage_root: impl Into<PathBuf>) -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            storage_root: storage_root.into(),
            ..Self::default()
        }
    }

    /// Upper bound for a whole multipart request on the upload route.
    /// Leaves 1 MiB of headroom over the document limit for the form fields
    /// and multipart framing so oversized documents get a readable message
    /// instead of a bare 413.
    pub fn upload_body_limit(&self) -> usize {
        self.max_document_size + 1024 * 1024
    }
}
