use crate::config::AppConfig;
use crate::entities::{documents, flights};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub async fn setup_database(config: &AppConfig) -> anyhow::Result<DatabaseConnection> {
    info!("📂 Database: {}", config.database_url);

    let db = connect(&config.database_url).await?;

    info!("✅ Database connected successfully");

    run_migrations(&db).await?;

    Ok(db)
}

/// Opens a pool for `db_url`. In-memory databases are pinned to a single
/// connection since every SQLite connection gets its own memory database.
pub async fn connect(db_url: &str) -> anyhow::Result<DatabaseConnection> {
    let in_memory = db_url.contains(":memory:") || db_url.contains("mode=memory");
    if !in_memory {
        ensure_parent_dir(db_url).await?;
    }

    let mut opt = ConnectOptions::new(db_url);
    opt.max_connections(if in_memory { 1 } else { 5 })
        .min_connections(1)
        .connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(30))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    Ok(Database::connect(opt).await?)
}

/// Creates the directory holding a file-backed SQLite database.
async fn ensure_parent_dir(db_url: &str) -> anyhow::Result<()> {
    let path = db_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path = path.split('?').next().unwrap_or_default();

    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}

pub async fn run_migrations(db: &DatabaseConnection) -> anyhow::Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    info!("🔄 Running auto-migrations...");

    let stmts = vec![
        (
            "flights",
            schema
                .create_table_from_entity(flights::Entity)
                .if_not_exists()
                .to_owned(),
        ),
        (
            "documents",
            schema
                .create_table_from_entity(documents::Entity)
                .if_not_exists()
                .to_owned(),
        ),
    ];

    for (name, stmt) in stmts {
        let stmt = builder.build(&stmt);
        db.execute(stmt).await?;
        info!("   - Table '{}' checked/created", name);
    }

    // Composite keys and lookup indexes are not expressible on the entities
    let index_updates = [
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_flights_registration_take_off ON flights(registration_number, take_off_time)",
        "CREATE INDEX IF NOT EXISTS idx_flights_take_off_time ON flights(take_off_time)",
        "CREATE INDEX IF NOT EXISTS idx_flights_pilot ON flights(pilot)",
        "CREATE INDEX IF NOT EXISTS idx_documents_type_upload_date ON documents(document_type, upload_date)",
    ];

    for query in index_updates {
        db.execute(Statement::from_string(builder, query.to_owned()))
            .await?;
        tracing::debug!("   - Executed schema update: {}", query);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = connect("sqlite::memory:").await.unwrap();
        run_migrations(&db).await.unwrap();
        run_migrations(&db).await.unwrap();
    }

    #[tokio::test]
    async fn test_ensure_parent_dir_creates_data_directory() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested/data/flights.sqlite");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());

        let db = connect(&url).await.unwrap();
        run_migrations(&db).await.unwrap();
        assert!(db_path.exists());
    }
}
