use crate::config::AppConfig;
use crate::services::document_service::UPLOAD_PREFIX;
use crate::services::storage::LocalStorageService;
use std::sync::Arc;
use tracing::info;

pub async fn setup_storage(config: &AppConfig) -> anyhow::Result<Arc<LocalStorageService>> {
    let upload_dir = config.storage_root.join(UPLOAD_PREFIX);

    info!("🗄️  Blob Storage: {}", upload_dir.display());

    tokio::fs::create_dir_all(&upload_dir).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to create upload directory {}: {}",
            upload_dir.display(),
            e
        )
    })?;

    info!("✅ Upload directory is ready");

    Ok(Arc::new(LocalStorageService::new(&config.storage_root)))
}
