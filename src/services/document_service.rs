use crate::api::error::AppError;
use crate::entities::documents::DocumentType;
use crate::entities::{prelude::*, *};
use crate::services::storage::StorageService;
use crate::utils::validation::{
    TIMESTAMP_FORMAT, client_basename, sanitize_filename, validate_document_upload,
};
use chrono::Local;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// Key prefix of uploaded documents inside the blob store.
pub const UPLOAD_PREFIX: &str = "uploads";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// No document of this type existed; a new row was inserted.
    Created(documents::Model),
    /// The current document of this type now points at the new blob.
    Replaced(documents::Model),
}

impl UploadOutcome {
    pub fn document(&self) -> &documents::Model {
        match self {
            UploadOutcome::Created(doc) | UploadOutcome::Replaced(doc) => doc,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            UploadOutcome::Created(_) => "Document uploaded successfully.",
            UploadOutcome::Replaced(_) => "Document updated successfully.",
        }
    }
}

pub struct DocumentService {
    db: DatabaseConnection,
    storage: Arc<dyn StorageService>,
    max_document_size: usize,
}

impl DocumentService {
    pub fn new(
        db: DatabaseConnection,
        storage: Arc<dyn StorageService>,
        max_document_size: usize,
    ) -> Self {
        Self {
            db,
            storage,
            max_document_size,
        }
    }

    pub fn max_document_size(&self) -> usize {
        self.max_document_size
    }

    /// Stores a new document of `document_type`, replacing the current one.
    ///
    /// The blob is written before the row. If the row cannot be written the
    /// new blob is removed again; if the old blob cannot be removed after a
    /// successful replace, the leftover file is only logged.
    pub async fn upload(
        &self,
        document_type: DocumentType,
        original_filename: &str,
        data: Vec<u8>,
    ) -> Result<UploadOutcome, AppError> {
        validate_document_upload(
            client_basename(original_filename),
            data.len(),
            self.max_document_size,
        )?;
        let display_name = sanitize_filename(original_filename)?;

        let file_path = format!("{}/doc_{}.pdf", UPLOAD_PREFIX, Uuid::new_v4().simple());
        let size = data.len();

        self.storage
            .upload_file(&file_path, data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to store document: {}", e)))?;

        tracing::info!(
            "📄 Stored {} ({} bytes) as {} [{}]",
            display_name,
            size,
            file_path,
            document_type
        );

        match self
            .write_row(document_type, &file_path, &display_name)
            .await
        {
            Ok((outcome, replaced_path)) => {
                if let Some(old_path) = replaced_path {
                    self.remove_blob(&old_path).await;
                }
                Ok(outcome)
            }
            Err(e) => {
                // Row write failed: drop the blob we just wrote
                if let Err(cleanup) = self.storage.delete_file(&file_path).await {
                    tracing::error!(
                        "Failed to remove orphaned blob {} after row write failure: {}",
                        file_path,
                        cleanup
                    );
                }
                Err(e)
            }
        }
    }

    /// Points the current document of the type at `file_path`, or inserts a
    /// new row. Returns the old blob key when a document was replaced.
    async fn write_row(
        &self,
        document_type: DocumentType,
        file_path: &str,
        original_filename: &str,
    ) -> Result<(UploadOutcome, Option<String>), AppError> {
        let upload_date = Local::now().format(TIMESTAMP_FORMAT).to_string();

        match self.current(document_type).await? {
            Some(existing) => {
                let old_path = existing.file_path.clone();
                let mut active = existing.into_active_model();
                active.file_path = Set(file_path.to_string());
                active.original_filename = Set(original_filename.to_string());
                active.upload_date = Set(upload_date);
                let doc = active.update(&self.db).await?;
                Ok((UploadOutcome::Replaced(doc), Some(old_path)))
            }
            None => {
                let doc = documents::ActiveModel {
                    document_type: Set(document_type),
                    file_path: Set(file_path.to_string()),
                    original_filename: Set(original_filename.to_string()),
                    upload_date: Set(upload_date),
                    ..Default::default()
                }
                .insert(&self.db)
                .await?;
                Ok((UploadOutcome::Created(doc), None))
            }
        }
    }

    pub async fn delete_document(&self, id: i32) -> Result<documents::Model, AppError> {
        if id <= 0 {
            return Err(AppError::Validation(
                "Invalid document ID for deletion.".to_string(),
            ));
        }

        let doc = self.get(id).await?;

        let res = Documents::delete_by_id(doc.id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound(
                "Document not found or could not be deleted from database.".to_string(),
            ));
        }

        self.remove_blob(&doc.file_path).await;
        tracing::info!("🗑️  Document {} ({}) deleted", doc.id, doc.original_filename);
        Ok(doc)
    }

    /// Best-effort blob removal. A missing file or a failed delete does not
    /// change the outcome of the operation that triggered it.
    async fn remove_blob(&self, file_path: &str) {
        match self.storage.file_exists(file_path).await {
            Ok(true) => {
                if let Err(e) = self.storage.delete_file(file_path).await {
                    tracing::warn!("⚠️  Could not remove blob {}: {}", file_path, e);
                }
            }
            Ok(false) => tracing::debug!("Blob {} already gone", file_path),
            Err(e) => tracing::warn!("⚠️  Could not check blob {}: {}", file_path, e),
        }
    }

    pub async fn get(&self, id: i32) -> Result<documents::Model, AppError> {
        Documents::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Document not found.".to_string()))
    }

    /// The current document of a type: the most recent upload.
    pub async fn current(
        &self,
        document_type: DocumentType,
    ) -> Result<Option<documents::Model>, AppError> {
        Ok(Documents::find()
            .filter(documents::Column::DocumentType.eq(document_type))
            .order_by_desc(documents::Column::UploadDate)
            .order_by_desc(documents::Column::Id)
            .one(&self.db)
            .await?)
    }

    /// All stored documents, newest first.
    pub async fn list(&self) -> Result<Vec<documents::Model>, AppError> {
        Ok(Documents::find()
            .order_by_desc(documents::Column::UploadDate)
            .order_by_desc(documents::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn read_blob(&self, doc: &documents::Model) -> Result<Vec<u8>, AppError> {
        if !self
            .storage
            .file_exists(&doc.file_path)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?
        {
            return Err(AppError::NotFound(
                "The file for this document is missing.".to_string(),
            ));
        }

        self.storage
            .get_file(&doc.file_path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to read document: {}", e)))
    }
}
