mod common;

use common::{setup_state, stored_blobs};
use drone_logbook::api::error::AppError;
use drone_logbook::entities::documents::DocumentType;
use drone_logbook::services::document_service::UploadOutcome;
use drone_logbook::services::storage::StorageService;
use sea_orm::{ConnectionTrait, Statement};

const PDF: &[u8] = b"%PDF-1.4\n1 0 obj<<>>endobj\ntrailer<<>>\n%%EOF";

#[tokio::test]
async fn test_oversized_document_is_rejected_before_any_write() {
    let (state, dir) = setup_state().await;

    let err = state
        .document_service
        .upload(
            DocumentType::PilotLicense,
            "license.pdf",
            vec![0u8; 6 * 1024 * 1024],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::PayloadTooLarge(_)), "got {:?}", err);
    assert_eq!(err.user_message(), "File size exceeds the 5MB limit.");
    assert!(stored_blobs(dir.path()).is_empty());
    assert!(state.document_service.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_non_pdf_is_rejected() {
    let (state, dir) = setup_state().await;

    let err = state
        .document_service
        .upload(DocumentType::Other, "notes.txt", b"hello".to_vec())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(err.user_message(), "Only PDF files are allowed.");
    assert!(stored_blobs(dir.path()).is_empty());
}

#[tokio::test]
async fn test_second_upload_replaces_current_document() {
    let (state, dir) = setup_state().await;
    let docs = &state.document_service;

    let first = docs
        .upload(DocumentType::PilotLicense, "license-2023.pdf", PDF.to_vec())
        .await
        .unwrap();
    assert!(matches!(first, UploadOutcome::Created(_)));
    let first = first.document().clone();
    assert!(first.file_path.starts_with("uploads/doc_"));
    assert!(first.file_path.ends_with(".pdf"));
    assert!(state.storage.file_exists(&first.file_path).await.unwrap());

    let second = docs
        .upload(DocumentType::PilotLicense, "license-2024.pdf", PDF.to_vec())
        .await
        .unwrap();
    assert!(matches!(second, UploadOutcome::Replaced(_)));
    assert_eq!(second.message(), "Document updated successfully.");
    let second = second.document().clone();

    // Same row, new blob, old blob gone
    assert_eq!(second.id, first.id);
    assert_ne!(second.file_path, first.file_path);
    assert_eq!(second.original_filename, "license-2024.pdf");
    assert!(!state.storage.file_exists(&first.file_path).await.unwrap());
    assert_eq!(stored_blobs(dir.path()).len(), 1);

    let current = docs
        .current(DocumentType::PilotLicense)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current, second);
    assert!(
        docs.current(DocumentType::DroneRegistration)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_other_documents_are_independent_per_type() {
    let (state, dir) = setup_state().await;
    let docs = &state.document_service;

    docs.upload(DocumentType::PilotLicense, "a.pdf", PDF.to_vec())
        .await
        .unwrap();
    docs.upload(DocumentType::DroneRegistration, "b.pdf", PDF.to_vec())
        .await
        .unwrap();

    assert_eq!(docs.list().await.unwrap().len(), 2);
    assert_eq!(stored_blobs(dir.path()).len(), 2);
}

#[tokio::test]
async fn test_client_path_is_stripped_from_display_name() {
    let (state, _dir) = setup_state().await;

    let outcome = state
        .document_service
        .upload(
            DocumentType::Other,
            "C:\\Users\\pilot\\insurance.pdf",
            PDF.to_vec(),
        )
        .await
        .unwrap();
    assert_eq!(outcome.document().original_filename, "insurance.pdf");
}

#[tokio::test]
async fn test_delete_document_removes_row_and_blob() {
    let (state, dir) = setup_state().await;
    let docs = &state.document_service;

    let doc = docs
        .upload(DocumentType::DroneRegistration, "reg.pdf", PDF.to_vec())
        .await
        .unwrap()
        .document()
        .clone();

    docs.delete_document(doc.id).await.unwrap();
    assert!(docs.list().await.unwrap().is_empty());
    assert!(stored_blobs(dir.path()).is_empty());

    let err = docs.delete_document(doc.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = docs.delete_document(-1).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_delete_succeeds_when_blob_is_already_missing() {
    let (state, _dir) = setup_state().await;
    let docs = &state.document_service;

    let doc = docs
        .upload(DocumentType::Other, "misc.pdf", PDF.to_vec())
        .await
        .unwrap()
        .document()
        .clone();
    state.storage.delete_file(&doc.file_path).await.unwrap();

    let err = docs.read_blob(&doc).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let deleted = docs.delete_document(doc.id).await.unwrap();
    assert_eq!(deleted.id, doc.id);
    assert!(docs.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_row_write_leaves_no_orphan_blob() {
    let (state, dir) = setup_state().await;

    let backend = state.db.get_database_backend();
    state
        .db
        .execute(Statement::from_string(backend, "DROP TABLE documents".to_owned()))
        .await
        .unwrap();

    let err = state
        .document_service
        .upload(DocumentType::PilotLicense, "license.pdf", PDF.to_vec())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Database(_)), "got {:?}", err);
    assert!(stored_blobs(dir.path()).is_empty());
}

#[tokio::test]
async fn test_long_client_filename_keeps_pdf_extension() {
    let (state, dir) = setup_state().await;
    let filename = format!("{}.pdf", "a".repeat(260));

    let outcome = state
        .document_service
        .upload(DocumentType::PilotLicense, &filename, PDF.to_vec())
        .await
        .unwrap();

    let doc = outcome.document();
    assert_eq!(doc.original_filename.len(), 255);
    assert!(doc.original_filename.starts_with("aaaa"));
    assert!(doc.original_filename.ends_with(".pdf"));
    assert_eq!(stored_blobs(dir.path()).len(), 1);
}

#[tokio::test]
async fn test_extension_is_checked_on_client_name_before_size() {
    let (state, dir) = setup_state().await;

    let err = state
        .document_service
        .upload(
            DocumentType::Other,
            "scans/flight-log.txt",
            vec![0u8; 6 * 1024 * 1024],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)), "got {:?}", err);
    assert_eq!(err.user_message(), "Only PDF files are allowed.");
    assert!(stored_blobs(dir.path()).is_empty());
}
