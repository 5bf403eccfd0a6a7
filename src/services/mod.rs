pub mod document_service;
pub mod export;
pub mod flight_service;
pub mod storage;
