//! Core types for the Q&A service

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, DocumentUnit, FileType, SUPPORTED_EXTENSIONS};
pub use query::{QueryRequest, UploadUrlRequest};
pub use response::{QueryResponse, SessionSummary, UploadResponse};
