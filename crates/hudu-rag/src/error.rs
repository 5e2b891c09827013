//! Error types for the Q&A service

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, Error>;

/// Service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Missing credential or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// File extension not handled by any loader
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// Ingestion produced no text to index
    #[error("No documents found: {0}")]
    EmptyCorpus(String),

    /// Every parser strategy failed for a file
    #[error("Failed to parse file '{filename}': {message}")]
    FileParse { filename: String, message: String },

    /// Embedding service call failed
    #[error("Embedding service error: {0}")]
    EmbeddingService(String),

    /// Chat-completion service call failed
    #[error("Generation service error: {0}")]
    GenerationService(String),

    /// Unknown session identifier
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// URL download failed or pointed at the wrong content
    #[error("Download error: {0}")]
    Download(String),

    /// Malformed request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl Error {
    /// Create a file parse error
    pub fn file_parse(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileParse {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an embedding service error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::EmbeddingService(message.into())
    }

    /// Create a generation service error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::GenerationService(message.into())
    }

    /// Create a download error
    pub fn download(message: impl Into<String>) -> Self {
        Self::Download(message.into())
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status and machine-readable kind for this error
    pub fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            Error::UnsupportedFormat(_) => (StatusCode::BAD_REQUEST, "unsupported_format"),
            Error::EmptyCorpus(_) => (StatusCode::UNPROCESSABLE_ENTITY, "empty_corpus"),
            Error::FileParse { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "parse_error"),
            Error::EmbeddingService(_) => (StatusCode::INTERNAL_SERVER_ERROR, "embedding_error"),
            Error::GenerationService(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "generation_error")
            }
            Error::SessionNotFound(_) => (StatusCode::NOT_FOUND, "session_not_found"),
            Error::Download(_) => (StatusCode::BAD_REQUEST, "download_error"),
            Error::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
            Error::Json(_) => (StatusCode::BAD_REQUEST, "json_error"),
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_kind();
        let message = match &self {
            Error::SessionNotFound(_) => {
                "Session not found. Please upload a document first, or omit session_id for general questions."
                    .to_string()
            }
            other => other.to_string(),
        };

        if status.is_server_error() {
            tracing::error!("{} ({})", message, error_type);
        } else {
            tracing::debug!("{} ({})", message, error_type);
        }

        let body = Json(json!({
            "detail": message,
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
