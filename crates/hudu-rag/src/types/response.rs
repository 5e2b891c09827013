//! Response types for the HTTP API

use serde::{Deserialize, Serialize};

/// Response from `/upload` and `/upload-url`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Session to use for subsequent queries
    pub session_id: String,
    /// Human-readable status
    pub message: String,
    /// Original filename
    pub filename: String,
}

impl UploadResponse {
    /// Successful ingestion
    pub fn processed(session_id: String, filename: String) -> Self {
        Self {
            session_id,
            message: "Document uploaded and processed successfully".to_string(),
            filename,
        }
    }
}

/// Response from `/query`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Post-processed answer
    pub response: String,
    /// Echo of the session used, `null` in general mode
    pub session_id: Option<String>,
}

/// Response from `DELETE /session/:id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSessionResponse {
    pub message: String,
    pub session_id: String,
}

/// One entry of `/sessions`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSummary {
    pub session_id: String,
    pub filename: String,
}

/// Response from `/sessions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionListResponse {
    /// Number of live sessions
    pub active_sessions: usize,
    /// Session listing
    pub sessions: Vec<SessionSummary>,
}

/// Overall health
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

/// Response from `/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub api_key_configured: bool,
    pub modules_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_error: Option<String>,
}

/// Response from `/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub status: String,
}
