//! Request types

use serde::{Deserialize, Serialize};

/// Question against a session, or a general question when `session_id` is absent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The question
    pub query: String,
    /// Session returned by an upload
    #[serde(default)]
    pub session_id: Option<String>,
}

impl QueryRequest {
    /// Session id, treating an empty string as absent
    pub fn session(&self) -> Option<&str> {
        self.session_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// Ingest a document from a URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadUrlRequest {
    /// http(s) URL of the document
    pub url: String,
    /// Optional caller-chosen session id
    #[serde(default)]
    pub session_id: Option<String>,
}
