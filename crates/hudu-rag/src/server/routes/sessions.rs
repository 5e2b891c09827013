//! Session management endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::response::{DeleteSessionResponse, SessionListResponse};

/// GET /sessions - List active sessions
pub async fn list_sessions(State(state): State<AppState>) -> Json<SessionListResponse> {
    let sessions = state.sessions().list();
    Json(SessionListResponse {
        active_sessions: sessions.len(),
        sessions,
    })
}

/// DELETE /session/:id - Delete a session and its temp file
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<DeleteSessionResponse>> {
    state.sessions().delete(&session_id)?;

    Ok(Json(DeleteSessionResponse {
        message: "Session deleted successfully".to_string(),
        session_id,
    }))
}
