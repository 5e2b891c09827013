//! Question answering endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::error::{Error, Result};
use crate::generation::answer_general;
use crate::server::state::AppState;
use crate::types::{QueryRequest, QueryResponse};

/// POST /query - Answer from a session's document, or generally without one
pub async fn query(
    State(state): State<AppState>,
    request: std::result::Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>> {
    let Json(request) = request?;
    let Some(session_id) = request.session() else {
        if !state.config().llm.general_queries {
            return Err(Error::invalid_request(
                "session_id is required. Upload a document first.",
            ));
        }

        tracing::debug!("General query");
        let providers = state.providers()?;
        let response = answer_general(providers.llm.as_ref(), &request.query).await?;
        return Ok(Json(QueryResponse {
            response,
            session_id: None,
        }));
    };

    let session = state.sessions().get(session_id)?;
    tracing::debug!("Query against session {} ({})", session_id, session.filename);

    let response = session.pipeline.answer(&request.query).await?;

    Ok(Json(QueryResponse {
        response,
        session_id: Some(session_id.to_string()),
    }))
}
