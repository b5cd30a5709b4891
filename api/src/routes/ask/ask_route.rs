//! POST /ask: answers a course question (or returns the course map for `map`).

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use tracing::{debug, error};

use crate::{
    core::app_state::AppState,
    error_handler::{AppResult, require_text},
    middleware_layer::request_id::request_id_of,
    routes::{ask::ask_response::AskResponse, question_request::QuestionRequest},
};

/// Handler: POST /ask
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:5000/ask \
///   -H 'content-type: application/json' \
///   -d '{"question":"What comes after CSE 110?"}'
/// ```
pub async fn ask(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<QuestionRequest>, JsonRejection>,
) -> AppResult<Json<AskResponse>> {
    let Json(body) = payload?;
    require_text("question", &body.question)?;

    let request_id = request_id_of(&headers);
    debug!(request_id = %request_id, "ask: start");

    let response = state.advisor.ask(&body.question).await.map_err(|e| {
        error!(request_id = %request_id, error = %e, "ask: failed");
        e
    })?;

    debug!(request_id = %request_id, chars = response.len(), "ask: done");
    Ok(Json(AskResponse { response }))
}
