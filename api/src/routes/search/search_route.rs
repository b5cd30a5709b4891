//! POST /search: cold-start sample on the first search of the process,
//! the extracted filter set afterwards.

use std::sync::Arc;

use advisor::SearchOutcome;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult, require_text},
    middleware_layer::request_id::request_id_of,
    routes::question_request::QuestionRequest,
};

pub async fn search(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<QuestionRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(body) = payload?;
    require_text("question", &body.question)?;
    let request_id = request_id_of(&headers);

    match state.advisor.search(&body.question).await? {
        SearchOutcome::ColdStart(hits) => {
            debug!(request_id = %request_id, hits = hits.len(), "search: cold start");
            Ok(Json(hits).into_response())
        }
        SearchOutcome::Extracted(set) => Ok(Json(set).into_response()),
        SearchOutcome::Unparsed { reason, .. } => {
            warn!(request_id = %request_id, %reason, "search: unparseable model reply");
            Err(AppError::unparseable(&reason))
        }
    }
}
