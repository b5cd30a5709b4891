//! POST /parse_question: field extraction only.

use std::sync::Arc;

use advisor::{Extraction, FilterSet};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use tracing::warn;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult, require_text},
    middleware_layer::request_id::request_id_of,
    routes::question_request::QuestionRequest,
};

pub async fn parse_question(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<QuestionRequest>, JsonRejection>,
) -> AppResult<Json<FilterSet>> {
    let Json(body) = payload?;
    require_text("question", &body.question)?;

    match state.advisor.parse_question(&body.question).await? {
        Extraction::Parsed(set) => Ok(Json(set)),
        Extraction::Unparsed { raw, reason } => {
            warn!(
                request_id = %request_id_of(&headers),
                raw_len = raw.len(),
                %reason,
                "parse_question: unparseable model reply"
            );
            Err(AppError::unparseable(&reason))
        }
    }
}
