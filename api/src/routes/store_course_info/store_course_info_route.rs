//! POST /store_course_info: queues background enrichment and returns at once.
//! Jobs beyond the concurrency limit wait their turn; none is dropped.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
};
use tracing::info;

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    middleware_layer::request_id::request_id_of,
    routes::store_course_info::store_course_info_request::{
        StoreCourseInfoRequest, StoreCourseInfoResponse,
    },
};

pub const STATUS_QUEUED: &str = "Course info processing started";

pub async fn store_course_info(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<StoreCourseInfoRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<StoreCourseInfoResponse>)> {
    let Json(body) = payload?;
    let request_id = request_id_of(&headers);

    state.advisor.store_course_info(body.openai_completion);
    info!(request_id = %request_id, "store_course_info: queued");

    Ok((
        StatusCode::ACCEPTED,
        Json(StoreCourseInfoResponse {
            status: STATUS_QUEUED.to_string(),
        }),
    ))
}
