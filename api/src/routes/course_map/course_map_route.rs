//! GET /generate_course_map

use std::sync::Arc;

use advisor::CourseMap;
use axum::{Json, extract::State};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::course_map::course_map_response::CourseMapResponse,
};

pub async fn generate_course_map(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<CourseMapResponse>> {
    match state.advisor.course_map().await? {
        CourseMap::Generated(course_map) => Ok(Json(CourseMapResponse { course_map })),
        CourseMap::NoData => Err(AppError::no_course_data()),
    }
}
