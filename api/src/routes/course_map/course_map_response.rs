use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CourseMapResponse {
    pub course_map: String,
}
