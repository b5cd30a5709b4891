use serde::{Deserialize, Serialize};

/// Request payload for /store_course_info.
#[derive(Debug, Deserialize)]
pub struct StoreCourseInfoRequest {
    /// Free text (typically an earlier model answer) to mine for courses.
    pub openai_completion: String,
}

#[derive(Debug, Serialize)]
pub struct StoreCourseInfoResponse {
    pub status: String,
}
