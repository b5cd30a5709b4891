use serde::{Deserialize, Serialize};

/// Up to thirteen optional scalar filters for one course query.
///
/// Every present, non-blank filter contributes one `should` clause; the
/// query matches when **any** clause matches, so adding filters widens the
/// result set instead of narrowing it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseFilters {
    pub course_id: Option<String>,
    pub subject_name: Option<String>,
    pub subject_code: Option<String>,
    pub category: Option<String>,
    pub semester: Option<String>,
    pub description: Option<String>,
    pub critical_requirement: Option<String>,
    pub total_credits: Option<String>,
    pub next_subject_code: Option<String>,
    pub prior_requirement: Option<String>,
    pub session: Option<String>,
    pub optional: Option<String>,
    pub minimum_passing_grade: Option<String>,
}

impl CourseFilters {
    /// Filters that only pin the course code.
    pub fn for_course(course_id: impl Into<String>) -> Self {
        Self {
            course_id: Some(course_id.into()),
            ..Self::default()
        }
    }
}
