use serde::{Deserialize, Serialize};

/// Output labels, shared with the extracted filter set so both shapes can be
/// fed back to the model interchangeably.
pub mod labels {
    pub const COURSE_CODES: &str = "Course Codes";
    pub const CATEGORIES: &str = "Categories";
    pub const SEMESTERS: &str = "Semesters";
    pub const DESCRIPTION: &str = "Description";
    pub const CRITICAL_REQUIREMENT: &str = "Critical Requirement";
    pub const TOTAL_CREDITS: &str = "Total Credits";
    pub const NEXT_SUBJECT_CODES: &str = "Next Subject Codes";
    pub const PRIOR_REQUIREMENTS: &str = "Prior Requirements";
    pub const CATEGORY: &str = "Category";
    pub const SESSION: &str = "Session";
    pub const OPTIONAL: &str = "Optional";
    pub const MINIMUM_PASSING_GRADE: &str = "Minimum_passing_Grade";
}

/// One matched course record flattened into labeled single-element lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseHit {
    #[serde(rename = "Course Codes")]
    pub course_codes: Vec<String>,
    #[serde(rename = "Categories")]
    pub categories: Vec<String>,
    #[serde(rename = "Semesters")]
    pub semesters: Vec<String>,
    #[serde(rename = "Description")]
    pub description: Vec<String>,
    #[serde(rename = "Critical Requirement")]
    pub critical_requirement: Vec<String>,
    #[serde(rename = "Total Credits")]
    pub total_credits: Vec<String>,
    #[serde(rename = "Next Subject Codes")]
    pub next_subject_codes: Vec<String>,
    #[serde(rename = "Prior Requirements")]
    pub prior_requirements: Vec<String>,
    #[serde(rename = "Category")]
    pub category: Vec<String>,
    #[serde(rename = "Session")]
    pub session: Vec<String>,
    #[serde(rename = "Optional")]
    pub optional: Vec<String>,
    #[serde(rename = "Minimum_passing_Grade")]
    pub minimum_passing_grade: Vec<String>,
}

impl CourseHit {
    /// Course code of the hit (`""` when the record had none).
    pub fn course_code(&self) -> &str {
        self.course_codes.first().map(String::as_str).unwrap_or("")
    }
}
