//! Typed error for the advisor crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdvisorError {
    /// Completion API unreachable or answered with an error.
    #[error("LLM error: {0}")]
    Llm(#[from] ai_llm_service::AiLlmError),

    /// Search service unreachable or answered with an error.
    #[error("course index error: {0}")]
    Index(#[from] course_index::errors::CourseIndexError),

    /// JSON (de)serialization of prompt context (should be rare).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
