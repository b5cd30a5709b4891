use serde::Deserialize;

/// Request payload shared by `/ask`, `/parse_question` and `/search`.
#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    /// Natural language question.
    pub question: String,
}
