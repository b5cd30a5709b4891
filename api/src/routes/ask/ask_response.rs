use serde::Serialize;

/// Response payload for /ask.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    /// Composed answer, or the course map for `map`.
    pub response: String,
}
