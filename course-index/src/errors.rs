//! Unified error type for the course-index crate.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors produced by the course index (configuration, transport, decoding).
#[derive(Debug, Error)]
pub enum CourseIndexError {
    // ── Configuration / environment ──────────────────────────────────────────
    /// Required environment variable is missing.
    #[error("missing env variable: {key}")]
    EnvMissing { key: String },

    /// Failed to parse an environment variable into the expected type.
    #[error("failed to parse env variable: {key} = '{value}'")]
    EnvParse { key: String, value: String },

    /// Configuration combination is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── I/O & serialization ─────────────────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Search service ──────────────────────────────────────────────────────
    /// The search service could not be reached.
    #[error("search transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The search service answered with a non-success status.
    #[error("search service returned HTTP {status} for {url}: {snippet}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        snippet: String,
    },

    /// The search response did not have the expected shape.
    #[error("unexpected search response: {0}")]
    Decode(String),
}
