use advisor::AdvisorError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::core::app_state::ConfigError;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] ConfigError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Rich HTTP error mapped from lower layers with specific status & code.
    #[error("{message}")]
    Http {
        status: StatusCode,
        code: &'static str,
        message: String,
    },
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // 4xx
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,

            // custom mapped
            AppError::Http { status, .. } => *status,

            // 5xx, startup-only
            AppError::Config(_) | AppError::Bind(_) | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Http { code, .. } => code,
        }
    }

    /// Model reply held no parseable JSON object.
    pub fn unparseable(reason: &str) -> Self {
        AppError::Http {
            status: StatusCode::BAD_GATEWAY,
            code: "MODEL_OUTPUT_UNPARSEABLE",
            message: format!("The model reply could not be parsed as JSON: {reason}"),
        }
    }

    /// Course map requested before any context was accumulated.
    pub fn no_course_data() -> Self {
        AppError::Http {
            status: StatusCode::NOT_FOUND,
            code: "NO_COURSE_DATA",
            message: advisor::NO_COURSE_DATA.into(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.error_code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

/// Upstream failures become `502` with a code naming the failing service.
impl From<AdvisorError> for AppError {
    fn from(err: AdvisorError) -> Self {
        match err {
            AdvisorError::Llm(e) => AppError::Http {
                status: StatusCode::BAD_GATEWAY,
                code: "LLM_UNAVAILABLE",
                message: format!("Completion service failed: {e}"),
            },
            AdvisorError::Index(e) => AppError::Http {
                status: StatusCode::BAD_GATEWAY,
                code: "SEARCH_UNAVAILABLE",
                message: format!("Search service failed: {e}"),
            },
            AdvisorError::Json(e) => AppError::Http {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "INTERNAL_ERROR",
                message: format!("Failed to render prompt context: {e}"),
            },
        }
    }
}

/// Rejects blank questions.
pub fn require_text(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("`{field}` must not be empty")));
    }
    Ok(())
}
