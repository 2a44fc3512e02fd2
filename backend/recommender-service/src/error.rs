use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Relevance scoring failed or timed out. The whole request may be retried.
    #[error("Scoring error: {0}")]
    Scoring(String),

    /// A shortlisted product could not be resolved in the catalog.
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    #[error("Catalog load error: {0}")]
    CatalogLoad(String),

    #[error("Model loading error: {0}")]
    ModelLoad(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Only scoring failures are worth retrying; everything else is deterministic.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Scoring(_))
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let code = self.status_code();
        HttpResponse::build(code).json(ErrorResponse {
            error: self.to_string(),
            code: code.as_u16(),
        })
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Scoring(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
