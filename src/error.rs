use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::services::StoreError;

/// Errors surfaced by the engine to callers.
///
/// Empty query results are never errors; only malformed input, missing
/// referenced entities, or unauthorized access surface here.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl EngineError {
    fn kind(&self) -> &'static str {
        match self {
            EngineError::NotFound(_) => "not_found",
            EngineError::InvalidLocation(_) => "invalid_location",
            EngineError::Unauthorized(_) => "unauthorized",
            EngineError::Store(_) => "store_error",
        }
    }
}

impl ResponseError for EngineError {
    fn status_code(&self) -> StatusCode {
        match self {
            EngineError::NotFound(_) => StatusCode::NOT_FOUND,
            EngineError::InvalidLocation(_) => StatusCode::BAD_REQUEST,
            EngineError::Unauthorized(_) => StatusCode::FORBIDDEN,
            EngineError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            EngineError::NotFound("user 1".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            EngineError::InvalidLocation("latitude 91 out of range".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            EngineError::Unauthorized("not the reporter".into()).status_code(),
            StatusCode::FORBIDDEN
        );
    }
}
