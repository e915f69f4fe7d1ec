// error.rs
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to callers of the Tuki service. Upstream failures (image
/// search, Graph API) never show up here; they are replaced by fallbacks.
#[derive(Error, Debug)]
pub enum TukiError {
    #[error("{0}")]
    Validation(String),
    #[error("session {0} not found")]
    SessionNotFound(uuid::Uuid),
    #[error("an image is required before publishing")]
    MissingImage,
    #[error("internal error: {0}")]
    Internal(String),
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ResponseError for TukiError {
    fn status_code(&self) -> StatusCode {
        match self {
            TukiError::Validation(_) | TukiError::MissingImage => StatusCode::BAD_REQUEST,
            TukiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            TukiError::Internal(_) | TukiError::Storage(_) | TukiError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_bad_requests() {
        let err = TukiError::Validation("Indicá al menos una ubicación".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Indicá al menos una ubicación");
        assert_eq!(TukiError::MissingImage.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_session_is_not_found() {
        let err = TukiError::SessionNotFound(uuid::Uuid::new_v4());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_faults_are_server_errors() {
        let err = TukiError::Internal("session store unavailable".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
