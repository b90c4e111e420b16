use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum PayslipError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Persistence failure: {0}")]
    Persistence(String),
}

impl PayslipError {
    pub fn not_found(what: &str) -> Self {
        PayslipError::NotFound(format!("{} not found", what))
    }
}

impl From<StoreError> for PayslipError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => PayslipError::NotFound(e.to_string()),
            StoreError::Duplicate { .. } | StoreError::VersionMismatch { .. } => PayslipError::Conflict(e.to_string()),
            StoreError::Database(message) => PayslipError::Persistence(message),
        }
    }
}

impl ResponseError for PayslipError {
    fn status_code(&self) -> StatusCode {
        match self {
            PayslipError::NotFound(_) => StatusCode::NOT_FOUND,
            PayslipError::Validation(_) => StatusCode::BAD_REQUEST,
            PayslipError::Conflict(_) => StatusCode::CONFLICT,
            PayslipError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            PayslipError::Persistence(detail) => json!({
                "success": false,
                "message": "Something went wrong, Contact with system admin",
                "error": detail,
            }),
            other => json!({
                "success": false,
                "message": other.to_string(),
            }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_taxonomy() {
        assert!(matches!(PayslipError::from(StoreError::NotFound), PayslipError::NotFound(_)));
        assert!(matches!(
            PayslipError::from(StoreError::VersionMismatch { current: 3 }),
            PayslipError::Conflict(_)
        ));
        assert!(matches!(
            PayslipError::from(StoreError::Database("connection reset".into())),
            PayslipError::Persistence(m) if m == "connection reset"
        ));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(PayslipError::not_found("Employee").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(PayslipError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(PayslipError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            PayslipError::Persistence("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
