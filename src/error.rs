use crate::domain::payment::{ErrorEnvelope, ErrorPayload};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("payment initiation failed")]
    InitiationFailed { details: serde_json::Value },

    #[error("internal error: {0}")]
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::InitiationFailed { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::InitiationFailed { .. } => "INITIATION_FAILED",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        let details = match self {
            ApiError::InitiationFailed { details } => Some(details.clone()),
            _ => None,
        };
        ErrorEnvelope {
            error: ErrorPayload {
                code: self.code().to_string(),
                message: self.to_string(),
                details,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(e) = &self {
            tracing::error!(error = %e, "request failed");
        }
        (self.status(), Json(self.envelope())).into_response()
    }
}

// Repositories return anyhow; constraint violations surface as client errors.
impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        let classified = e
            .downcast_ref::<sqlx::Error>()
            .and_then(|err| match err {
                sqlx::Error::Database(db) => match db.code().as_deref() {
                    Some("23505") => Some(ApiError::Conflict(
                        db.constraint()
                            .map(|c| format!("duplicate value violates {c}"))
                            .unwrap_or_else(|| "duplicate value".to_string()),
                    )),
                    Some("23503") => Some(ApiError::Validation(
                        "referenced record does not exist".to_string(),
                    )),
                    Some("23514") => Some(ApiError::Validation(
                        db.constraint()
                            .map(|c| format!("check constraint {c} failed"))
                            .unwrap_or_else(|| "check constraint failed".to_string()),
                    )),
                    _ => None,
                },
                _ => None,
            });

        classified.unwrap_or(ApiError::Internal(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_taxonomy_to_status_codes() {
        assert_eq!(ApiError::NotFound("booking").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Conflict("payment already exists".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Validation("booking_id is required".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InitiationFailed {
                details: serde_json::json!({"message": "bad key"})
            }
            .status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn upstream_payload_is_passed_through() {
        let err = ApiError::InitiationFailed {
            details: serde_json::json!({"status": "failed", "message": "Invalid API Key"}),
        };
        let body = serde_json::to_value(err.envelope()).unwrap();
        assert_eq!(body["error"]["code"], "INITIATION_FAILED");
        assert_eq!(body["error"]["details"]["message"], "Invalid API Key");
    }

    #[test]
    fn unclassified_anyhow_is_internal() {
        let err: ApiError = anyhow::anyhow!("pool closed").into();
        assert!(matches!(err, ApiError::Internal(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn column_decode_failures_are_internal() {
        let err: ApiError =
            anyhow::Error::from(sqlx::Error::ColumnNotFound("price_per_night".to_string())).into();
        assert!(matches!(err, ApiError::Internal(_)));
        assert_eq!(err.envelope().error.code, "INTERNAL_ERROR");
    }
}
