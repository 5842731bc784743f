use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use skyway_domain::DomainError;
use skyway_shared::crypto::CryptoError;
use skyway_store::StoreError;

/// Application error with an HTTP status and a stable machine code. The
/// central `IntoResponse` impl renders every variant into the uniform
/// envelope; internal detail never reaches the client.
#[derive(Debug)]
pub enum AppError {
    Validation(Vec<String>),
    Authentication(String),
    Authorization(String),
    NotFound(String),
    Conflict(String),
    Payment(String),
    RateLimited,
    Internal(anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Authorization(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Payment(_) => StatusCode::PAYMENT_REQUIRED,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Authentication(_) => "AUTHENTICATION_ERROR",
            AppError::Authorization(_) => "AUTHORIZATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Payment(_) => "PAYMENT_ERROR",
            AppError::RateLimited => "RATE_LIMITED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn internal<E: Into<anyhow::Error>>(err: E) -> Self {
        AppError::Internal(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (message, details) = match &self {
            AppError::Validation(errors) => (
                "Validation failed".to_string(),
                Some(json!(errors)),
            ),
            AppError::Authentication(msg)
            | AppError::Authorization(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::Payment(msg) => (msg.clone(), None),
            AppError::RateLimited => ("Rate limit exceeded".to_string(), None),
            AppError::Internal(err) => {
                tracing::error!("Internal server error: {:#}", err);
                ("Internal server error".to_string(), None)
            }
        };

        let mut error = json!({ "code": self.code() });
        if let Some(details) = details {
            error["details"] = details;
        }

        let body = Json(json!({
            "success": false,
            "message": message,
            "error": error,
        }));

        (self.status(), body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => AppError::NotFound(format!("{} not found", what)),
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            StoreError::Corrupt(_) | StoreError::Database(_) => AppError::internal(err),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(vec![msg]),
            DomainError::RuleViolation(msg) => AppError::Conflict(msg),
            DomainError::UnknownVariant { .. } => AppError::Validation(vec![err.to_string()]),
        }
    }
}

impl From<CryptoError> for AppError {
    fn from(err: CryptoError) -> Self {
        AppError::internal(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_variants_to_statuses() {
        assert_eq!(
            AppError::Validation(vec![]).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Authentication("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Authorization("x".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(AppError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn store_conflicts_stay_conflicts() {
        let err: AppError = StoreError::Conflict("seat taken".into()).into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "CONFLICT");
    }

    #[test]
    fn store_corruption_is_opaque_internal() {
        let err: AppError = StoreError::Corrupt("bad enum".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
