use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::{auth::google::AuthProviderError, store::StoreError, validation::FieldError};

/// Error returned by every handler; maps onto the HTTP status and JSON body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {} field error(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    AuthProvider(#[from] AuthProviderError),

    #[error("token signing failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl From<Vec<FieldError>> for ApiError {
    fn from(errors: Vec<FieldError>) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(vec![FieldError::new("body", rejection.body_text())])
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            // details are logged by the handler, clients get an opaque message
            ApiError::Store(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Server error" })),
            )
                .into_response(),
            ApiError::AuthProvider(e) => {
                (e.status(), Json(json!({ "error": e.to_string() }))).into_response()
            }
            ApiError::Token(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to issue token" })),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        let v = ApiError::from(vec![FieldError::new("price", "bad")]);
        assert_eq!(v.into_response().status(), StatusCode::BAD_REQUEST);

        let s = ApiError::from(StoreError::Unavailable("down".into()));
        assert_eq!(s.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);

        let a = ApiError::from(AuthProviderError::NoUsableEmail);
        assert_eq!(a.into_response().status(), StatusCode::UNAUTHORIZED);

        let r = ApiError::from(AuthProviderError::Rejected("invalid_grant".into()));
        assert_eq!(r.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
