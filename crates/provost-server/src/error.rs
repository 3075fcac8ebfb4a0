//! HTTP error mapping.
//!
//! Every handler returns `Result<_, ApiError>`; the conversion from
//! [`ProvostError`] fixes the status for each variant and renders a
//! `{"detail": ...}` body. 401 responses carry `WWW-Authenticate`.

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use provost_core::error::ProvostError;
use serde_json::json;
use tracing::error;

#[derive(Debug)]
pub struct ApiError(pub ProvostError);

impl From<ProvostError> for ApiError {
    fn from(err: ProvostError) -> Self {
        Self(err)
    }
}

fn status_for(err: &ProvostError) -> StatusCode {
    match err {
        ProvostError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ProvostError::Conflict { .. } => StatusCode::CONFLICT,
        ProvostError::Auth { .. } => StatusCode::UNAUTHORIZED,
        ProvostError::Forbidden { .. } => StatusCode::FORBIDDEN,
        ProvostError::NotFound { .. } => StatusCode::NOT_FOUND,
        ProvostError::Database(_) | ProvostError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);

        // Storage details stay in the log, not the response body.
        let detail = match &self.0 {
            ProvostError::Database(msg) => {
                error!(error = %msg, "database error");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({ "detail": detail }));
        if status == StatusCode::UNAUTHORIZED {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}
