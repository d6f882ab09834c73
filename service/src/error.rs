//! Request-level errors and their HTTP mapping.
//!
//! # Design
//! Every failure a handler can hit becomes one `ServiceError` variant with a
//! fixed status code. Bodies use the `{"detail": "..."}` shape on every
//! error path. Store failures are logged here and reported to the client as a
//! bare 500 without driver details.

use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::model::InvalidTodoId;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Incorrect username or password")]
    InvalidCredentials,

    /// No `Authorization: Bearer <token>` header on a protected route.
    #[error("Not authenticated")]
    MissingToken,

    #[error("Could not validate credentials")]
    InvalidToken,

    #[error("Invalid todo id")]
    MalformedId(#[from] InvalidTodoId),

    #[error("Todo not found")]
    NotFound,

    /// The request body was rejected by the JSON or form extractor.
    #[error("{message}")]
    InvalidBody { status: StatusCode, message: String },

    #[error("Internal Server Error")]
    Store(#[from] StoreError),
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidCredentials => StatusCode::BAD_REQUEST,
            ServiceError::MissingToken | ServiceError::InvalidToken => StatusCode::UNAUTHORIZED,
            ServiceError::MalformedId(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::InvalidBody { status, .. } => *status,
            ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<FormRejection> for ServiceError {
    fn from(rejection: FormRejection) -> Self {
        ServiceError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match &self {
            ServiceError::Store(err) => tracing::error!(error = %err, "store operation failed"),
            ServiceError::MalformedId(err) => tracing::debug!(%err, "rejected malformed id"),
            _ => {}
        }

        let status = self.status_code();
        let body = Json(ErrorBody {
            detail: self.to_string(),
        });
        let mut response = (status, body).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
