use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use service::errors::ServiceError;

/// HTTP-shaped error: a status plus a JSON body. Authentication failures
/// and not-found responses carry an empty object so the caller learns
/// nothing beyond the status itself.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

impl ApiError {
    pub fn unauthenticated() -> Self {
        Self { status: StatusCode::UNAUTHORIZED, body: json!({}) }
    }

    pub fn not_found() -> Self {
        Self { status: StatusCode::NOT_FOUND, body: json!({}) }
    }

    pub fn bad_request() -> Self {
        Self { status: StatusCode::BAD_REQUEST, body: json!({}) }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Default translation from business errors to HTTP. Routes whose observed
/// contract deviates (PATCH/DELETE treating a miss as 400) override at the
/// call site.
impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation { field, message } => Self {
                status: StatusCode::BAD_REQUEST,
                body: json!({ "errors": { field: message } }),
            },
            ServiceError::DuplicateEmail => Self {
                status: StatusCode::BAD_REQUEST,
                body: json!({ "errors": { "email": "email already registered" } }),
            },
            ServiceError::InvalidCredentials => Self::bad_request(),
            ServiceError::Unauthenticated => Self::unauthenticated(),
            ServiceError::NotFound => Self::not_found(),
            // Store failures surface as a client-visible 400 on the todo
            // routes, matching the original API's behavior.
            ServiceError::Db(msg) => {
                tracing::error!(error = %msg, "store error");
                Self::bad_request()
            }
            ServiceError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: json!({ "error": "internal error" }),
                }
            }
        }
    }
}
