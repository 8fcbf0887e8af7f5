use thiserror::Error;

/// Business errors for the todo API. HTTP status mapping lives in the
/// server crate; nothing here knows about the web framework.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{field}: {message}")]
    Validation { field: String, message: String },
    #[error("email already registered")]
    DuplicateEmail,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("unauthenticated")]
    Unauthenticated,
    #[error("not found")]
    NotFound,
    #[error("internal error: {0}")]
    Internal(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn validation(field: &str, message: &str) -> Self {
        Self::Validation { field: field.to_string(), message: message.to_string() }
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation { .. } => 1001,
            ServiceError::DuplicateEmail => 1002,
            ServiceError::InvalidCredentials => 1003,
            ServiceError::Unauthenticated => 1004,
            ServiceError::NotFound => 1005,
            ServiceError::Internal(_) => 1101,
            ServiceError::Db(_) => 1200,
        }
    }
}

impl From<models::errors::ModelError> for ServiceError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation { field, message } => {
                ServiceError::Validation { field, message }
            }
            models::errors::ModelError::Db(msg) => ServiceError::Db(msg),
        }
    }
}
