use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("{field}: {message}")]
    Validation { field: String, message: String },
    #[error("database error: {0}")]
    Db(String),
}

impl ModelError {
    pub fn validation(field: &str, message: &str) -> Self {
        Self::Validation { field: field.to_string(), message: message.to_string() }
    }
}
