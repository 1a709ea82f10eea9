use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Invalid template {id}: {reason}")]
    InvalidTemplate { id: String, reason: String },
    #[error("Malformed time: {0}")]
    MalformedTime(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid window: {start} > {end}")]
    InvalidWindow { start: String, end: String },
    #[error("Unknown repeat type: {0}")]
    UnknownRepeatType(String),
}

impl ModelError {
    pub fn invalid_template(id: impl Into<String>, reason: impl Into<String>) -> Self {
        ModelError::InvalidTemplate {
            id: id.into(),
            reason: reason.into(),
        }
    }
}
