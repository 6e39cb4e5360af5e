use thiserror::Error;

/// Errors produced by request payload validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required and must not be empty")]
    Required { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("{field} must be a non-negative integer")]
    Negative { field: &'static str },
}
