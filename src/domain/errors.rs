use std::fmt;

use crate::domain::pix::PixError;

// Domain-level errors shared by every use case.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    NotFound(&'static str),
    AlreadyExists(&'static str),
    AccessDenied(&'static str),
    InvalidContent(String),
    Unauthorized,
    SessionExpired,
    InvalidCredentials,
    Database(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(resource) => write!(f, "{resource} not found"),
            AppError::AlreadyExists(resource) => write!(f, "{resource} already exists"),
            AppError::AccessDenied(resource) => write!(f, "access denied to {resource}"),
            AppError::InvalidContent(message) => write!(f, "{message}"),
            AppError::Unauthorized => write!(f, "invalid session token"),
            AppError::SessionExpired => write!(f, "session expired"),
            AppError::InvalidCredentials => write!(f, "invalid email or password"),
            AppError::Database(detail) => write!(f, "database error: {detail}"),
            AppError::Internal(detail) => write!(f, "internal error: {detail}"),
        }
    }
}

impl std::error::Error for AppError {}

// Errors reported by storage ports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    // A unique constraint rejected the write.
    Conflict,
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Conflict => write!(f, "unique constraint violated"),
            StoreError::Backend(detail) => write!(f, "{detail}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<PixError> for AppError {
    fn from(err: PixError) -> Self {
        AppError::InvalidContent(err.to_string())
    }
}
