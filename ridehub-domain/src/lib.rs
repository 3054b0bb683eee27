pub mod availability;
pub mod booking;
pub mod memory;
pub mod party;
pub mod pricing;
pub mod principal;
pub mod projection;
pub mod repository;
pub mod service;
pub mod transition;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Not authorized: {0}")]
    Authorization(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<Box<dyn std::error::Error + Send + Sync>> for DomainError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        DomainError::Internal(err.to_string())
    }
}
