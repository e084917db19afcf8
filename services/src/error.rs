use batcher::BatcherError;
use sea_orm::DbErr;
use thiserror::Error;

/// Errors returned by the service layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Batcher(#[from] BatcherError),
    #[error("database error: {0}")]
    Db(#[from] DbErr),
    #[error("background task failed: {0}")]
    Task(String),
}

impl ServiceError {
    pub fn not_found(what: impl Into<String>) -> Self {
        ServiceError::NotFound(what.into())
    }

    /// Whether the error was caused by the caller's input rather than by the server.
    pub fn is_client_error(&self) -> bool {
        match self {
            ServiceError::NotFound(_) | ServiceError::Conflict(_) | ServiceError::Invalid(_) => true,
            ServiceError::Batcher(e) => matches!(
                e,
                BatcherError::UnknownExtension(_)
                    | BatcherError::InvalidLayout(_)
                    | BatcherError::TransformCompile { .. }
                    | BatcherError::DuplicateEntry { .. }
            ),
            ServiceError::Db(_) | ServiceError::Task(_) => false,
        }
    }
}

impl From<tokio::task::JoinError> for ServiceError {
    fn from(err: tokio::task::JoinError) -> Self {
        ServiceError::Task(err.to_string())
    }
}
