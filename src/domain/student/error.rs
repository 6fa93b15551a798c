use crate::domain::quota::{GateError, QuotaError};
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum StudentServiceError {
    #[error(transparent)]
    Quota(#[from] QuotaError),
    #[error("invalid student: {0}")]
    Invalid(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("student already exists: {0}")]
    AlreadyExists(String),
    #[error("dependency error: {0}")]
    Dependency(String),
}

impl From<GateError<AppError>> for StudentServiceError {
    fn from(err: GateError<AppError>) -> Self {
        match err {
            GateError::Quota(e) => StudentServiceError::Quota(e),
            GateError::Upstream(AppError::Conflict(msg)) => StudentServiceError::AlreadyExists(msg),
            GateError::Upstream(e) => StudentServiceError::Dependency(e.to_string()),
            GateError::TimedOut { resource, after } => StudentServiceError::Dependency(format!(
                "{} write timed out after {:?}",
                resource, after
            )),
        }
    }
}

impl From<AppError> for StudentServiceError {
    fn from(err: AppError) -> Self {
        StudentServiceError::Dependency(err.to_string())
    }
}

impl From<StudentServiceError> for AppError {
    fn from(err: StudentServiceError) -> Self {
        match err {
            StudentServiceError::Quota(e) => AppError::from(e),
            StudentServiceError::Invalid(msg) => AppError::BadRequest(msg),
            StudentServiceError::Forbidden(msg) => AppError::Forbidden(msg),
            StudentServiceError::AlreadyExists(msg) => AppError::Conflict(msg),
            StudentServiceError::Dependency(msg) => AppError::Internal(msg),
        }
    }
}
