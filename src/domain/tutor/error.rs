use crate::domain::quota::{GateError, QuotaError};
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum TutorServiceError {
    #[error(transparent)]
    Quota(#[from] QuotaError),
    #[error("invalid message: {0}")]
    Invalid(String),
    #[error("tutor unavailable: {0}")]
    Upstream(String),
    #[error("tutor timed out")]
    TimedOut,
}

impl From<GateError<String>> for TutorServiceError {
    fn from(err: GateError<String>) -> Self {
        match err {
            GateError::Quota(e) => TutorServiceError::Quota(e),
            GateError::Upstream(detail) => TutorServiceError::Upstream(detail),
            GateError::TimedOut { .. } => TutorServiceError::TimedOut,
        }
    }
}

impl From<TutorServiceError> for AppError {
    fn from(err: TutorServiceError) -> Self {
        match err {
            TutorServiceError::Quota(e) => AppError::from(e),
            TutorServiceError::Invalid(msg) => AppError::BadRequest(msg),
            TutorServiceError::Upstream(msg) => AppError::Upstream(msg),
            TutorServiceError::TimedOut => {
                AppError::UpstreamTimeout("Tutor did not respond in time".to_string())
            }
        }
    }
}
