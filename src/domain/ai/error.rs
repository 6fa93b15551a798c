use crate::domain::quota::{GateError, QuotaError, ResourceKind};
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum AiServiceError {
    #[error(transparent)]
    Quota(#[from] QuotaError),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("AI gateway error: {0}")]
    Upstream(String),
    #[error("AI gateway timed out for {0}")]
    TimedOut(ResourceKind),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<GateError<String>> for AiServiceError {
    fn from(err: GateError<String>) -> Self {
        match err {
            GateError::Quota(e) => AiServiceError::Quota(e),
            GateError::Upstream(detail) => AiServiceError::Upstream(detail),
            GateError::TimedOut { resource, .. } => AiServiceError::TimedOut(resource),
        }
    }
}

impl From<AiServiceError> for AppError {
    fn from(err: AiServiceError) -> Self {
        match err {
            AiServiceError::Quota(e) => AppError::from(e),
            AiServiceError::Invalid(msg) => AppError::BadRequest(msg),
            AiServiceError::Upstream(msg) => AppError::Upstream(msg),
            AiServiceError::TimedOut(resource) => {
                AppError::UpstreamTimeout(format!("{} operation", resource))
            }
            AiServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
