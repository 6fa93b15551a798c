use crate::domain::quota::{GateError, QuotaError, ResourceKind};
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum EmailServiceError {
    #[error(transparent)]
    Quota(#[from] QuotaError),
    #[error("invalid email: {0}")]
    Invalid(String),
    #[error("email provider error: {0}")]
    Upstream(String),
    #[error("email provider timed out for {0}")]
    TimedOut(ResourceKind),
}

impl From<GateError<String>> for EmailServiceError {
    fn from(err: GateError<String>) -> Self {
        match err {
            GateError::Quota(e) => EmailServiceError::Quota(e),
            GateError::Upstream(detail) => EmailServiceError::Upstream(detail),
            GateError::TimedOut { resource, .. } => EmailServiceError::TimedOut(resource),
        }
    }
}

impl From<EmailServiceError> for AppError {
    fn from(err: EmailServiceError) -> Self {
        match err {
            EmailServiceError::Quota(e) => AppError::from(e),
            EmailServiceError::Invalid(msg) => AppError::BadRequest(msg),
            EmailServiceError::Upstream(msg) => AppError::Upstream(msg),
            EmailServiceError::TimedOut(_) => {
                AppError::UpstreamTimeout("Email provider did not respond".to_string())
            }
        }
    }
}
