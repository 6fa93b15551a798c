use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum ContentServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid content: {0}")]
    Invalid(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<AppError> for ContentServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(msg) => ContentServiceError::Invalid(msg),
            AppError::Forbidden(msg) => ContentServiceError::Forbidden(msg),
            _ => ContentServiceError::Dependency(err.to_string()),
        }
    }
}

impl From<ContentServiceError> for AppError {
    fn from(err: ContentServiceError) -> Self {
        match err {
            ContentServiceError::Invalid(msg) => AppError::BadRequest(msg),
            ContentServiceError::Forbidden(msg) => AppError::Forbidden(msg),
            ContentServiceError::Dependency(msg) => AppError::Internal(msg),
            ContentServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
