use std::time::Duration;

use super::model::ResourceKind;
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuotaError {
    #[error("quota policy unknown for {0}")]
    PolicyUnknown(ResourceKind),
    #[error("{resource} limit reached: used {used} of {limit}")]
    LimitReached {
        resource: ResourceKind,
        used: i64,
        limit: i64,
    },
    #[error("usage counter unavailable for {resource}: {reason}")]
    CounterUnavailable {
        resource: ResourceKind,
        reason: String,
    },
    #[error("usage counter write failed for {resource}: {reason}")]
    CounterWriteFailed {
        resource: ResourceKind,
        reason: String,
    },
}

/// Failure of a gated action: either the gate denied it or the operation itself failed
#[derive(Debug, thiserror::Error)]
pub enum GateError<E> {
    #[error(transparent)]
    Quota(#[from] QuotaError),
    #[error("upstream operation failed: {0}")]
    Upstream(E),
    #[error("{resource} operation timed out after {after:?}")]
    TimedOut {
        resource: ResourceKind,
        after: Duration,
    },
}

impl From<QuotaError> for AppError {
    fn from(err: QuotaError) -> Self {
        match err {
            QuotaError::PolicyUnknown(resource) => AppError::PolicyUnknown(resource),
            QuotaError::LimitReached {
                resource,
                used,
                limit,
            } => AppError::LimitReached {
                resource,
                used,
                limit,
            },
            QuotaError::CounterUnavailable { .. } => AppError::Unavailable(err.to_string()),
            QuotaError::CounterWriteFailed { .. } => AppError::Internal(err.to_string()),
        }
    }
}
