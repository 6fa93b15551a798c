use crate::domain::quota::{QuotaPolicy, ResourceKind, Subject};
use crate::error::AppResult;
use async_trait::async_trait;

/// Source of quota policies, read from the subject's plan and grants
#[async_trait]
pub trait PolicyRepository: Send + Sync {
    /// `None` when the subject's organization or its plan row does not exist
    async fn find_policy(
        &self,
        subject: &Subject,
        resource: ResourceKind,
    ) -> AppResult<Option<QuotaPolicy>>;
}
