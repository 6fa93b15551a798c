use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::error::QuotaError;
use super::model::{QuotaPolicy, ResourceKind, Subject};
use crate::infrastructure::repositories::PolicyRepository;

/// Resolves the base limit and bonus for a subject, with a short-lived cache.
///
/// Anything other than a found policy resolves to `PolicyUnknown`, so gated
/// actions fail closed. Misses are never cached.
pub struct PolicyResolver {
    source: Arc<dyn PolicyRepository>,
    cache: Option<Cache<(Uuid, ResourceKind), QuotaPolicy>>,
}

impl PolicyResolver {
    pub fn new(source: Arc<dyn PolicyRepository>, ttl: Duration) -> Self {
        let cache = if ttl.is_zero() {
            None
        } else {
            Some(
                Cache::builder()
                    .max_capacity(10_000)
                    .time_to_live(ttl)
                    .build(),
            )
        };

        Self { source, cache }
    }

    pub async fn resolve(
        &self,
        subject: &Subject,
        resource: ResourceKind,
    ) -> Result<QuotaPolicy, QuotaError> {
        let cache_key = (subject.id, resource);

        if let Some(cache) = &self.cache {
            if let Some(policy) = cache.get(&cache_key).await {
                return Ok(policy);
            }
        }

        let policy = match self.source.find_policy(subject, resource).await {
            Ok(Some(policy)) => policy,
            Ok(None) => {
                tracing::warn!(
                    subject_id = %subject.id,
                    organization_id = %subject.organization_id,
                    resource = %resource,
                    "No quota policy for subject"
                );
                return Err(QuotaError::PolicyUnknown(resource));
            }
            Err(e) => {
                tracing::error!(
                    subject_id = %subject.id,
                    resource = %resource,
                    error = %e,
                    "Quota policy lookup failed"
                );
                return Err(QuotaError::PolicyUnknown(resource));
            }
        };

        if let Some(cache) = &self.cache {
            cache.insert(cache_key, policy).await;
        }

        Ok(policy)
    }

    /// Drop a cached policy so the next resolve sees fresh limits
    pub async fn invalidate(&self, subject_id: Uuid, resource: ResourceKind) {
        if let Some(cache) = &self.cache {
            cache.invalidate(&(subject_id, resource)).await;
        }
    }
}
