use crate::domain::auth::AuthContext;
use crate::domain::quota::{evaluate, Period, QuotaError, ResourceKind, Subject};
use crate::domain::shared::usage_dto::{PeriodUsage, ResourceUsage, UsageResponse};
use crate::error::{AppError, AppResult};
use crate::infrastructure::repositories::{UsageRecord, UsageRepository, UsageSnapshot};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

/// Monthly periods returned alongside a single resource
const HISTORY_PERIODS: i64 = 6;

pub struct UsageService {
    usage_repo: Arc<UsageRepository>,
}

impl UsageService {
    pub fn new(usage_repo: Arc<UsageRepository>) -> Self {
        Self { usage_repo }
    }
}

#[async_trait]
pub trait UsageServiceApi: Send + Sync {
    /// Every resource for the caller. Unresolvable resources carry an error instead of a status.
    async fn get_all(&self, ctx: &AuthContext) -> AppResult<UsageResponse>;

    /// One resource with its recent history
    async fn get_one(&self, ctx: &AuthContext, resource: ResourceKind) -> AppResult<ResourceUsage>;
}

#[async_trait]
impl UsageServiceApi for UsageService {
    async fn get_all(&self, ctx: &AuthContext) -> AppResult<UsageResponse> {
        let now = Utc::now();
        let mut resources = Vec::with_capacity(ResourceKind::ALL.len());

        for resource in ResourceKind::ALL {
            let subject = Subject::for_resource(ctx, resource);
            let period = Period::current(resource, now);

            let entry = match self.usage_repo.get_usage(&subject, resource, period).await {
                Ok(Some(snapshot)) => resource_usage(resource, period, &snapshot),
                Ok(None) => unavailable(resource, QuotaError::PolicyUnknown(resource).to_string()),
                Err(e) => {
                    tracing::error!(
                        organization_id = %ctx.organization_id,
                        resource = %resource,
                        error = %e,
                        "Failed to read usage"
                    );
                    unavailable(resource, "usage temporarily unavailable".to_string())
                }
            };
            resources.push(entry);
        }

        Ok(UsageResponse { resources })
    }

    async fn get_one(&self, ctx: &AuthContext, resource: ResourceKind) -> AppResult<ResourceUsage> {
        let subject = Subject::for_resource(ctx, resource);
        let period = Period::current(resource, Utc::now());

        let snapshot = self
            .usage_repo
            .get_usage(&subject, resource, period)
            .await?
            .ok_or(AppError::PolicyUnknown(resource))?;

        let mut usage = resource_usage(resource, period, &snapshot);
        if resource.is_periodic() {
            let records = self
                .usage_repo
                .get_usage_history(subject.id, resource, HISTORY_PERIODS)
                .await?;
            usage.history = Some(history(records));
        }

        Ok(usage)
    }
}

fn resource_usage(resource: ResourceKind, period: Period, snapshot: &UsageSnapshot) -> ResourceUsage {
    let status = evaluate(snapshot.used, snapshot.policy.base_limit, snapshot.policy.bonus);
    ResourceUsage {
        resource,
        period: Some(period.token()),
        resets_at: period.resets_at(),
        bonus: Some(snapshot.policy.bonus),
        status: Some(status),
        error: None,
        history: None,
    }
}

fn unavailable(resource: ResourceKind, error: String) -> ResourceUsage {
    ResourceUsage {
        resource,
        period: None,
        resets_at: None,
        bonus: None,
        status: None,
        error: Some(error),
        history: None,
    }
}

fn history(records: Vec<UsageRecord>) -> Vec<PeriodUsage> {
    records
        .into_iter()
        .map(|r| PeriodUsage {
            period: r.period,
            used: r.count,
        })
        .collect()
}
