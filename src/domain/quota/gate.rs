use chrono::Utc;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::error::{GateError, QuotaError};
use super::evaluator::{evaluate, QuotaStatus};
use super::model::{CounterKey, Period, QuotaPolicy, ResourceKind, Subject};
use super::policy::PolicyResolver;
use crate::infrastructure::repositories::UsageCounterRepository;

/// Cost declared by the result of a gated operation
pub trait Metered {
    /// Units charged once the operation has succeeded
    fn units(&self) -> i64 {
        1
    }
}

/// Result of a gated operation together with the post-charge quota status
#[derive(Debug, Clone, Serialize)]
pub struct Gated<T> {
    pub value: T,
    pub charged: i64,
    pub status: QuotaStatus,
}

impl<T> Gated<T> {
    pub fn near_limit(&self) -> bool {
        self.status.is_near_limit
    }
}

/// A request that passed the pre-check
#[derive(Debug, Clone)]
pub struct Admission {
    pub key: CounterKey,
    pub policy: QuotaPolicy,
    pub status: QuotaStatus,
}

/// Check, act, then charge on success.
///
/// The pre-check and the charge are not linearized across requests, so concurrent
/// callers can overshoot the allowance by at most the number in flight. The charge
/// itself relies on the counter store's atomic increment.
pub struct QuotaGate {
    policies: Arc<PolicyResolver>,
    counters: Arc<dyn UsageCounterRepository>,
    upstream_timeout: Option<Duration>,
}

impl QuotaGate {
    pub fn new(policies: Arc<PolicyResolver>, counters: Arc<dyn UsageCounterRepository>) -> Self {
        Self {
            policies,
            counters,
            upstream_timeout: None,
        }
    }

    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = Some(timeout);
        self
    }

    /// Resolve the policy, read the current count and refuse unless `cost` more
    /// units still fit in the allowance
    pub async fn admit(
        &self,
        subject: &Subject,
        resource: ResourceKind,
        cost: i64,
    ) -> Result<Admission, QuotaError> {
        let policy = self.policies.resolve(subject, resource).await?;
        let key = CounterKey::new(subject, resource, Period::current(resource, Utc::now()));

        let used = self
            .counters
            .read_count(&key)
            .await
            .map_err(|e| QuotaError::CounterUnavailable {
                resource,
                reason: e.to_string(),
            })?;

        let status = evaluate(used, policy.base_limit, policy.bonus);
        let cost = cost.max(1);
        let exceeds = status
            .limit
            .is_some_and(|limit| status.used.saturating_add(cost) > limit);
        if status.is_at_limit || exceeds {
            let limit = status.limit.unwrap_or(0);
            tracing::warn!(
                subject_id = %subject.id,
                resource = %resource,
                period = %key.period,
                used = status.used,
                limit,
                cost,
                "Quota limit reached, operation refused"
            );
            return Err(QuotaError::LimitReached {
                resource,
                used: status.used,
                limit,
            });
        }

        Ok(Admission {
            key,
            policy,
            status,
        })
    }

    /// Run `operation` only if the subject is below its allowance, charging its
    /// declared units afterwards. Failed, timed out or dropped operations are not charged.
    pub async fn run<T, E, F, Fut>(
        &self,
        subject: &Subject,
        resource: ResourceKind,
        operation: F,
    ) -> Result<Gated<T>, GateError<E>>
    where
        T: Metered,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.run_with_cost(subject, resource, 1, operation).await
    }

    /// Like [`QuotaGate::run`] for operations whose cost is known before they
    /// start. The whole cost must fit in the remaining allowance.
    pub async fn run_with_cost<T, E, F, Fut>(
        &self,
        subject: &Subject,
        resource: ResourceKind,
        cost: i64,
        operation: F,
    ) -> Result<Gated<T>, GateError<E>>
    where
        T: Metered,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let admission = self.admit(subject, resource, cost).await?;

        let outcome = match self.upstream_timeout {
            Some(after) => tokio::time::timeout(after, operation())
                .await
                .map_err(|_| {
                    tracing::warn!(
                        subject_id = %subject.id,
                        resource = %resource,
                        timeout_ms = after.as_millis() as u64,
                        "Gated operation timed out, not charged"
                    );
                    GateError::TimedOut { resource, after }
                })?,
            None => operation().await,
        };

        let value = outcome.map_err(GateError::Upstream)?;
        let (charged, status) = self.charge(&admission, value.units()).await;

        Ok(Gated {
            value,
            charged,
            status,
        })
    }

    async fn charge(&self, admission: &Admission, units: i64) -> (i64, QuotaStatus) {
        let Admission {
            key,
            policy,
            status,
        } = admission;

        if units <= 0 {
            return (0, *status);
        }

        match self.counters.increment_and_read(key, units).await {
            Ok(used) => {
                let status = evaluate(used, policy.base_limit, policy.bonus);
                tracing::debug!(
                    subject_id = %key.subject_id,
                    resource = %key.resource,
                    period = %key.period,
                    units,
                    used,
                    "Usage charged"
                );
                (units, status)
            }
            Err(e) => {
                let err = QuotaError::CounterWriteFailed {
                    resource: key.resource,
                    reason: e.to_string(),
                };
                tracing::error!(
                    subject_id = %key.subject_id,
                    resource = %key.resource,
                    period = %key.period,
                    units,
                    error = %err,
                    "Usage not recorded, needs reconciliation"
                );
                let estimated = status.used.saturating_add(units);
                (0, evaluate(estimated, policy.base_limit, policy.bonus))
            }
        }
    }
}
