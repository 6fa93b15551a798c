use crate::domain::quota::{CounterKey, Period, QuotaLimit, QuotaPolicy, ResourceKind, Subject};
use crate::error::AppResult;
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::sync::Arc;
use uuid::Uuid;

use super::UsageCounterRepository;

#[derive(Debug, FromRow)]
pub struct UsageRecord {
    pub subject_id: Uuid,
    pub resource: ResourceKind,
    pub period: String,
    pub count: i64,
    pub updated_at: DateTime<Utc>,
}

/// Usage joined with the policy that applies to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageSnapshot {
    pub used: i64,
    pub policy: QuotaPolicy,
}

#[derive(Debug, FromRow)]
struct SnapshotRow {
    used: i64,
    base_limit: Option<i64>,
    bonus: i64,
}

pub struct UsageRepository {
    pool: Arc<DbPool>,
}

impl UsageRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Display read: count and policy in one round trip. `None` if the policy is unknown.
    pub async fn get_usage(
        &self,
        subject: &Subject,
        resource: ResourceKind,
        period: Period,
    ) -> AppResult<Option<UsageSnapshot>> {
        let pool = self.pool.as_ref();

        let row = sqlx::query_as::<_, SnapshotRow>(
            r#"
            SELECT COALESCE(uc.count, 0)::BIGINT AS used,
                   pl.base_limit,
                   COALESCE(g.bonus, 0)::BIGINT AS bonus
            FROM organizations o
            JOIN plan_limits pl
              ON pl.plan = o.plan AND pl.resource = $3
            LEFT JOIN quota_grants g
              ON g.subject_id = $1 AND g.resource = $3
            LEFT JOIN usage_counters uc
              ON uc.subject_id = $1 AND uc.resource = $3 AND uc.period = $4
            WHERE o.id = $2
            "#,
        )
        .bind(subject.id)
        .bind(subject.organization_id)
        .bind(resource)
        .bind(period.token())
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|r| UsageSnapshot {
            used: r.used,
            policy: QuotaPolicy {
                base_limit: QuotaLimit::from(r.base_limit),
                bonus: r.bonus,
            },
        }))
    }

    /// Most recent periods for a subject and resource
    pub async fn get_usage_history(
        &self,
        subject_id: Uuid,
        resource: ResourceKind,
        limit: i64,
    ) -> AppResult<Vec<UsageRecord>> {
        let pool = self.pool.as_ref();
        let records = sqlx::query_as::<_, UsageRecord>(
            r#"
            SELECT subject_id, resource, period, count, updated_at
            FROM usage_counters
            WHERE subject_id = $1 AND resource = $2
            ORDER BY period DESC
            LIMIT $3
            "#,
        )
        .bind(subject_id)
        .bind(resource)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }
}

#[async_trait]
impl UsageCounterRepository for UsageRepository {
    async fn read_count(&self, key: &CounterKey) -> AppResult<i64> {
        let pool = self.pool.as_ref();
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT count
            FROM usage_counters
            WHERE subject_id = $1 AND resource = $2 AND period = $3
            "#,
        )
        .bind(key.subject_id)
        .bind(key.resource)
        .bind(key.period.token())
        .fetch_optional(pool)
        .await?;

        Ok(count.unwrap_or(0))
    }

    async fn increment_and_read(&self, key: &CounterKey, amount: i64) -> AppResult<i64> {
        let pool = self.pool.as_ref();

        // Single upsert: Postgres serializes concurrent adds on the row lock.
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO usage_counters (subject_id, resource, period, count, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            ON CONFLICT (subject_id, resource, period)
            DO UPDATE SET
                count = usage_counters.count + EXCLUDED.count,
                updated_at = NOW()
            RETURNING count
            "#,
        )
        .bind(key.subject_id)
        .bind(key.resource)
        .bind(key.period.token())
        .bind(amount)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}
