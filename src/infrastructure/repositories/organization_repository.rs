use crate::domain::organization::Organization;
use crate::domain::quota::{QuotaLimit, QuotaPolicy, ResourceKind, Subject};
use crate::error::AppResult;
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use sqlx::FromRow;
use std::sync::Arc;
use uuid::Uuid;

use super::PolicyRepository;

#[derive(Debug, FromRow)]
struct PolicyRow {
    base_limit: Option<i64>,
    bonus: i64,
}

pub struct OrganizationRepository {
    pool: Arc<DbPool>,
}

impl OrganizationRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, organization_id: Uuid) -> AppResult<Option<Organization>> {
        let pool = self.pool.as_ref();
        let organization =
            sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE id = $1")
                .bind(organization_id)
                .fetch_optional(pool)
                .await?;

        Ok(organization)
    }

    /// Add `amount` to the subject's bonus and return the new bonus
    pub async fn grant_bonus(
        &self,
        subject_id: Uuid,
        resource: ResourceKind,
        amount: i64,
    ) -> AppResult<i64> {
        let pool = self.pool.as_ref();
        let bonus = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO quota_grants (subject_id, resource, bonus, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            ON CONFLICT (subject_id, resource)
            DO UPDATE SET
                bonus = quota_grants.bonus + EXCLUDED.bonus,
                updated_at = NOW()
            RETURNING bonus
            "#,
        )
        .bind(subject_id)
        .bind(resource)
        .bind(amount)
        .fetch_one(pool)
        .await?;

        Ok(bonus)
    }
}

#[async_trait]
impl PolicyRepository for OrganizationRepository {
    async fn find_policy(
        &self,
        subject: &Subject,
        resource: ResourceKind,
    ) -> AppResult<Option<QuotaPolicy>> {
        let pool = self.pool.as_ref();
        let row = sqlx::query_as::<_, PolicyRow>(
            r#"
            SELECT pl.base_limit,
                   COALESCE(g.bonus, 0)::BIGINT AS bonus
            FROM organizations o
            JOIN plan_limits pl
              ON pl.plan = o.plan AND pl.resource = $3
            LEFT JOIN quota_grants g
              ON g.subject_id = $1 AND g.resource = $3
            WHERE o.id = $2
            "#,
        )
        .bind(subject.id)
        .bind(subject.organization_id)
        .bind(resource)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|r| QuotaPolicy {
            base_limit: QuotaLimit::from(r.base_limit),
            bonus: r.bonus,
        }))
    }
}
