use academy_backend::domain::auth::Role;
use academy_backend::domain::organization::{Organization, Plan};
use academy_backend::domain::quota::{Period, ResourceKind};
use academy_backend::domain::user::User;
use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

pub struct TestFixtures {
    pool: PgPool,
}

#[allow(dead_code)]
impl TestFixtures {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_organization(&self, plan: Plan) -> Result<Organization> {
        let organization = sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (id, name, plan, stripe_account_id, created_at, updated_at)
            VALUES ($1, $2, $3, NULL, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(format!("Academy {}", plan))
        .bind(plan)
        .fetch_one(&self.pool)
        .await?;

        Ok(organization)
    }

    pub async fn connect_payout_account(&self, organization_id: Uuid, account: &str) -> Result<()> {
        sqlx::query("UPDATE organizations SET stripe_account_id = $2 WHERE id = $1")
            .bind(organization_id)
            .bind(account)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn create_member(&self, organization_id: Uuid, email: &str, role: Role) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, organization_id, email, full_name, role, created_at, updated_at)
            VALUES ($1, $2, $3, NULL, $4, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(organization_id)
        .bind(email)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Set the current-period counter for a subject
    pub async fn set_usage(&self, subject_id: Uuid, resource: ResourceKind, count: i64) -> Result<()> {
        let period = Period::current(resource, Utc::now());
        sqlx::query(
            r#"
            INSERT INTO usage_counters (subject_id, resource, period, count, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            ON CONFLICT (subject_id, resource, period)
            DO UPDATE SET count = EXCLUDED.count, updated_at = NOW()
            "#,
        )
        .bind(subject_id)
        .bind(resource)
        .bind(period.token())
        .bind(count)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Counter for an arbitrary period token, for history
    pub async fn set_usage_for_period(
        &self,
        subject_id: Uuid,
        resource: ResourceKind,
        period: &str,
        count: i64,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO usage_counters (subject_id, resource, period, count, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            "#,
        )
        .bind(subject_id)
        .bind(resource)
        .bind(period)
        .bind(count)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_usage(&self, subject_id: Uuid, resource: ResourceKind) -> Result<i64> {
        let period = Period::current(resource, Utc::now());
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT count FROM usage_counters WHERE subject_id = $1 AND resource = $2 AND period = $3",
        )
        .bind(subject_id)
        .bind(resource)
        .bind(period.token())
        .fetch_optional(&self.pool)
        .await?;

        Ok(count.unwrap_or(0))
    }

    pub async fn count_users(&self, organization_id: Uuid) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE organization_id = $1")
            .bind(organization_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    pub async fn count_enrollments(&self, organization_id: Uuid) -> Result<i64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM enrollments WHERE organization_id = $1")
                .bind(organization_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count.0)
    }
}
