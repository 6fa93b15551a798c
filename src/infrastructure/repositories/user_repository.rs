use crate::domain::auth::Role;
use crate::domain::user::{Enrollment, User};
use crate::error::{AppError, AppResult};
use crate::infrastructure::db::DbPool;
use std::sync::Arc;
use uuid::Uuid;

pub struct UserRepository {
    pool: Arc<DbPool>,
}

impl UserRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Find user by ID
    pub async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let pool = self.pool.as_ref();
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let pool = self.pool.as_ref();
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Enrollment rows are the durable record of seats in use
    pub async fn count_enrollments(&self, organization_id: Uuid) -> AppResult<i64> {
        let pool = self.pool.as_ref();
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM enrollments WHERE organization_id = $1")
                .bind(organization_id)
                .fetch_one(pool)
                .await?;

        Ok(count.0)
    }

    /// Create the student's user record and membership row atomically
    pub async fn create_student(
        &self,
        organization_id: Uuid,
        email: &str,
        full_name: Option<&str>,
    ) -> AppResult<(User, Enrollment)> {
        let pool = self.pool.as_ref();
        let now = chrono::Utc::now();
        let mut tx = pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, organization_id, email, full_name, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(organization_id)
        .bind(email)
        .bind(full_name)
        .bind(Role::Student)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => {
                AppError::Conflict(format!("User {} already exists", email))
            }
            _ => AppError::Database(e),
        })?;

        let enrollment = sqlx::query_as::<_, Enrollment>(
            r#"
            INSERT INTO enrollments (id, organization_id, user_id, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(organization_id)
        .bind(user.id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((user, enrollment))
    }
}
