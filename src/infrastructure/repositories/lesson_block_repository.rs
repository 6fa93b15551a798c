use crate::domain::content::{ContentConfig, LessonBlock};
use crate::error::AppResult;
use crate::infrastructure::db::DbPool;
use sqlx::types::Json;
use std::sync::Arc;
use uuid::Uuid;

pub struct LessonBlockRepository {
    pool: Arc<DbPool>,
}

impl LessonBlockRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Blocks of a lesson in display order
    pub async fn find_by_lesson(
        &self,
        organization_id: Uuid,
        lesson_id: Uuid,
    ) -> AppResult<Vec<LessonBlock>> {
        let pool = self.pool.as_ref();
        let blocks = sqlx::query_as::<_, LessonBlock>(
            r#"
            SELECT id, organization_id, lesson_id, position, config, created_at, updated_at
            FROM lesson_blocks
            WHERE organization_id = $1 AND lesson_id = $2
            ORDER BY position ASC, created_at ASC
            "#,
        )
        .bind(organization_id)
        .bind(lesson_id)
        .fetch_all(pool)
        .await?;

        Ok(blocks)
    }

    /// Create or replace a block. Blocks never move between organizations.
    pub async fn upsert(
        &self,
        id: Uuid,
        organization_id: Uuid,
        lesson_id: Uuid,
        position: i32,
        config: &ContentConfig,
    ) -> AppResult<Option<LessonBlock>> {
        let pool = self.pool.as_ref();
        let now = chrono::Utc::now();

        let block = sqlx::query_as::<_, LessonBlock>(
            r#"
            INSERT INTO lesson_blocks (id, organization_id, lesson_id, position, config, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            ON CONFLICT (id)
            DO UPDATE SET
                lesson_id = EXCLUDED.lesson_id,
                position = EXCLUDED.position,
                config = EXCLUDED.config,
                updated_at = EXCLUDED.updated_at
            WHERE lesson_blocks.organization_id = EXCLUDED.organization_id
            RETURNING id, organization_id, lesson_id, position, config, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .bind(lesson_id)
        .bind(position)
        .bind(Json(config))
        .bind(now)
        .fetch_optional(pool)
        .await?;

        Ok(block)
    }
}
