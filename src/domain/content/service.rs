use super::error::ContentServiceError;
use super::model::{ContentConfig, LessonBlock};
use crate::domain::auth::AuthContext;
use crate::infrastructure::repositories::LessonBlockRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Request for PUT /api/lessons/:lesson_id/blocks
#[derive(Debug, Serialize, Deserialize)]
pub struct UpsertBlockRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub position: i32,
    pub config: ContentConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LessonBlockResponse {
    pub id: Uuid,
    pub lesson_id: Uuid,
    pub position: i32,
    pub config: ContentConfig,
    pub updated_at: DateTime<Utc>,
}

impl From<LessonBlock> for LessonBlockResponse {
    fn from(block: LessonBlock) -> Self {
        Self {
            id: block.id,
            lesson_id: block.lesson_id,
            position: block.position,
            config: block.config.0,
            updated_at: block.updated_at,
        }
    }
}

pub struct ContentService {
    block_repo: Arc<LessonBlockRepository>,
}

impl ContentService {
    pub fn new(block_repo: Arc<LessonBlockRepository>) -> Self {
        Self { block_repo }
    }
}

#[async_trait]
pub trait ContentServiceApi: Send + Sync {
    async fn list_blocks(
        &self,
        ctx: &AuthContext,
        lesson_id: Uuid,
    ) -> Result<Vec<LessonBlockResponse>, ContentServiceError>;

    /// Validate and store a block. Payloads are checked here, on write.
    async fn upsert_block(
        &self,
        ctx: &AuthContext,
        lesson_id: Uuid,
        request: UpsertBlockRequest,
    ) -> Result<LessonBlockResponse, ContentServiceError>;
}

#[async_trait]
impl ContentServiceApi for ContentService {
    async fn list_blocks(
        &self,
        ctx: &AuthContext,
        lesson_id: Uuid,
    ) -> Result<Vec<LessonBlockResponse>, ContentServiceError> {
        let blocks = self
            .block_repo
            .find_by_lesson(ctx.organization_id, lesson_id)
            .await
            .map_err(|e| ContentServiceError::Dependency(e.to_string()))?;

        Ok(blocks.into_iter().map(LessonBlockResponse::from).collect())
    }

    async fn upsert_block(
        &self,
        ctx: &AuthContext,
        lesson_id: Uuid,
        request: UpsertBlockRequest,
    ) -> Result<LessonBlockResponse, ContentServiceError> {
        if !ctx.role.is_staff() {
            return Err(ContentServiceError::Forbidden(
                "Only academy staff can edit lessons".to_string(),
            ));
        }
        if request.position < 0 {
            return Err(ContentServiceError::Invalid(
                "Position cannot be negative".to_string(),
            ));
        }
        request
            .config
            .validate()
            .map_err(ContentServiceError::Invalid)?;

        let id = request.id.unwrap_or_else(Uuid::new_v4);
        let block = self
            .block_repo
            .upsert(id, ctx.organization_id, lesson_id, request.position, &request.config)
            .await
            .map_err(|e| ContentServiceError::Dependency(e.to_string()))?
            .ok_or_else(|| {
                ContentServiceError::Forbidden("Block belongs to another academy".to_string())
            })?;

        tracing::info!(
            organization_id = %ctx.organization_id,
            lesson_id = %lesson_id,
            block_id = %block.id,
            "Lesson block saved"
        );

        Ok(block.into())
    }
}
