use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        auth::AuthContext,
        content::{ContentService, ContentServiceApi, LessonBlockResponse, UpsertBlockRequest},
    },
    error::AppResult,
};

pub struct LessonController {
    content_service: Arc<ContentService>,
}

impl LessonController {
    pub fn new(content_service: Arc<ContentService>) -> Self {
        Self { content_service }
    }

    /// GET /api/lessons/:lesson_id/blocks - Blocks ordered by position
    pub async fn list_blocks(
        State(controller): State<Arc<LessonController>>,
        Extension(ctx): Extension<AuthContext>,
        Path(lesson_id): Path<Uuid>,
    ) -> AppResult<Json<Vec<LessonBlockResponse>>> {
        let blocks = controller
            .content_service
            .list_blocks(&ctx, lesson_id)
            .await?;
        Ok(Json(blocks))
    }

    /// PUT /api/lessons/:lesson_id/blocks - Create or replace a block
    pub async fn upsert_block(
        State(controller): State<Arc<LessonController>>,
        Extension(ctx): Extension<AuthContext>,
        Path(lesson_id): Path<Uuid>,
        Json(request): Json<UpsertBlockRequest>,
    ) -> AppResult<Json<LessonBlockResponse>> {
        let block = controller
            .content_service
            .upsert_block(&ctx, lesson_id, request)
            .await?;
        Ok(Json(block))
    }
}
