use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    domain::{
        ai::{
            AiService, AiServiceApi, GenerateImageRequest, GenerateQuizRequest,
            GenerateTextRequest, GeneratedImage, GeneratedQuiz, GeneratedText,
        },
        auth::AuthContext,
        shared::usage_dto::MeteredResponse,
    },
    error::AppResult,
};

pub struct AiController {
    ai_service: Arc<AiService>,
}

impl AiController {
    pub fn new(ai_service: Arc<AiService>) -> Self {
        Self { ai_service }
    }

    /// POST /api/ai/text - Generate course text
    pub async fn generate_text(
        State(controller): State<Arc<AiController>>,
        Extension(ctx): Extension<AuthContext>,
        Json(request): Json<GenerateTextRequest>,
    ) -> AppResult<Json<MeteredResponse<GeneratedText>>> {
        let gated = controller.ai_service.generate_text(&ctx, request).await?;
        Ok(Json(gated.into()))
    }

    /// POST /api/ai/image - Generate an image
    pub async fn generate_image(
        State(controller): State<Arc<AiController>>,
        Extension(ctx): Extension<AuthContext>,
        Json(request): Json<GenerateImageRequest>,
    ) -> AppResult<Json<MeteredResponse<GeneratedImage>>> {
        let gated = controller.ai_service.generate_image(&ctx, request).await?;
        Ok(Json(gated.into()))
    }

    /// POST /api/ai/quiz - Generate a quiz block
    pub async fn generate_quiz(
        State(controller): State<Arc<AiController>>,
        Extension(ctx): Extension<AuthContext>,
        Json(request): Json<GenerateQuizRequest>,
    ) -> AppResult<Json<MeteredResponse<GeneratedQuiz>>> {
        let gated = controller.ai_service.generate_quiz(&ctx, request).await?;
        Ok(Json(gated.into()))
    }
}
