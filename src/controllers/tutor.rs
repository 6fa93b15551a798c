use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    domain::{
        auth::AuthContext,
        shared::usage_dto::MeteredResponse,
        tutor::{TutorReply, TutorRequest, TutorService, TutorServiceApi},
    },
    error::AppResult,
};

pub struct TutorController {
    tutor_service: Arc<TutorService>,
}

impl TutorController {
    pub fn new(tutor_service: Arc<TutorService>) -> Self {
        Self { tutor_service }
    }

    /// POST /api/tutor/messages - Ask the course tutor
    pub async fn send_message(
        State(controller): State<Arc<TutorController>>,
        Extension(ctx): Extension<AuthContext>,
        Json(request): Json<TutorRequest>,
    ) -> AppResult<Json<MeteredResponse<TutorReply>>> {
        let gated = controller.tutor_service.reply(&ctx, request).await?;
        Ok(Json(gated.into()))
    }
}
