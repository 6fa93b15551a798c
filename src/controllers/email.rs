use axum::{extract::State, http::StatusCode, Extension, Json};
use std::sync::Arc;

use crate::{
    domain::{
        auth::AuthContext,
        email::{EmailService, EmailServiceApi, SendEmailRequest, SentEmail},
        shared::usage_dto::MeteredResponse,
    },
    error::AppResult,
};

pub struct EmailController {
    email_service: Arc<EmailService>,
}

impl EmailController {
    pub fn new(email_service: Arc<EmailService>) -> Self {
        Self { email_service }
    }

    /// POST /api/emails - Send an email to students
    pub async fn send(
        State(controller): State<Arc<EmailController>>,
        Extension(ctx): Extension<AuthContext>,
        Json(request): Json<SendEmailRequest>,
    ) -> AppResult<(StatusCode, Json<MeteredResponse<SentEmail>>)> {
        let gated = controller.email_service.send(&ctx, request).await?;
        Ok((StatusCode::ACCEPTED, Json(gated.into())))
    }
}
