use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    domain::{
        auth::AuthContext,
        credits::{CreditGrantRequest, CreditGrantResponse, CreditService, CreditServiceApi},
    },
    error::AppResult,
};

pub struct CreditController {
    credit_service: Arc<CreditService>,
}

impl CreditController {
    pub fn new(credit_service: Arc<CreditService>) -> Self {
        Self { credit_service }
    }

    /// POST /api/credits/grants - Add bonus allowance
    pub async fn grant(
        State(controller): State<Arc<CreditController>>,
        Extension(ctx): Extension<AuthContext>,
        Json(request): Json<CreditGrantRequest>,
    ) -> AppResult<Json<CreditGrantResponse>> {
        let granted = controller.credit_service.grant(&ctx, request).await?;
        Ok(Json(granted))
    }
}
