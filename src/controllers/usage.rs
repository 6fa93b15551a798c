use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    domain::{
        auth::AuthContext,
        quota::ResourceKind,
        shared::usage_dto::{ResourceUsage, UsageResponse},
        usage::{UsageService, UsageServiceApi},
    },
    error::{AppError, AppResult},
};

pub struct UsageController {
    usage_service: Arc<UsageService>,
}

impl UsageController {
    pub fn new(usage_service: Arc<UsageService>) -> Self {
        Self { usage_service }
    }

    /// GET /api/usage - Usage for every metered resource
    pub async fn get_usage(
        State(controller): State<Arc<UsageController>>,
        Extension(ctx): Extension<AuthContext>,
    ) -> AppResult<Json<UsageResponse>> {
        let usage = controller.usage_service.get_all(&ctx).await?;
        Ok(Json(usage))
    }

    /// GET /api/usage/:resource - Usage and history for one resource
    pub async fn get_resource_usage(
        State(controller): State<Arc<UsageController>>,
        Extension(ctx): Extension<AuthContext>,
        Path(resource): Path<String>,
    ) -> AppResult<Json<ResourceUsage>> {
        let resource: ResourceKind = resource.parse().map_err(AppError::NotFound)?;
        let usage = controller.usage_service.get_one(&ctx, resource).await?;
        Ok(Json(usage))
    }
}
