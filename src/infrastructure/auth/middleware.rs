use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::infrastructure::config::Config;
use crate::{
    domain::auth::{AuthContext, JwtManager},
    error::AppError,
    infrastructure::repositories::UserRepository,
};

/// Resolve the caller from the bearer token and insert an `AuthContext` into the request
pub async fn auth_middleware(
    State((user_repo, config)): State<(Arc<UserRepository>, Arc<Config>)>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization format".to_string()))?;

    let jwt_manager = JwtManager::new(config.jwt_secret.clone());
    let claims = jwt_manager.validate_token(token)?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid user ID in token".to_string()))?;
    let organization_id = Uuid::parse_str(&claims.org)
        .map_err(|_| AppError::Unauthorized("Invalid organization ID in token".to_string()))?;

    // Role and membership come from the database, not the token
    let user = user_repo
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    if user.organization_id != organization_id {
        tracing::warn!(
            user_id = %user.id,
            token_organization_id = %organization_id,
            "Token organization does not match user"
        );
        return Err(AppError::Unauthorized(
            "Token does not belong to this organization".to_string(),
        ));
    }

    request.extensions_mut().insert(AuthContext {
        user_id: user.id,
        organization_id: user.organization_id,
        role: user.role,
        email: user.email,
    });

    Ok(next.run(request).await)
}
