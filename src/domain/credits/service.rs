use crate::domain::auth::AuthContext;
use crate::domain::quota::{PolicyResolver, QuotaLimit, ResourceKind, Subject};
use crate::error::{AppError, AppResult};
use crate::infrastructure::repositories::OrganizationRepository;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Upper bound for a single grant
const MAX_GRANT: i64 = 1_000_000;

/// Request for POST /api/credits/grants
#[derive(Debug, Serialize, Deserialize)]
pub struct CreditGrantRequest {
    pub resource: ResourceKind,
    pub amount: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreditGrantResponse {
    pub resource: ResourceKind,
    pub subject_id: Uuid,
    pub base_limit: QuotaLimit,
    pub bonus: i64,
    /// Base plus bonus, absent when unlimited
    pub limit: Option<i64>,
}

pub struct CreditService {
    org_repo: Arc<OrganizationRepository>,
    policies: Arc<PolicyResolver>,
}

impl CreditService {
    pub fn new(org_repo: Arc<OrganizationRepository>, policies: Arc<PolicyResolver>) -> Self {
        Self { org_repo, policies }
    }
}

#[async_trait]
pub trait CreditServiceApi: Send + Sync {
    /// Add bonus allowance on top of the plan limit
    async fn grant(
        &self,
        ctx: &AuthContext,
        request: CreditGrantRequest,
    ) -> AppResult<CreditGrantResponse>;
}

#[async_trait]
impl CreditServiceApi for CreditService {
    async fn grant(
        &self,
        ctx: &AuthContext,
        request: CreditGrantRequest,
    ) -> AppResult<CreditGrantResponse> {
        if !ctx.role.is_admin() {
            return Err(AppError::Forbidden(
                "Only owners and admins can grant credits".to_string(),
            ));
        }
        if request.amount <= 0 || request.amount > MAX_GRANT {
            return Err(AppError::BadRequest(format!(
                "Amount must be between 1 and {}",
                MAX_GRANT
            )));
        }

        let resource = request.resource;
        let subject = Subject::for_resource(ctx, resource);
        let bonus = self
            .org_repo
            .grant_bonus(subject.id, resource, request.amount)
            .await?;

        self.policies.invalidate(subject.id, resource).await;
        let policy = self.policies.resolve(&subject, resource).await?;

        tracing::info!(
            organization_id = %ctx.organization_id,
            granted_by = %ctx.user_id,
            subject_id = %subject.id,
            resource = %resource,
            amount = request.amount,
            bonus,
            "Credits granted"
        );

        Ok(CreditGrantResponse {
            resource,
            subject_id: subject.id,
            base_limit: policy.base_limit,
            bonus: policy.bonus,
            limit: policy.allowance(),
        })
    }
}
