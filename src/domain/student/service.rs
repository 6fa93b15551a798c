use super::error::StudentServiceError;
use crate::domain::auth::AuthContext;
use crate::domain::quota::{evaluate, Gated, Metered, Period, QuotaGate, QuotaError, ResourceKind, Subject};
use crate::domain::shared::usage_dto::StudentCapacity;
use crate::domain::shared::validation::is_valid_email;
use crate::domain::user::{Enrollment, User};
use crate::error::AppError;
use crate::infrastructure::repositories::{UsageRepository, UserRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

const MAX_NAME_CHARS: usize = 120;

/// Request for POST /api/students
#[derive(Debug, Serialize, Deserialize)]
pub struct AddStudentRequest {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrolledStudent {
    pub user_id: Uuid,
    pub enrollment_id: Uuid,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub enrolled_at: DateTime<Utc>,
}

impl From<(User, Enrollment)> for EnrolledStudent {
    fn from((user, enrollment): (User, Enrollment)) -> Self {
        Self {
            user_id: user.id,
            enrollment_id: enrollment.id,
            email: user.email,
            full_name: user.full_name,
            enrolled_at: enrollment.created_at,
        }
    }
}

/// One seat per enrolled student
impl Metered for EnrolledStudent {}

pub struct StudentService {
    gate: Arc<QuotaGate>,
    user_repo: Arc<UserRepository>,
    usage_repo: Arc<UsageRepository>,
}

impl StudentService {
    pub fn new(
        gate: Arc<QuotaGate>,
        user_repo: Arc<UserRepository>,
        usage_repo: Arc<UsageRepository>,
    ) -> Self {
        Self {
            gate,
            user_repo,
            usage_repo,
        }
    }
}

#[async_trait]
pub trait StudentServiceApi: Send + Sync {
    /// Enroll a student, consuming one seat. Nothing is written when no seat is left.
    async fn add_student(
        &self,
        ctx: &AuthContext,
        request: AddStudentRequest,
    ) -> Result<Gated<EnrolledStudent>, StudentServiceError>;

    async fn capacity(&self, ctx: &AuthContext) -> Result<StudentCapacity, StudentServiceError>;
}

#[async_trait]
impl StudentServiceApi for StudentService {
    async fn add_student(
        &self,
        ctx: &AuthContext,
        request: AddStudentRequest,
    ) -> Result<Gated<EnrolledStudent>, StudentServiceError> {
        if !ctx.role.is_staff() {
            return Err(StudentServiceError::Forbidden(
                "Only academy staff can enroll students".to_string(),
            ));
        }

        let email = normalize_email(&request.email)?;
        let full_name = normalize_name(request.full_name.as_deref())?;

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(StudentServiceError::AlreadyExists(format!(
                "User {} already exists",
                email
            )));
        }

        let subject = Subject::for_resource(ctx, ResourceKind::StudentSeats);
        let organization_id = ctx.organization_id;
        let user_repo = self.user_repo.clone();
        let gated = self
            .gate
            .run(&subject, ResourceKind::StudentSeats, || async move {
                let created = user_repo
                    .create_student(organization_id, &email, full_name.as_deref())
                    .await?;
                Ok::<_, AppError>(EnrolledStudent::from(created))
            })
            .await?;

        if gated.charged == 0 {
            tracing::error!(
                organization_id = %ctx.organization_id,
                enrollment_id = %gated.value.enrollment_id,
                "Student enrolled without a seat charge, counter behind enrollments"
            );
        }

        tracing::info!(
            organization_id = %ctx.organization_id,
            user_id = %gated.value.user_id,
            seats_used = gated.status.used,
            "Student enrolled"
        );

        Ok(gated)
    }

    async fn capacity(&self, ctx: &AuthContext) -> Result<StudentCapacity, StudentServiceError> {
        if !ctx.role.is_staff() {
            return Err(StudentServiceError::Forbidden(
                "Only academy staff can view seat capacity".to_string(),
            ));
        }

        let resource = ResourceKind::StudentSeats;
        let subject = Subject::for_resource(ctx, resource);
        let snapshot = self
            .usage_repo
            .get_usage(&subject, resource, Period::current(resource, Utc::now()))
            .await?
            .ok_or(QuotaError::PolicyUnknown(resource))?;

        let enrolled = self.user_repo.count_enrollments(ctx.organization_id).await?;
        let status = evaluate(
            seats_in_use(snapshot.used, enrolled),
            snapshot.policy.base_limit,
            snapshot.policy.bonus,
        );

        Ok(StudentCapacity {
            current_count: status.used,
            max_allowed: status.limit,
            can_add: !status.is_at_limit,
        })
    }
}

/// A lost counter write leaves the counter behind the enrollment rows
fn seats_in_use(counted: i64, enrolled: i64) -> i64 {
    counted.max(enrolled)
}

fn normalize_email(email: &str) -> Result<String, StudentServiceError> {
    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(StudentServiceError::Invalid(format!(
            "Invalid email address: {}",
            email
        )));
    }
    Ok(email)
}

fn normalize_name(name: Option<&str>) -> Result<Option<String>, StudentServiceError> {
    let name = name.map(str::trim).filter(|n| !n.is_empty());
    if let Some(name) = name {
        if name.chars().count() > MAX_NAME_CHARS {
            return Err(StudentServiceError::Invalid(format!(
                "Name must be {} characters or less",
                MAX_NAME_CHARS
            )));
        }
    }
    Ok(name.map(str::to_string))
}
