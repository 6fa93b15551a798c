use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::quota::{Gated, QuotaStatus, ResourceKind};

/// Success payload of a gated action, with the quota state after charging
#[derive(Debug, Serialize)]
pub struct MeteredResponse<T> {
    #[serde(flatten)]
    pub result: T,
    pub charged: i64,
    pub near_limit: bool,
    pub quota: QuotaStatus,
}

impl<T> From<Gated<T>> for MeteredResponse<T> {
    fn from(gated: Gated<T>) -> Self {
        Self {
            near_limit: gated.near_limit(),
            charged: gated.charged,
            quota: gated.status,
            result: gated.value,
        }
    }
}

/// Response for GET /api/usage
#[derive(Debug, Serialize)]
pub struct UsageResponse {
    pub resources: Vec<ResourceUsage>,
}

#[derive(Debug, Serialize)]
pub struct ResourceUsage {
    pub resource: ResourceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resets_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonus: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<QuotaStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<PeriodUsage>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PeriodUsage {
    pub period: String,
    pub used: i64,
}

/// Response for GET /api/students/capacity
#[derive(Debug, Serialize, Deserialize)]
pub struct StudentCapacity {
    pub current_count: i64,
    pub max_allowed: Option<i64>,
    pub can_add: bool,
}
