use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::auth::AuthContext;

/// Metered capability a quota is tracked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text")]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    AiCredits,
    EmailCredits,
    TutorMessages,
    StudentSeats,
}

/// Who a resource is counted against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectScope {
    Organization,
    User,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::AiCredits,
        ResourceKind::EmailCredits,
        ResourceKind::TutorMessages,
        ResourceKind::StudentSeats,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::AiCredits => "ai_credits",
            ResourceKind::EmailCredits => "email_credits",
            ResourceKind::TutorMessages => "tutor_messages",
            ResourceKind::StudentSeats => "student_seats",
        }
    }

    /// Seats are a standing allowance, everything else accumulates per calendar month.
    pub fn is_periodic(&self) -> bool {
        !matches!(self, ResourceKind::StudentSeats)
    }

    pub fn scope(&self) -> SubjectScope {
        match self {
            ResourceKind::TutorMessages => SubjectScope::User,
            _ => SubjectScope::Organization,
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown resource kind: {}", s))
    }
}

/// Window a counter accumulates over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Month { year: i32, month: u32 },
    Lifetime,
}

const LIFETIME_TOKEN: &str = "lifetime";

impl Period {
    pub fn current(resource: ResourceKind, now: DateTime<Utc>) -> Self {
        if resource.is_periodic() {
            Period::Month {
                year: now.year(),
                month: now.month(),
            }
        } else {
            Period::Lifetime
        }
    }

    /// Storage token: `YYYY-MM` for months, `lifetime` otherwise
    pub fn token(&self) -> String {
        match self {
            Period::Month { year, month } => format!("{:04}-{:02}", year, month),
            Period::Lifetime => LIFETIME_TOKEN.to_string(),
        }
    }

    /// First instant of the next period, `None` when the counter never rolls over
    pub fn resets_at(&self) -> Option<DateTime<Utc>> {
        match *self {
            Period::Month { year, month } => {
                let (year, month) = if month == 12 {
                    (year + 1, 1)
                } else {
                    (year, month + 1)
                };
                NaiveDate::from_ymd_opt(year, month, 1)
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
                    .map(|naive| naive.and_utc())
            }
            Period::Lifetime => None,
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.token())
    }
}

/// The organization or user a quota is tracked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subject {
    pub id: Uuid,
    pub organization_id: Uuid,
}

impl Subject {
    pub fn for_resource(ctx: &AuthContext, resource: ResourceKind) -> Self {
        let id = match resource.scope() {
            SubjectScope::Organization => ctx.organization_id,
            SubjectScope::User => ctx.user_id,
        };
        Self {
            id,
            organization_id: ctx.organization_id,
        }
    }
}

/// Identity of a single usage counter row
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CounterKey {
    pub subject_id: Uuid,
    pub resource: ResourceKind,
    pub period: Period,
}

impl CounterKey {
    pub fn new(subject: &Subject, resource: ResourceKind, period: Period) -> Self {
        Self {
            subject_id: subject.id,
            resource,
            period,
        }
    }
}

/// Base allowance for a resource. Unlimited is explicit, never a magic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum QuotaLimit {
    Unlimited,
    Limited(i64),
}

impl From<Option<i64>> for QuotaLimit {
    fn from(value: Option<i64>) -> Self {
        match value {
            Some(limit) => QuotaLimit::Limited(limit),
            None => QuotaLimit::Unlimited,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaPolicy {
    pub base_limit: QuotaLimit,
    pub bonus: i64,
}

impl QuotaPolicy {
    pub fn limited(base: i64, bonus: i64) -> Self {
        Self {
            base_limit: QuotaLimit::Limited(base),
            bonus,
        }
    }

    pub fn unlimited() -> Self {
        Self {
            base_limit: QuotaLimit::Unlimited,
            bonus: 0,
        }
    }

    /// Base plus bonus, `None` when unlimited
    pub fn allowance(&self) -> Option<i64> {
        match self.base_limit {
            QuotaLimit::Unlimited => None,
            QuotaLimit::Limited(base) => Some(base.max(0).saturating_add(self.bonus.max(0))),
        }
    }
}
