use serde::Serialize;

use super::model::QuotaLimit;

/// Usage percentage at which callers should warn
pub const NEAR_LIMIT_PERCENT: u8 = 80;

/// Derived quota state. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotaStatus {
    /// Raw usage, may exceed the allowance
    pub used: i64,
    /// Base plus bonus, `None` when unlimited
    pub limit: Option<i64>,
    pub remaining: Option<i64>,
    /// Display percentage, clamped to 0..=100
    pub percentage: u8,
    pub is_near_limit: bool,
    pub is_at_limit: bool,
}

impl QuotaStatus {
    pub fn is_unlimited(&self) -> bool {
        self.limit.is_none()
    }
}

/// Compute the quota status for `used` units against `limit + bonus`.
///
/// Negative inputs are treated as zero. A finite allowance of zero is at limit.
pub fn evaluate(used: i64, limit: QuotaLimit, bonus: i64) -> QuotaStatus {
    let used = used.max(0);
    let bonus = bonus.max(0);

    let base = match limit {
        QuotaLimit::Unlimited => {
            return QuotaStatus {
                used,
                limit: None,
                remaining: None,
                percentage: 0,
                is_near_limit: false,
                is_at_limit: false,
            }
        }
        QuotaLimit::Limited(base) => base.max(0),
    };

    let total = base.saturating_add(bonus);
    if total == 0 {
        return QuotaStatus {
            used,
            limit: Some(0),
            remaining: Some(0),
            percentage: 100,
            is_near_limit: true,
            is_at_limit: true,
        };
    }

    let percentage = rounded_percentage(used, total);

    QuotaStatus {
        used,
        limit: Some(total),
        remaining: Some(total.saturating_sub(used).max(0)),
        percentage,
        is_near_limit: percentage >= NEAR_LIMIT_PERCENT,
        is_at_limit: used >= total,
    }
}

/// Half-up rounding on integers, so 799/1000 reports 80.
fn rounded_percentage(used: i64, total: i64) -> u8 {
    let used = used as i128;
    let total = total as i128;
    let percent = (used * 100 + total / 2) / total;
    percent.clamp(0, 100) as u8
}
