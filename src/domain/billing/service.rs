use crate::domain::auth::AuthContext;
use crate::domain::organization::Plan;
use crate::error::{AppError, AppResult};
use crate::infrastructure::repositories::OrganizationRepository;
use async_trait::async_trait;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Minor units kept for every supported currency
const CURRENCY_SCALE: u32 = 2;

/// Request for POST /api/billing/checkout-quote
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckoutQuoteRequest {
    pub amount: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutQuote {
    pub amount: Decimal,
    pub currency: String,
    pub platform_fee: Decimal,
    pub payout: Decimal,
    pub fee_percent: Decimal,
    pub destination_account: Option<String>,
}

/// Share of each sale the platform keeps, by plan
pub fn platform_fee_percent(plan: Plan) -> Decimal {
    match plan {
        Plan::Free => Decimal::from(10),
        Plan::Pro => Decimal::from(5),
        Plan::Enterprise => Decimal::from(2),
    }
}

fn max_amount() -> Decimal {
    Decimal::from(1_000_000)
}

/// Split `amount` into platform fee and payout for the given plan
fn quote(
    plan: Plan,
    amount: Decimal,
    currency: &str,
    destination_account: Option<String>,
) -> Result<CheckoutQuote, String> {
    if amount <= Decimal::ZERO {
        return Err("Amount must be greater than zero".to_string());
    }
    if amount > max_amount() {
        return Err(format!("Amount cannot exceed {}", max_amount()));
    }
    if amount.scale() > CURRENCY_SCALE && amount.round_dp(CURRENCY_SCALE) != amount {
        return Err("Amount has more than two decimal places".to_string());
    }

    let currency = currency.trim();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(format!("Invalid currency code: {}", currency));
    }

    let fee_percent = platform_fee_percent(plan);
    let platform_fee = (amount * fee_percent / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero);

    Ok(CheckoutQuote {
        amount,
        currency: currency.to_ascii_lowercase(),
        platform_fee,
        payout: amount - platform_fee,
        fee_percent,
        destination_account,
    })
}

pub struct BillingService {
    org_repo: Arc<OrganizationRepository>,
}

impl BillingService {
    pub fn new(org_repo: Arc<OrganizationRepository>) -> Self {
        Self { org_repo }
    }
}

#[async_trait]
pub trait BillingServiceApi: Send + Sync {
    /// Price a course sale for the caller's academy
    async fn checkout_quote(
        &self,
        ctx: &AuthContext,
        request: CheckoutQuoteRequest,
    ) -> AppResult<CheckoutQuote>;
}

#[async_trait]
impl BillingServiceApi for BillingService {
    async fn checkout_quote(
        &self,
        ctx: &AuthContext,
        request: CheckoutQuoteRequest,
    ) -> AppResult<CheckoutQuote> {
        let organization = self
            .org_repo
            .find_by_id(ctx.organization_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Organization not found".to_string()))?;

        if organization.stripe_account_id.is_none() {
            tracing::debug!(
                organization_id = %organization.id,
                "Quoting without a connected payout account"
            );
        }

        quote(
            organization.plan,
            request.amount,
            &request.currency,
            organization.stripe_account_id,
        )
        .map_err(AppError::BadRequest)
    }
}
