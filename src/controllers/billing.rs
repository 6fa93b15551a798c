use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    domain::{
        auth::AuthContext,
        billing::{BillingService, BillingServiceApi, CheckoutQuote, CheckoutQuoteRequest},
    },
    error::AppResult,
};

pub struct BillingController {
    billing_service: Arc<BillingService>,
}

impl BillingController {
    pub fn new(billing_service: Arc<BillingService>) -> Self {
        Self { billing_service }
    }

    /// POST /api/billing/checkout-quote - Platform fee and payout for a sale
    pub async fn checkout_quote(
        State(controller): State<Arc<BillingController>>,
        Extension(ctx): Extension<AuthContext>,
        Json(request): Json<CheckoutQuoteRequest>,
    ) -> AppResult<Json<CheckoutQuote>> {
        let quote = controller
            .billing_service
            .checkout_quote(&ctx, request)
            .await?;
        Ok(Json(quote))
    }
}
