pub mod service;

pub use service::{platform_fee_percent, BillingService, BillingServiceApi, CheckoutQuote, CheckoutQuoteRequest};
