pub mod service;

pub use service::{CreditGrantRequest, CreditGrantResponse, CreditService, CreditServiceApi};
