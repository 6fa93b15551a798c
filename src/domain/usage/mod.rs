pub mod service;

pub use service::{UsageService, UsageServiceApi};
