pub mod error;
pub mod service;

pub use error::EmailServiceError;
pub use service::{EmailService, EmailServiceApi, SendEmailRequest, SentEmail};
