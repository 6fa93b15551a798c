use super::error::EmailServiceError;
use crate::domain::auth::AuthContext;
use crate::domain::quota::{Gated, Metered, QuotaGate, ResourceKind, Subject};
use crate::domain::shared::validation::is_valid_email;
use crate::infrastructure::gateways::{EmailGateway, OutgoingEmail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const MAX_RECIPIENTS: usize = 50;
const MAX_SUBJECT_CHARS: usize = 200;
const TEXT_WRAP_WIDTH: usize = 80;

/// Request for POST /api/emails
#[derive(Debug, Serialize, Deserialize)]
pub struct SendEmailRequest {
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SentEmail {
    pub message_id: String,
    pub recipients: usize,
}

/// Every recipient costs one email credit
impl Metered for SentEmail {
    fn units(&self) -> i64 {
        self.recipients as i64
    }
}

pub struct EmailService {
    gate: Arc<QuotaGate>,
    gateway: Arc<dyn EmailGateway>,
}

impl EmailService {
    pub fn new(gate: Arc<QuotaGate>, gateway: Arc<dyn EmailGateway>) -> Self {
        Self { gate, gateway }
    }
}

#[async_trait]
pub trait EmailServiceApi: Send + Sync {
    async fn send(
        &self,
        ctx: &AuthContext,
        request: SendEmailRequest,
    ) -> Result<Gated<SentEmail>, EmailServiceError>;
}

#[async_trait]
impl EmailServiceApi for EmailService {
    async fn send(
        &self,
        ctx: &AuthContext,
        request: SendEmailRequest,
    ) -> Result<Gated<SentEmail>, EmailServiceError> {
        let recipients = normalize_recipients(&request.to)?;
        let subject_line = request.subject.trim().to_string();
        if subject_line.is_empty() {
            return Err(EmailServiceError::Invalid(
                "Subject cannot be empty".to_string(),
            ));
        }
        if subject_line.chars().count() > MAX_SUBJECT_CHARS {
            return Err(EmailServiceError::Invalid(format!(
                "Subject must be {} characters or less",
                MAX_SUBJECT_CHARS
            )));
        }
        if request.html.trim().is_empty() {
            return Err(EmailServiceError::Invalid("Body cannot be empty".to_string()));
        }
        if let Some(reply_to) = &request.reply_to {
            if !is_valid_email(reply_to.trim()) {
                return Err(EmailServiceError::Invalid(format!(
                    "Invalid reply-to address: {}",
                    reply_to
                )));
            }
        }

        let text = html2text::from_read(request.html.as_bytes(), TEXT_WRAP_WIDTH);
        let email = OutgoingEmail {
            to: recipients,
            subject: subject_line,
            html: request.html,
            text,
            reply_to: request.reply_to.map(|r| r.trim().to_string()),
        };

        tracing::info!(
            user_id = %ctx.user_id,
            organization_id = %ctx.organization_id,
            recipients = email.to.len(),
            "Email dispatch request"
        );

        let subject = Subject::for_resource(ctx, ResourceKind::EmailCredits);
        let cost = email.to.len() as i64;
        let gateway = self.gateway.clone();
        let gated = self
            .gate
            .run_with_cost(&subject, ResourceKind::EmailCredits, cost, || async move {
                let message_id = gateway.send(&email).await?;
                Ok::<_, String>(SentEmail {
                    message_id,
                    recipients: email.to.len(),
                })
            })
            .await?;

        tracing::info!(
            organization_id = %ctx.organization_id,
            message_id = %gated.value.message_id,
            charged = gated.charged,
            "Email dispatched"
        );

        Ok(gated)
    }
}

/// Trim, lower-case and de-duplicate recipients, rejecting malformed addresses
fn normalize_recipients(to: &[String]) -> Result<Vec<String>, EmailServiceError> {
    let mut recipients: Vec<String> = Vec::with_capacity(to.len());
    for address in to {
        let address = address.trim().to_lowercase();
        if !is_valid_email(&address) {
            return Err(EmailServiceError::Invalid(format!(
                "Invalid recipient address: {}",
                address
            )));
        }
        if !recipients.contains(&address) {
            recipients.push(address);
        }
    }

    if recipients.is_empty() {
        return Err(EmailServiceError::Invalid(
            "At least one recipient is required".to_string(),
        ));
    }
    if recipients.len() > MAX_RECIPIENTS {
        return Err(EmailServiceError::Invalid(format!(
            "At most {} recipients per email",
            MAX_RECIPIENTS
        )));
    }

    Ok(recipients)
}
