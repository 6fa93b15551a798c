use super::email_gateway::{EmailGateway, OutgoingEmail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: String,
}

/// Email gateway backed by the Resend HTTP API
pub struct ResendEmailGateway {
    http_client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl ResendEmailGateway {
    pub fn new(api_url: String, api_key: String, from: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            from,
        }
    }
}

#[async_trait]
impl EmailGateway for ResendEmailGateway {
    async fn send(&self, email: &OutgoingEmail) -> Result<String, String> {
        let body = SendEmailBody {
            from: &self.from,
            to: &email.to,
            subject: &email.subject,
            html: &email.html,
            text: &email.text,
            reply_to: email.reply_to.as_deref(),
        };

        let response = self
            .http_client
            .post(format!("{}/emails", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Email provider unreachable: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                detail = %detail,
                recipients = email.to.len(),
                "Email provider rejected message"
            );
            return Err(format!("Email provider returned {}: {}", status, detail));
        }

        let sent: SendEmailResponse = response
            .json()
            .await
            .map_err(|e| format!("Unexpected email provider response: {}", e))?;

        Ok(sent.id)
    }
}
