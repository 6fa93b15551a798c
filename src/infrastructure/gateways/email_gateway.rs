use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    pub text: String,
    pub reply_to: Option<String>,
}

/// Email delivery provider
#[async_trait]
pub trait EmailGateway: Send + Sync {
    /// Dispatch an email and return the provider's message id
    async fn send(&self, email: &OutgoingEmail) -> Result<String, String>;
}
