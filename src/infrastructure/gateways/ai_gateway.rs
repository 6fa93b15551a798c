use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub turns: Vec<ChatTurn>,
}

#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    /// Provider-reported prompt plus completion tokens
    pub total_tokens: u32,
}

/// AI text and image generation provider.
///
/// Errors are returned as provider detail strings; callers surface them as
/// upstream failures.
#[async_trait]
pub trait AiGateway: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, String>;

    /// Generate one image and return its URL
    async fn generate_image(&self, prompt: &str) -> Result<String, String>;
}
