use super::ai_gateway::{AiGateway, ChatRole, Completion, CompletionRequest};
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, CreateImageRequestArgs, Image, ImageModel, ImageSize,
    },
    Client,
};
use async_trait::async_trait;
use std::sync::Arc;

/// OpenAI implementation of the AI gateway
pub struct OpenAiGateway {
    client: Arc<Client<OpenAIConfig>>,
    text_model: String,
    image_model: String,
}

impl OpenAiGateway {
    pub fn new(client: Arc<Client<OpenAIConfig>>, text_model: String, image_model: String) -> Self {
        Self {
            client,
            text_model,
            image_model,
        }
    }

    fn build_messages(
        &self,
        request: &CompletionRequest,
    ) -> Result<Vec<ChatCompletionRequestMessage>, OpenAIError> {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(request.turns.len() + 1);
        messages.push(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(request.system.clone())
                .build()?
                .into(),
        );

        for turn in &request.turns {
            let message = match turn.role {
                ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
                    .content(turn.content.clone())
                    .build()?
                    .into(),
                ChatRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                    .content(turn.content.clone())
                    .build()?
                    .into(),
            };
            messages.push(message);
        }

        Ok(messages)
    }

    fn image_model(&self) -> ImageModel {
        match self.image_model.as_str() {
            "dall-e-2" => ImageModel::DallE2,
            "dall-e-3" => ImageModel::DallE3,
            other => ImageModel::Other(other.to_string()),
        }
    }
}

#[async_trait]
impl AiGateway for OpenAiGateway {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, String> {
        let start_time = std::time::Instant::now();

        let messages = self
            .build_messages(&request)
            .map_err(|e| format!("Invalid completion request: {}", e))?;

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(self.text_model.clone())
            .messages(messages)
            .build()
            .map_err(|e| format!("Invalid completion request: {}", e))?;

        let response = self.client.chat().create(chat_request).await.map_err(|e| {
            tracing::error!(
                error = %e,
                model = %self.text_model,
                turns = request.turns.len(),
                "OpenAI chat completion failed"
            );
            format!("OpenAI completion error: {}", e)
        })?;

        let text = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| "OpenAI returned an empty completion".to_string())?;

        let total_tokens = response.usage.map(|u| u.total_tokens).unwrap_or(0);

        tracing::info!(
            model = %self.text_model,
            total_tokens,
            duration_ms = start_time.elapsed().as_millis() as u64,
            "OpenAI completion received"
        );

        Ok(Completion { text, total_tokens })
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, String> {
        let request = CreateImageRequestArgs::default()
            .prompt(prompt)
            .model(self.image_model())
            .n(1)
            .size(ImageSize::S1024x1024)
            .build()
            .map_err(|e| format!("Invalid image request: {}", e))?;

        let response = self.client.images().create(request).await.map_err(|e| {
            tracing::error!(
                error = %e,
                model = %self.image_model,
                "OpenAI image generation failed"
            );
            format!("OpenAI image error: {}", e)
        })?;

        match response.data.first().map(|image| image.as_ref()) {
            Some(Image::Url { url, .. }) => Ok(url.clone()),
            Some(_) => Err("OpenAI returned an inline image instead of a URL".to_string()),
            None => Err("OpenAI returned no image".to_string()),
        }
    }
}
