use super::error::AiServiceError;
use crate::domain::auth::AuthContext;
use crate::domain::content::QuizConfig;
use crate::domain::quota::{Gated, Metered, QuotaGate, ResourceKind, Subject};
use crate::infrastructure::gateways::{AiGateway, ChatRole, ChatTurn, CompletionRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const MAX_PROMPT_CHARS: usize = 8_000;
const MAX_QUIZ_QUESTIONS: u32 = 20;
const TOKENS_PER_CREDIT: u32 = 1_000;

const COURSE_ASSISTANT_PROMPT: &str = "You are an assistant helping academy instructors write clear, \
engaging and accurate course material. Answer in the language of the request.";

const QUIZ_AUTHOR_PROMPT: &str = "You write multiple-choice quizzes for online courses. Reply with \
JSON only, no prose, shaped as {\"title\": string, \"questions\": [{\"prompt\": string, \
\"options\": [string], \"correct_index\": number, \"explanation\": string}]}. correct_index is \
zero-based. Every question has between 2 and 5 options.";

/// Request for POST /api/ai/text
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateTextRequest {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Request for POST /api/ai/image
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateImageRequest {
    pub prompt: String,
}

/// Request for POST /api/ai/quiz
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateQuizRequest {
    pub topic: String,
    #[serde(default = "default_question_count")]
    pub question_count: u32,
}

fn default_question_count() -> u32 {
    5
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedText {
    pub text: String,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedImage {
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedQuiz {
    pub quiz: QuizConfig,
    pub total_tokens: u32,
}

/// One credit per started thousand tokens, never less than one
pub fn credits_for_tokens(total_tokens: u32) -> i64 {
    let credits = total_tokens.div_ceil(TOKENS_PER_CREDIT);
    i64::from(credits.max(1))
}

impl Metered for GeneratedText {
    fn units(&self) -> i64 {
        credits_for_tokens(self.total_tokens)
    }
}

impl Metered for GeneratedImage {}

impl Metered for GeneratedQuiz {
    fn units(&self) -> i64 {
        credits_for_tokens(self.total_tokens)
    }
}

pub struct AiService {
    gate: Arc<QuotaGate>,
    gateway: Arc<dyn AiGateway>,
}

impl AiService {
    pub fn new(gate: Arc<QuotaGate>, gateway: Arc<dyn AiGateway>) -> Self {
        Self { gate, gateway }
    }
}

#[async_trait]
pub trait AiServiceApi: Send + Sync {
    /// Generate course text, charged in AI credits by provider-reported tokens
    async fn generate_text(
        &self,
        ctx: &AuthContext,
        request: GenerateTextRequest,
    ) -> Result<Gated<GeneratedText>, AiServiceError>;

    /// Generate a single image, one credit
    async fn generate_image(
        &self,
        ctx: &AuthContext,
        request: GenerateImageRequest,
    ) -> Result<Gated<GeneratedImage>, AiServiceError>;

    /// Generate a quiz. Output that does not validate is not charged.
    async fn generate_quiz(
        &self,
        ctx: &AuthContext,
        request: GenerateQuizRequest,
    ) -> Result<Gated<GeneratedQuiz>, AiServiceError>;
}

#[async_trait]
impl AiServiceApi for AiService {
    async fn generate_text(
        &self,
        ctx: &AuthContext,
        request: GenerateTextRequest,
    ) -> Result<Gated<GeneratedText>, AiServiceError> {
        validate_prompt(&request.prompt)?;

        tracing::info!(
            user_id = %ctx.user_id,
            organization_id = %ctx.organization_id,
            prompt_length = request.prompt.len(),
            "AI text generation request"
        );

        let mut turns = Vec::with_capacity(2);
        if let Some(context) = request.context.filter(|c| !c.trim().is_empty()) {
            turns.push(ChatTurn {
                role: ChatRole::User,
                content: format!("Course context:\n{}", context),
            });
        }
        turns.push(ChatTurn {
            role: ChatRole::User,
            content: request.prompt,
        });

        let subject = Subject::for_resource(ctx, ResourceKind::AiCredits);
        let gateway = self.gateway.clone();
        let gated = self
            .gate
            .run(&subject, ResourceKind::AiCredits, || async move {
                let completion = gateway
                    .complete(CompletionRequest {
                        system: COURSE_ASSISTANT_PROMPT.to_string(),
                        turns,
                    })
                    .await?;
                Ok::<_, String>(GeneratedText {
                    text: completion.text,
                    total_tokens: completion.total_tokens,
                })
            })
            .await?;

        Ok(gated)
    }

    async fn generate_image(
        &self,
        ctx: &AuthContext,
        request: GenerateImageRequest,
    ) -> Result<Gated<GeneratedImage>, AiServiceError> {
        validate_prompt(&request.prompt)?;

        tracing::info!(
            user_id = %ctx.user_id,
            organization_id = %ctx.organization_id,
            "AI image generation request"
        );

        let subject = Subject::for_resource(ctx, ResourceKind::AiCredits);
        let gateway = self.gateway.clone();
        let prompt = request.prompt;
        let gated = self
            .gate
            .run(&subject, ResourceKind::AiCredits, || async move {
                let url = gateway.generate_image(&prompt).await?;
                Ok::<_, String>(GeneratedImage { url })
            })
            .await?;

        Ok(gated)
    }

    async fn generate_quiz(
        &self,
        ctx: &AuthContext,
        request: GenerateQuizRequest,
    ) -> Result<Gated<GeneratedQuiz>, AiServiceError> {
        validate_prompt(&request.topic)?;
        if request.question_count == 0 || request.question_count > MAX_QUIZ_QUESTIONS {
            return Err(AiServiceError::Invalid(format!(
                "Question count must be between 1 and {}",
                MAX_QUIZ_QUESTIONS
            )));
        }

        tracing::info!(
            user_id = %ctx.user_id,
            organization_id = %ctx.organization_id,
            question_count = request.question_count,
            "AI quiz generation request"
        );

        let subject = Subject::for_resource(ctx, ResourceKind::AiCredits);
        let gateway = self.gateway.clone();
        let turns = vec![ChatTurn {
            role: ChatRole::User,
            content: format!(
                "Write {} questions about: {}",
                request.question_count, request.topic
            ),
        }];

        let gated = self
            .gate
            .run(&subject, ResourceKind::AiCredits, || async move {
                let completion = gateway
                    .complete(CompletionRequest {
                        system: QUIZ_AUTHOR_PROMPT.to_string(),
                        turns,
                    })
                    .await?;
                let quiz = parse_quiz(&completion.text)?;
                Ok::<_, String>(GeneratedQuiz {
                    quiz,
                    total_tokens: completion.total_tokens,
                })
            })
            .await?;

        Ok(gated)
    }
}

fn validate_prompt(prompt: &str) -> Result<(), AiServiceError> {
    if prompt.trim().is_empty() {
        return Err(AiServiceError::Invalid("Prompt cannot be empty".to_string()));
    }
    if prompt.chars().count() > MAX_PROMPT_CHARS {
        return Err(AiServiceError::Invalid(format!(
            "Prompt must be {} characters or less",
            MAX_PROMPT_CHARS
        )));
    }
    Ok(())
}

/// Parse and validate a quiz from model output, tolerating a fenced code block
fn parse_quiz(text: &str) -> Result<QuizConfig, String> {
    let trimmed = text.trim();
    let json = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    let quiz: QuizConfig =
        serde_json::from_str(json).map_err(|e| format!("Model returned malformed quiz: {}", e))?;
    quiz.validate()
        .map_err(|e| format!("Model returned an invalid quiz: {}", e))?;

    Ok(quiz)
}
