use super::error::TutorServiceError;
use crate::domain::auth::AuthContext;
use crate::domain::quota::{Gated, Metered, QuotaGate, ResourceKind, Subject};
use crate::infrastructure::gateways::{AiGateway, ChatRole, ChatTurn, CompletionRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const MAX_HISTORY_TURNS: usize = 20;
const MAX_MESSAGE_CHARS: usize = 4_000;

/// Request for POST /api/tutor/messages
#[derive(Debug, Serialize, Deserialize)]
pub struct TutorRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_title: Option<String>,
    /// Earlier turns of the conversation, oldest first
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TutorReply {
    pub reply: String,
}

impl Metered for TutorReply {}

pub struct TutorService {
    gate: Arc<QuotaGate>,
    gateway: Arc<dyn AiGateway>,
}

impl TutorService {
    pub fn new(gate: Arc<QuotaGate>, gateway: Arc<dyn AiGateway>) -> Self {
        Self { gate, gateway }
    }
}

#[async_trait]
pub trait TutorServiceApi: Send + Sync {
    /// Answer a student's message. Metered per user, one message per turn.
    async fn reply(
        &self,
        ctx: &AuthContext,
        request: TutorRequest,
    ) -> Result<Gated<TutorReply>, TutorServiceError>;
}

#[async_trait]
impl TutorServiceApi for TutorService {
    async fn reply(
        &self,
        ctx: &AuthContext,
        request: TutorRequest,
    ) -> Result<Gated<TutorReply>, TutorServiceError> {
        let message = request.message.trim();
        if message.is_empty() {
            return Err(TutorServiceError::Invalid(
                "Message cannot be empty".to_string(),
            ));
        }
        if message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(TutorServiceError::Invalid(format!(
                "Message must be {} characters or less",
                MAX_MESSAGE_CHARS
            )));
        }

        let completion = CompletionRequest {
            system: system_prompt(request.course_title.as_deref()),
            turns: conversation(request.history, message),
        };

        tracing::debug!(
            user_id = %ctx.user_id,
            turns = completion.turns.len(),
            "Tutor message"
        );

        let subject = Subject::for_resource(ctx, ResourceKind::TutorMessages);
        let gateway = self.gateway.clone();
        let gated = self
            .gate
            .run(&subject, ResourceKind::TutorMessages, || async move {
                let reply = gateway.complete(completion).await?;
                Ok::<_, String>(TutorReply { reply: reply.text })
            })
            .await?;

        Ok(gated)
    }
}

fn system_prompt(course_title: Option<&str>) -> String {
    let mut prompt = String::from(
        "You are a patient tutor. Guide the student towards the answer with hints and \
         questions instead of giving full solutions. Keep replies short.",
    );
    if let Some(title) = course_title.map(str::trim).filter(|t| !t.is_empty()) {
        prompt.push_str(&format!(" The student is taking the course \"{}\".", title));
    }
    prompt
}

/// The last `MAX_HISTORY_TURNS` turns of history followed by the new message
fn conversation(mut history: Vec<ChatTurn>, message: &str) -> Vec<ChatTurn> {
    if history.len() > MAX_HISTORY_TURNS {
        history.drain(..history.len() - MAX_HISTORY_TURNS);
    }
    history.push(ChatTurn {
        role: ChatRole::User,
        content: message.to_string(),
    });
    history
}
