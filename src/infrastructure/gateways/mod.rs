pub mod ai_gateway;
pub mod email_gateway;
pub mod openai_gateway;
pub mod resend_gateway;

pub use ai_gateway::{AiGateway, ChatRole, ChatTurn, Completion, CompletionRequest};
pub use email_gateway::{EmailGateway, OutgoingEmail};
pub use openai_gateway::OpenAiGateway;
pub use resend_gateway::ResendEmailGateway;
