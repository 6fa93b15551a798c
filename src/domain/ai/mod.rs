pub mod error;
pub mod service;

pub use error::AiServiceError;
pub use service::{
    credits_for_tokens, AiService, AiServiceApi, GenerateImageRequest, GenerateQuizRequest,
    GenerateTextRequest, GeneratedImage, GeneratedQuiz, GeneratedText,
};
