pub mod error;
pub mod model;
pub mod service;

pub use error::ContentServiceError;
pub use model::{
    ContentConfig, EmbedConfig, EmbedProvider, GeneratedToolConfig, LessonBlock, QuizConfig,
    QuizQuestion,
};
pub use service::{ContentService, ContentServiceApi, LessonBlockResponse, UpsertBlockRequest};
