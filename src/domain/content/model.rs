use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use std::sync::OnceLock;
use uuid::Uuid;

const MAX_QUIZ_QUESTIONS: usize = 50;
const MAX_TOOL_HTML_BYTES: usize = 200_000;

/// A block of lesson content stored as JSON
#[derive(Debug, Clone, FromRow)]
pub struct LessonBlock {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub lesson_id: Uuid,
    pub position: i32,
    pub config: Json<ContentConfig>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Known shapes of lesson configuration payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentConfig {
    Quiz(QuizConfig),
    Embed(EmbedConfig),
    GeneratedTool(GeneratedToolConfig),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub questions: Vec<QuizQuestion>,
    /// Percentage needed to pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passing_score: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedProvider {
    Youtube,
    Vimeo,
    Loom,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedConfig {
    pub url: String,
    pub provider: EmbedProvider,
    /// Like `16:9`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
}

/// Interactive tool produced by AI generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedToolConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub html: String,
}

impl ContentConfig {
    pub fn validate(&self) -> Result<(), String> {
        match self {
            ContentConfig::Quiz(quiz) => quiz.validate(),
            ContentConfig::Embed(embed) => embed.validate(),
            ContentConfig::GeneratedTool(tool) => tool.validate(),
        }
    }
}

impl QuizConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.questions.is_empty() {
            return Err("Quiz must have at least one question".to_string());
        }
        if self.questions.len() > MAX_QUIZ_QUESTIONS {
            return Err(format!(
                "Quiz cannot have more than {} questions",
                MAX_QUIZ_QUESTIONS
            ));
        }
        if let Some(score) = self.passing_score {
            if score > 100 {
                return Err("Passing score must be between 0 and 100".to_string());
            }
        }

        for (index, question) in self.questions.iter().enumerate() {
            let number = index + 1;
            if question.prompt.trim().is_empty() {
                return Err(format!("Question {} has an empty prompt", number));
            }
            if question.options.len() < 2 {
                return Err(format!("Question {} needs at least two options", number));
            }
            if question.options.iter().any(|o| o.trim().is_empty()) {
                return Err(format!("Question {} has an empty option", number));
            }
            if question.correct_index >= question.options.len() {
                return Err(format!(
                    "Question {} marks option {} as correct but has {} options",
                    number,
                    question.correct_index,
                    question.options.len()
                ));
            }
        }

        Ok(())
    }
}

fn aspect_ratio_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[1-9][0-9]?:[1-9][0-9]?$").expect("valid regex"))
}

impl EmbedConfig {
    pub fn validate(&self) -> Result<(), String> {
        let url = self.url.trim();
        if !url.starts_with("https://") || url.len() <= "https://".len() {
            return Err("Embed URL must use https".to_string());
        }
        if let Some(ratio) = &self.aspect_ratio {
            if !aspect_ratio_pattern().is_match(ratio) {
                return Err(format!("Invalid aspect ratio: {}", ratio));
            }
        }
        Ok(())
    }
}

impl GeneratedToolConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Tool name cannot be empty".to_string());
        }
        if self.html.trim().is_empty() {
            return Err("Tool HTML cannot be empty".to_string());
        }
        if self.html.len() > MAX_TOOL_HTML_BYTES {
            return Err(format!(
                "Tool HTML must be {} bytes or less",
                MAX_TOOL_HTML_BYTES
            ));
        }
        Ok(())
    }
}
