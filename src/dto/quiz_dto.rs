use crate::models::{Difficulty, Level, Question};
use serde::Deserialize;
use validator::Validate;

pub const DEFAULT_QUESTION_COUNT: usize = 5;

/// Parameters for AI quiz generation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuizPayload {
    #[validate(length(min = 1, message = "Topic cannot be empty"))]
    pub topic: String,
    pub difficulty: Difficulty,
    pub level: Level,
    #[serde(default = "default_question_count")]
    #[validate(range(min = 1, max = 20, message = "Question count must be between 1 and 20"))]
    pub question_count: usize,
}

fn default_question_count() -> usize {
    DEFAULT_QUESTION_COUNT
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizPayload {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    pub difficulty: Difficulty,
    pub level: Level,
    #[validate(length(min = 1, message = "At least 1 question is required"))]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub time_limit: u32,
}

/// Partial quiz update. Empty strings are normalized to `None` so the
/// COALESCE-style merge never writes a blank title.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuizPayload {
    #[serde(default, deserialize_with = "trim_optional_string")]
    #[validate(length(max = 200, message = "Title cannot exceed 200 characters"))]
    pub title: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub level: Option<Level>,
    pub questions: Option<Vec<Question>>,
    pub is_active: Option<bool>,
    pub time_limit: Option<u32>,
}

/// The quiz the question under verification belongs to. A non-blank
/// `title` takes precedence over `topic`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizContext {
    pub topic: String,
    #[serde(default)]
    pub title: Option<String>,
    pub difficulty: Difficulty,
    pub level: Level,
}

impl QuizContext {
    pub fn subject(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.topic)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyQuestionPayload {
    pub question: Question,
    #[serde(default)]
    pub original_question: Option<Question>,
    pub quiz_params: QuizContext,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateQuestionsPayload {
    #[validate(length(min = 1, message = "Topic cannot be empty"))]
    pub topic: String,
    pub difficulty: Difficulty,
    pub level: Level,
    pub indices_to_regenerate: Vec<usize>,
    pub current_questions: Vec<Question>,
}

fn trim_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}
