use crate::models::question::Question;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    School,
    Undergrad,
    Postgrad,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        })
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Level::School => "school",
            Level::Undergrad => "undergrad",
            Level::Postgrad => "postgrad",
        })
    }
}

/// How the quiz came to exist. Serialized as `"manual"`/`"ai"` under the
/// `createdBy` key of the quiz document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMethod {
    Manual,
    Ai,
}

/// A titled collection of questions with difficulty/level metadata.
///
/// Timestamps are assigned by the persistence layer, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub title: String,
    pub difficulty: Difficulty,
    pub level: Level,
    pub questions: Vec<Question>,
    pub created_by: GenerationMethod,
    #[serde(default)]
    pub invited_students: Vec<Uuid>,
    #[serde(default)]
    pub attempts: Vec<Attempt>,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
    /// Minutes, 0 means no limit.
    #[serde(default)]
    pub time_limit: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_is_active() -> bool {
    true
}

/// One student's completed run through a quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub student: Uuid,
    pub score: u32,
    pub max_score: u32,
    #[serde(default)]
    pub answers: Vec<AttemptAnswer>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptAnswer {
    pub question_index: usize,
    pub selected_options: Vec<String>,
    pub is_correct: bool,
}

impl Quiz {
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn average_score(&self) -> f64 {
        if self.attempts.is_empty() {
            return 0.0;
        }
        let total: u32 = self.attempts.iter().map(|a| a.score).sum();
        total as f64 / self.attempts.len() as f64
    }
}
