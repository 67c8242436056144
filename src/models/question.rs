use serde::{Deserialize, Serialize};

/// A single quiz question. Wire names are camelCase because that is the
/// document format the persistence layer stores and the model replies use.
///
/// `text`, `options` and `correctAnswers` default when absent so that a
/// structurally incomplete model reply reaches the validator (which
/// reports the question index) instead of dying inside deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answers: Vec<String>,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Single,
    Multiple,
}

impl Question {
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        correct_answers: Vec<String>,
        question_type: QuestionType,
    ) -> Self {
        Self {
            text: text.into(),
            options,
            correct_answers,
            question_type,
        }
    }
}
