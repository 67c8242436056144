use crate::config::Config;
use crate::dto::quiz_dto::{
    GenerateQuizPayload, RegenerateQuestionsPayload, VerifyQuestionPayload,
};
use crate::error::{Error, Result};
use crate::models::{Difficulty, GenerationMethod, Level, Question, QuestionType, Quiz};
use crate::services::gemini_client::{GeminiClient, GenerationOptions, GenerativeModel};
use crate::utils::extract::{extract_array, extract_object};
use crate::utils::validation::{self, QuizRules};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;

const QUIZ_GENERATION_OPTIONS: GenerationOptions = GenerationOptions {
    max_output_tokens: 2048,
    temperature: 0.7,
    top_p: 0.95,
};

const VERIFICATION_OPTIONS: GenerationOptions = GenerationOptions {
    max_output_tokens: 1024,
    temperature: 0.2,
    top_p: 0.95,
};

/// Outcome of asking the model to critique a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub is_correct: bool,
    pub feedback: String,
    pub suggestions: Vec<String>,
}

impl VerificationResult {
    fn fallback() -> Self {
        Self {
            is_correct: false,
            feedback: "Failed to validate the question due to a technical issue. \
                       Try again or proceed with your own judgment."
                .to_string(),
            suggestions: vec!["Try again with a simpler question structure.".to_string()],
        }
    }
}

/// Metadata merged into whatever the model produced.
#[derive(Debug, Clone, Copy)]
pub struct QuizMetadata<'a> {
    pub topic: &'a str,
    pub difficulty: Difficulty,
    pub level: Level,
}

#[derive(Clone)]
pub struct AiService {
    model: Arc<dyn GenerativeModel>,
    max_questions: usize,
}

impl AiService {
    pub fn new(config: &Config, client: reqwest::Client) -> Self {
        Self {
            model: Arc::new(GeminiClient::new(config.clone(), client)),
            max_questions: config.max_ai_questions,
        }
    }

    /// Swap in any model backend; used by tests and non-Gemini deployments.
    pub fn with_model(model: Arc<dyn GenerativeModel>, max_questions: usize) -> Self {
        Self {
            model,
            max_questions,
        }
    }

    /// Generate a complete quiz. Every failure, including the model call
    /// itself, surfaces as `Error::Generation` with the cause attached.
    pub async fn generate_quiz(&self, payload: &GenerateQuizPayload) -> Result<Quiz> {
        self.try_generate_quiz(payload)
            .await
            .map_err(|e| Error::Generation(Box::new(e)))
    }

    async fn try_generate_quiz(&self, payload: &GenerateQuizPayload) -> Result<Quiz> {
        validation::validate_payload(payload)?;
        if payload.question_count > self.max_questions {
            return Err(Error::Validation(format!(
                "Question count cannot exceed {}",
                self.max_questions
            )));
        }

        tracing::info!(
            topic = %payload.topic,
            difficulty = %payload.difficulty,
            level = %payload.level,
            count = payload.question_count,
            "Starting quiz generation"
        );

        let prompt = build_quiz_prompt(payload);
        let text = self.model.generate(&prompt, &QUIZ_GENERATION_OPTIONS).await?;
        tracing::debug!(reply_len = text.len(), "Model reply received");

        let quiz = parse_quiz_response(
            &text,
            QuizMetadata {
                topic: &payload.topic,
                difficulty: payload.difficulty,
                level: payload.level,
            },
        )?;
        tracing::info!(questions = quiz.question_count(), "Quiz generated");
        Ok(quiz)
    }

    /// Ask the model to critique a question. Never raises: any failure
    /// (transport, extraction, parse) is logged and folded into a
    /// fallback result so a broken critique cannot block editing.
    pub async fn verify_question(&self, payload: &VerifyQuestionPayload) -> VerificationResult {
        match self.try_verify_question(payload).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, "Question verification failed");
                VerificationResult::fallback()
            }
        }
    }

    async fn try_verify_question(
        &self,
        payload: &VerifyQuestionPayload,
    ) -> Result<VerificationResult> {
        let prompt = build_verification_prompt(payload)?;
        let text = self.model.generate(&prompt, &VERIFICATION_OPTIONS).await?;
        let span = extract_object(&text)?;
        let reply: JsonValue = serde_json::from_str(span).map_err(Error::Parse)?;
        Ok(normalize_verification(&reply))
    }

    /// Request replacement questions for the given indices, preserving
    /// each slot's original question type. Out-of-range indices are
    /// dropped; if none survive, no model call is made.
    pub async fn regenerate_questions(
        &self,
        payload: &RegenerateQuestionsPayload,
    ) -> Result<Vec<Question>> {
        let slots: Vec<QuestionType> = payload
            .indices_to_regenerate
            .iter()
            .filter_map(|&index| {
                payload
                    .current_questions
                    .get(index)
                    .map(|q| q.question_type)
            })
            .collect();

        if slots.is_empty() {
            return Ok(vec![]);
        }

        tracing::info!(
            indices = ?payload.indices_to_regenerate,
            slots = slots.len(),
            "Regenerating questions"
        );

        self.try_regenerate(payload, &slots)
            .await
            .map_err(|e| Error::Regeneration(Box::new(e)))
    }

    async fn try_regenerate(
        &self,
        payload: &RegenerateQuestionsPayload,
        slots: &[QuestionType],
    ) -> Result<Vec<Question>> {
        validation::validate_payload(payload)?;
        let prompt =
            build_regeneration_prompt(&payload.topic, payload.difficulty, payload.level, slots);
        let text = self.model.generate(&prompt, &QUIZ_GENERATION_OPTIONS).await?;
        parse_regenerated_questions(&text)
    }
}

/// Render generation parameters into the model instruction. Pure: the
/// same parameters always produce the same prompt text.
pub fn build_quiz_prompt(params: &GenerateQuizPayload) -> String {
    format!(
        r#"Create a quiz about "{topic}" with exactly {count} questions.

Difficulty level: {difficulty} (easy, medium, or hard)
Academic level: {level} (school, undergraduate, or postgraduate)

Requirements:
1. Each question should have 4 options.
2. 70% of questions should be single-choice (one correct answer).
3. 30% of questions should be multiple-choice (1-4 correct answers).

The quiz should be structured precisely as follows:

{{
  "title": "Quiz Title",
  "questions": [
    {{
      "text": "Question text goes here?",
      "options": ["Option A", "Option B", "Option C", "Option D"],
      "correctAnswers": ["Option A"],
      "type": "single"
    }},
    {{
      "text": "Multiple-choice question text?",
      "options": ["Option A", "Option B", "Option C", "Option D"],
      "correctAnswers": ["Option A", "Option C"],
      "type": "multiple"
    }}
  ]
}}

IMPORTANT: Make sure:
1. All questions have exactly 4 options.
2. Single-choice questions have exactly 1 correct answer.
3. Multiple-choice questions have 1-4 correct answers.
4. The "correctAnswers" field always contains the exact text of the correct options.
5. The full response must be parsable as JSON - don't include any text before or after the JSON."#,
        topic = params.topic,
        count = params.question_count,
        difficulty = params.difficulty,
        level = params.level,
    )
}

pub fn build_verification_prompt(payload: &VerifyQuestionPayload) -> Result<String> {
    let question_json = serde_json::to_string_pretty(&payload.question).map_err(Error::Parse)?;
    let subject = payload.quiz_params.subject();
    let difficulty = payload.quiz_params.difficulty;

    let mut prompt = match &payload.original_question {
        Some(original) => {
            let original_json = serde_json::to_string_pretty(original).map_err(Error::Parse)?;
            format!(
                r#"You are an expert quiz validator. Review the following quiz question
for a quiz on the topic: "{subject}" with difficulty: {difficulty}.

ORIGINAL QUESTION:
{original_json}

EDITED QUESTION:
{question_json}

Your task is to determine if the edited question is valid and correct."#
            )
        }
        None => format!(
            r#"You are an expert quiz validator. Review the following quiz question
for a quiz on the topic: "{subject}" with difficulty: {difficulty}.

QUESTION TO VERIFY:
{question_json}

Your task is to determine if this question is valid, factually accurate, and has correctly marked answer(s)."#
        ),
    };

    prompt.push_str(&format!(
        r#"

Guidelines for validation:
1. The question must be factually accurate
2. The correct answer(s) must actually be correct for the question
3. For multiple-choice questions, all correct answers should be marked
4. Distractors (incorrect options) should be plausible but clearly incorrect
5. The question should be at an appropriate {level} education level
6. The question should be at an appropriate {difficulty} difficulty level

Respond with a JSON object in exactly this format:
{{
  "isCorrect": true/false,
  "feedback": "Your detailed feedback about the quality of the question",
  "suggestions": ["Suggestion 1", "Suggestion 2"]
}}"#,
        level = payload.quiz_params.level,
        difficulty = difficulty,
    ));

    Ok(prompt)
}

pub fn build_regeneration_prompt(
    topic: &str,
    difficulty: Difficulty,
    level: Level,
    slots: &[QuestionType],
) -> String {
    let requirements = slots
        .iter()
        .enumerate()
        .map(|(i, slot)| {
            format!(
                "Question {}: {}",
                i + 1,
                match slot {
                    QuestionType::Single => "Single choice (1 correct answer)",
                    QuestionType::Multiple => "Multiple choice (2-3 correct answers)",
                }
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Generate {count} quiz questions about "{topic}".

Difficulty level: {difficulty} (easy, medium, or hard)
Academic level: {level} (school, undergraduate, or postgraduate)

Specific requirements for the questions:
{requirements}

The questions must be structured precisely as follows:

[
  {{
    "text": "Question text goes here?",
    "options": ["Option A", "Option B", "Option C", "Option D"],
    "correctAnswers": ["Option A"],
    "type": "single"
  }}
]

IMPORTANT:
1. Each question must have exactly 4 options
2. The response must be a valid JSON array with no text before or after it
3. Make sure the "correctAnswers" field contains the exact text of the correct options
4. All questions must be factually accurate and appropriate for the topic"#,
        count = slots.len(),
        topic = topic,
        difficulty = difficulty,
        level = level,
        requirements = requirements,
    )
}

/// Recover a validated quiz from a free-text model reply.
pub fn parse_quiz_response(text: &str, meta: QuizMetadata<'_>) -> Result<Quiz> {
    #[derive(Deserialize)]
    struct GeneratedQuiz {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        questions: Vec<Question>,
    }

    let span = extract_object(text)?;
    let generated: GeneratedQuiz = serde_json::from_str(span).map_err(Error::Parse)?;

    let title = generated
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| format!("Quiz on {} ({} level)", meta.topic, meta.difficulty));

    let quiz = Quiz {
        title,
        difficulty: meta.difficulty,
        level: meta.level,
        questions: generated.questions,
        created_by: GenerationMethod::Ai,
        invited_students: vec![],
        attempts: vec![],
        is_active: true,
        time_limit: 0,
        created_at: None,
        updated_at: None,
    };

    validation::validate_quiz(&quiz, &QuizRules::AI_GENERATED)?;
    Ok(quiz)
}

fn parse_regenerated_questions(text: &str) -> Result<Vec<Question>> {
    let span = extract_array(text)?;
    let questions: Vec<Question> = serde_json::from_str(span).map_err(Error::Parse)?;
    for (index, question) in questions.iter().enumerate() {
        validation::validate_question(index, question, &QuizRules::AI_GENERATED)?;
    }
    Ok(questions)
}

/// Map the model's critique reply onto `VerificationResult`, accepting
/// the legacy field names `isValid` and `explanation`.
fn normalize_verification(reply: &JsonValue) -> VerificationResult {
    let is_correct = reply
        .get("isCorrect")
        .or_else(|| reply.get("isValid"))
        .and_then(JsonValue::as_bool)
        .unwrap_or(false);

    let feedback = reply
        .get("feedback")
        .or_else(|| reply.get("explanation"))
        .and_then(JsonValue::as_str)
        .unwrap_or("No feedback provided.")
        .to_string();

    let suggestions = reply
        .get("suggestions")
        .and_then(JsonValue::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    VerificationResult {
        is_correct,
        feedback,
        suggestions,
    }
}
