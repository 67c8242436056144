mod common;

use common::CannedModel;
use quiz_engine::dto::quiz_dto::GenerateQuizPayload;
use quiz_engine::error::Error;
use quiz_engine::models::{Difficulty, GenerationMethod, Level};
use quiz_engine::services::ai_service::AiService;
use std::sync::Arc;

fn solar_system_payload() -> GenerateQuizPayload {
    GenerateQuizPayload {
        topic: "Solar System".to_string(),
        difficulty: Difficulty::Medium,
        level: Level::School,
        question_count: 3,
    }
}

fn three_question_reply() -> String {
    // Well-formed quiz but no title, so the service must synthesize one.
    serde_json::json!({
        "questions": [
            {
                "text": "Which planet is closest to the sun?",
                "options": ["Mercury", "Venus", "Earth", "Mars"],
                "correctAnswers": ["Mercury"],
                "type": "single"
            },
            {
                "text": "Which of these are rocky planets?",
                "options": ["Mercury", "Venus", "Jupiter", "Saturn"],
                "correctAnswers": ["Mercury", "Venus"],
                "type": "multiple"
            },
            {
                "text": "How many moons does Earth have?",
                "options": ["0", "1", "2", "3"],
                "correctAnswers": ["1"],
                "type": "single"
            }
        ]
    })
    .to_string()
}

#[tokio::test]
async fn generates_a_quiz_from_a_mocked_model_reply() {
    common::init_tracing();
    let model = Arc::new(CannedModel::with_reply(format!(
        "Here is the quiz you asked for:\n{}",
        three_question_reply()
    )));
    let service = AiService::with_model(model.clone(), 20);

    let quiz = service.generate_quiz(&solar_system_payload()).await.unwrap();

    assert_eq!(quiz.title, "Quiz on Solar System (medium level)");
    assert_eq!(quiz.question_count(), 3);
    assert_eq!(quiz.difficulty, Difficulty::Medium);
    assert_eq!(quiz.level, Level::School);
    assert_eq!(quiz.created_by, GenerationMethod::Ai);

    let doc = serde_json::to_value(&quiz).unwrap();
    assert_eq!(doc["createdBy"], "ai");

    // The prompt carried the literal topic and the requested count.
    let prompt = model.prompt(0);
    assert!(prompt.contains("\"Solar System\""));
    assert!(prompt.contains("exactly 3 questions"));
}

#[tokio::test]
async fn model_title_wins_when_present() {
    let reply = serde_json::json!({
        "title": "Journey Through the Planets",
        "questions": [{
            "text": "Which planet is known as the Red Planet?",
            "options": ["Mars", "Venus", "Jupiter", "Mercury"],
            "correctAnswers": ["Mars"],
            "type": "single"
        }]
    })
    .to_string();
    let model = Arc::new(CannedModel::with_reply(reply));
    let service = AiService::with_model(model, 20);

    let mut payload = solar_system_payload();
    payload.question_count = 1;
    let quiz = service.generate_quiz(&payload).await.unwrap();
    assert_eq!(quiz.title, "Journey Through the Planets");
}

#[tokio::test]
async fn invalid_question_surfaces_as_generation_error() {
    // Single-choice question with two marked answers.
    let reply = serde_json::json!({
        "title": "Broken Quiz",
        "questions": [{
            "text": "Which planet is closest to the sun?",
            "options": ["Mercury", "Venus", "Earth", "Mars"],
            "correctAnswers": ["Mercury", "Venus"],
            "type": "single"
        }]
    })
    .to_string();
    let model = Arc::new(CannedModel::with_reply(reply));
    let service = AiService::with_model(model, 20);

    let err = service
        .generate_quiz(&solar_system_payload())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Generation(_)));
    match err.root_cause() {
        Error::Validation(message) => {
            assert!(message.contains("Question 1"), "got: {}", message);
        }
        other => panic!("expected validation root cause, got {:?}", other),
    }
}

#[tokio::test]
async fn reply_without_json_surfaces_extraction_error() {
    let model = Arc::new(CannedModel::with_reply(
        "I'm sorry, I cannot produce a quiz right now.",
    ));
    let service = AiService::with_model(model, 20);

    let err = service
        .generate_quiz(&solar_system_payload())
        .await
        .unwrap_err();
    assert!(matches!(err.root_cause(), Error::Extraction(_)));
}

#[tokio::test]
async fn model_failure_is_wrapped_not_lost() {
    let model = Arc::new(CannedModel::replying(vec![Err(anyhow::anyhow!(
        "upstream unavailable"
    )
    .into())]));
    let service = AiService::with_model(model, 20);

    let err = service
        .generate_quiz(&solar_system_payload())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Generation(_)));
    assert!(err.to_string().starts_with("Failed to generate quiz:"));
}
