use crate::dto::quiz_dto::{CreateQuizPayload, UpdateQuizPayload};
use crate::error::{Error, Result};
use crate::models::{Attempt, GenerationMethod, Question, Quiz};
use crate::utils::validation::{self, QuizRules};
use uuid::Uuid;

/// Lifecycle operations on quiz documents. Persistence stays with the
/// caller; every mutation here is validate-then-commit, so a rejected
/// change leaves the quiz untouched.
pub struct QuizService;

impl QuizService {
    /// Build a quiz from a manual-creation request. Manually authored
    /// questions only need 2 options.
    pub fn create_manual_quiz(payload: CreateQuizPayload) -> Result<Quiz> {
        validation::validate_payload(&payload)?;

        let quiz = Quiz {
            title: payload.title.trim().to_string(),
            difficulty: payload.difficulty,
            level: payload.level,
            questions: payload.questions,
            created_by: GenerationMethod::Manual,
            invited_students: vec![],
            attempts: vec![],
            is_active: true,
            time_limit: payload.time_limit,
            created_at: None,
            updated_at: None,
        };

        validation::validate_quiz(&quiz, &QuizRules::MANUAL)?;
        Ok(quiz)
    }

    /// Partial update: absent fields keep their current value.
    pub fn apply_update(quiz: &mut Quiz, payload: UpdateQuizPayload) -> Result<()> {
        validation::validate_payload(&payload)?;

        let mut updated = quiz.clone();
        if let Some(title) = payload.title {
            updated.title = title;
        }
        if let Some(difficulty) = payload.difficulty {
            updated.difficulty = difficulty;
        }
        if let Some(level) = payload.level {
            updated.level = level;
        }
        if let Some(questions) = payload.questions {
            updated.questions = questions;
        }
        if let Some(is_active) = payload.is_active {
            updated.is_active = is_active;
        }
        if let Some(time_limit) = payload.time_limit {
            updated.time_limit = time_limit;
        }

        validation::validate_quiz(&updated, &QuizRules::MANUAL)?;
        *quiz = updated;
        Ok(())
    }

    /// Replace a single question in place.
    pub fn replace_question(quiz: &mut Quiz, index: usize, question: Question) -> Result<()> {
        if index >= quiz.questions.len() {
            return Err(Error::Validation(format!(
                "Question index {} is out of range",
                index
            )));
        }

        let mut updated = quiz.clone();
        updated.questions[index] = question;
        validation::validate_quiz(&updated, &QuizRules::MANUAL)?;
        *quiz = updated;
        Ok(())
    }

    /// Splice regenerated questions into their slots. Replacements pair
    /// with indices in order; out-of-range indices are skipped, matching
    /// the regenerator's own filtering.
    pub fn splice_regenerated(
        quiz: &mut Quiz,
        indices: &[usize],
        replacements: Vec<Question>,
    ) -> Result<()> {
        let mut updated = quiz.clone();
        let mut replacements = replacements.into_iter();

        for &index in indices {
            if index >= updated.questions.len() {
                continue;
            }
            match replacements.next() {
                Some(question) => updated.questions[index] = question,
                None => break,
            }
        }

        validation::validate_quiz(&updated, &QuizRules::MANUAL)?;
        *quiz = updated;
        Ok(())
    }

    pub fn invite_student(quiz: &mut Quiz, student: Uuid) {
        if !quiz.invited_students.contains(&student) {
            quiz.invited_students.push(student);
        }
    }

    pub fn record_attempt(quiz: &mut Quiz, attempt: Attempt) {
        quiz.attempts.push(attempt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, Level, QuestionType};
    use chrono::Utc;

    fn question(text: &str, correct: &str) -> Question {
        Question::new(
            text,
            vec!["A".into(), "B".into(), "C".into(), "D".into()],
            vec![correct.into()],
            QuestionType::Single,
        )
    }

    fn create_payload() -> CreateQuizPayload {
        CreateQuizPayload {
            title: "Chemistry Basics".to_string(),
            difficulty: Difficulty::Easy,
            level: Level::School,
            questions: vec![question("What is H2O?", "A"), question("What is NaCl?", "B")],
            time_limit: 0,
        }
    }

    #[test]
    fn manual_creation_sets_method_and_validates() {
        let quiz = QuizService::create_manual_quiz(create_payload()).unwrap();
        assert_eq!(quiz.created_by, GenerationMethod::Manual);
        assert_eq!(quiz.question_count(), 2);
        assert!(quiz.is_active);
    }

    #[test]
    fn manual_creation_rejects_bad_question() {
        let mut payload = create_payload();
        payload.questions[1].correct_answers = vec!["Z".into()];
        let err = QuizService::create_manual_quiz(payload).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Question 2 has a correct answer \"Z\" that is not in the options"
        );
    }

    #[test]
    fn update_merges_only_present_fields() {
        let mut quiz = QuizService::create_manual_quiz(create_payload()).unwrap();
        QuizService::apply_update(
            &mut quiz,
            UpdateQuizPayload {
                title: Some("Chemistry 101".to_string()),
                time_limit: Some(30),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(quiz.title, "Chemistry 101");
        assert_eq!(quiz.time_limit, 30);
        assert_eq!(quiz.difficulty, Difficulty::Easy);
        assert_eq!(quiz.question_count(), 2);
    }

    #[test]
    fn failed_update_leaves_quiz_untouched() {
        let mut quiz = QuizService::create_manual_quiz(create_payload()).unwrap();
        let err = QuizService::apply_update(
            &mut quiz,
            UpdateQuizPayload {
                questions: Some(vec![]),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(quiz.question_count(), 2);
    }

    #[test]
    fn replace_question_checks_bounds() {
        let mut quiz = QuizService::create_manual_quiz(create_payload()).unwrap();
        QuizService::replace_question(&mut quiz, 0, question("What is CO2?", "C")).unwrap();
        assert_eq!(quiz.questions[0].text, "What is CO2?");

        assert!(QuizService::replace_question(&mut quiz, 5, question("X?", "A")).is_err());
    }

    #[test]
    fn splice_pairs_replacements_with_indices_in_order() {
        let mut quiz = QuizService::create_manual_quiz(CreateQuizPayload {
            questions: vec![
                question("Q1?", "A"),
                question("Q2?", "B"),
                question("Q3?", "C"),
            ],
            ..create_payload()
        })
        .unwrap();

        QuizService::splice_regenerated(
            &mut quiz,
            &[0, 9, 2],
            vec![question("New Q1?", "D"), question("New Q3?", "D")],
        )
        .unwrap();

        assert_eq!(quiz.questions[0].text, "New Q1?");
        assert_eq!(quiz.questions[1].text, "Q2?");
        assert_eq!(quiz.questions[2].text, "New Q3?");
    }

    #[test]
    fn invitations_and_attempts_accumulate() {
        let mut quiz = QuizService::create_manual_quiz(create_payload()).unwrap();
        let student = Uuid::new_v4();
        QuizService::invite_student(&mut quiz, student);
        QuizService::invite_student(&mut quiz, student);
        assert_eq!(quiz.invited_students.len(), 1);

        QuizService::record_attempt(
            &mut quiz,
            Attempt {
                student,
                score: 8,
                max_score: 10,
                answers: vec![],
                completed_at: Utc::now(),
            },
        );
        assert_eq!(quiz.average_score(), 8.0);
    }
}
