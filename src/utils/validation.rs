use crate::error::{Error, Result};
use crate::models::{Question, QuestionType, Quiz};
use validator::Validate;

/// Minimum correct answers for a multiple-choice question. The relaxed
/// policy (1-4 correct) applies uniformly to every path that validates
/// questions.
pub const MULTIPLE_MIN_CORRECT: usize = 1;

pub const MAX_TITLE_LEN: usize = 200;

#[derive(Debug, Clone, Copy)]
pub enum OptionsRule {
    Exactly(usize),
    AtLeast(usize),
}

/// Per-origin structural rules. AI-generated questions must have exactly
/// 4 options; manually authored ones only need 2.
#[derive(Debug, Clone, Copy)]
pub struct QuizRules {
    pub options: OptionsRule,
}

impl QuizRules {
    pub const AI_GENERATED: QuizRules = QuizRules {
        options: OptionsRule::Exactly(4),
    };
    pub const MANUAL: QuizRules = QuizRules {
        options: OptionsRule::AtLeast(2),
    };
}

pub fn validate_payload<T: Validate>(val: &T) -> Result<()> {
    val.validate().map_err(Error::from)
}

/// Enforce the quiz invariants on any quiz regardless of origin. Fails
/// fast on the first violation, naming the 1-based question index.
pub fn validate_quiz(quiz: &Quiz, rules: &QuizRules) -> Result<()> {
    if quiz.title.trim().is_empty() {
        return Err(Error::Validation("Quiz title is required".to_string()));
    }
    if quiz.title.chars().count() > MAX_TITLE_LEN {
        return Err(Error::Validation(format!(
            "A quiz title must have less than {} characters",
            MAX_TITLE_LEN
        )));
    }
    if quiz.questions.is_empty() {
        return Err(Error::Validation(
            "A quiz must have at least one question".to_string(),
        ));
    }
    for (index, question) in quiz.questions.iter().enumerate() {
        validate_question(index, question, rules)?;
    }
    Ok(())
}

pub fn validate_question(index: usize, question: &Question, rules: &QuizRules) -> Result<()> {
    let number = index + 1;

    if question.text.trim().is_empty() {
        return Err(Error::Validation(format!(
            "Question {} is missing text",
            number
        )));
    }

    match rules.options {
        OptionsRule::Exactly(count) if question.options.len() != count => {
            return Err(Error::Validation(format!(
                "Question {} must have exactly {} options",
                number, count
            )));
        }
        OptionsRule::AtLeast(count) if question.options.len() < count => {
            return Err(Error::Validation(format!(
                "Question {} must have at least {} options",
                number, count
            )));
        }
        _ => {}
    }

    if question.correct_answers.is_empty() {
        return Err(Error::Validation(format!(
            "Question {} must have at least one correct answer",
            number
        )));
    }

    match question.question_type {
        QuestionType::Single if question.correct_answers.len() != 1 => {
            return Err(Error::Validation(format!(
                "Question {} is marked as single-choice but has {} correct answers",
                number,
                question.correct_answers.len()
            )));
        }
        QuestionType::Multiple if question.correct_answers.len() < MULTIPLE_MIN_CORRECT => {
            return Err(Error::Validation(format!(
                "Question {} must have at least {} correct answers",
                number, MULTIPLE_MIN_CORRECT
            )));
        }
        _ => {}
    }

    for answer in &question.correct_answers {
        if !question.options.contains(answer) {
            return Err(Error::Validation(format!(
                "Question {} has a correct answer \"{}\" that is not in the options",
                number, answer
            )));
        }
    }

    Ok(())
}
