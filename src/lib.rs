pub mod config;
pub mod dto;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use error::{Error, Result};
pub use models::{Difficulty, GenerationMethod, Level, Question, QuestionType, Quiz};
pub use services::ai_service::{AiService, VerificationResult};
pub use services::gemini_client::{GeminiClient, GenerationOptions, GenerativeModel};
pub use services::quiz_service::QuizService;
