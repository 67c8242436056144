use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_AI_QUESTIONS: usize = 20;

/// Explicit configuration for the generation service. Constructed once
/// and handed to service constructors; nothing reads ambient process
/// state after startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub request_timeout: Duration,
    pub max_ai_questions: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let gemini_api_key = env::var("GEMINI_API_KEY").map_err(|_| {
            Error::Config(
                "Gemini API key is not configured. Please set GEMINI_API_KEY in .env".to_string(),
            )
        })?;

        Ok(Self {
            gemini_api_key,
            gemini_model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            request_timeout: Duration::from_secs(
                get_env_parse_or("AI_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            ),
            max_ai_questions: get_env_parse_or("MAX_AI_QUESTIONS", DEFAULT_MAX_AI_QUESTIONS)?,
        })
    }

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            gemini_api_key: api_key.into(),
            gemini_model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_ai_questions: DEFAULT_MAX_AI_QUESTIONS,
        }
    }
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
    }
}
