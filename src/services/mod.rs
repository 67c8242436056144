pub mod ai_service;
pub mod gemini_client;
pub mod quiz_service;
