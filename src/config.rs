use std::env;

/// Runtime configuration for the AI description service.
///
/// Every key has a default so the engine can run without any environment at
/// all; `.env` values take precedence when present.
#[derive(Debug, Clone)]
pub struct Config {
    pub ai_local_endpoint: String,
    pub ai_remote_endpoint: String,
    pub ai_use_local: bool,
    pub ai_model: String,
    pub ai_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        let ai_use_local = env::var("AI_USE_LOCAL")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        Self {
            ai_local_endpoint: env::var("AI_LOCAL_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:9000".to_string()),
            ai_remote_endpoint: env::var("AI_REMOTE_ENDPOINT")
                .unwrap_or_else(|_| "https://ai.example.com".to_string()),
            ai_use_local,
            ai_model: env::var("AI_MODEL")
                .unwrap_or_else(|_| "gemini-3-flash-preview".to_string()),
            ai_api_key: env::var("AI_API_KEY").ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ai_local_endpoint: "http://localhost:9000".to_string(),
            ai_remote_endpoint: "https://ai.example.com".to_string(),
            ai_use_local: true,
            ai_model: "gemini-3-flash-preview".to_string(),
            ai_api_key: None,
        }
    }
}
