use std::env;

/// Runtime configuration, read from the environment once at startup and
/// passed explicitly into the clients that need it. Concurrent builds with
/// different providers stay safe because nothing here is process-global.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub readwise_token: Option<String>,
    pub kindle_email: Option<String>,
    pub resend_api_key: Option<String>,
    pub from_email: String,
    pub groq_api_key: Option<String>,
    pub groq_model: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            readwise_token: env::var("READWISE_API_TOKEN").ok(),
            kindle_email: env::var("KINDLE_EMAIL").ok(),
            resend_api_key: env::var("RESEND_API_KEY").ok(),
            from_email: env::var("FROM_EMAIL")
                .unwrap_or_else(|_| "onboarding@resend.dev".to_string()),
            groq_api_key: env::var("GROQ_API_KEY").ok(),
            groq_model: env::var("GROQ_MODEL")
                .unwrap_or_else(|_| "llama-3.1-8b-instant".to_string()),
        }
    }
}
