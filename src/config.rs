use std::env;

use crate::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::summarizer::StrategyKind;

pub struct Config {
    pub host: String,
    pub port: u16,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub strategy: StrategyKind,
}

impl Config {
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT").ok().and_then(|s| s.parse().ok()).unwrap_or(8080);

        // An empty key is left for the provider to reject; there is no
        // startup-time credential check.
        let openai_api_key = env::var("OPENAI_API_KEY").unwrap_or_default();
        let openai_base_url =
            env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let openai_model = env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let strategy = env::var("SUMMARY_STRATEGY")
            .ok()
            .and_then(|s| StrategyKind::parse(&s))
            .unwrap_or(StrategyKind::Structured);

        Self {
            host,
            port,
            openai_api_key,
            openai_base_url,
            openai_model,
            strategy,
        }
    }
}
