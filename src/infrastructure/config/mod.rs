use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub environment: Environment,
    pub log_format: LogFormat,
    // AI provider
    pub openai_api_key: String,
    pub ai_text_model: String,
    pub ai_image_model: String,
    // Email provider
    pub email_api_url: String,
    pub email_api_key: String,
    pub email_from: String,
    // Quotas
    pub quota_policy_cache_ttl_secs: u64,
    pub upstream_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            database_url: env::var("DATABASE_URL")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            jwt_secret: env::var("JWT_SECRET")?,
            environment: match env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .as_str()
            {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            openai_api_key: env::var("OPENAI_API_KEY")?,
            ai_text_model: env::var("AI_TEXT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            ai_image_model: env::var("AI_IMAGE_MODEL").unwrap_or_else(|_| "dall-e-3".to_string()),
            email_api_url: env::var("EMAIL_API_URL")
                .unwrap_or_else(|_| "https://api.resend.com".to_string()),
            email_api_key: env::var("EMAIL_API_KEY")?,
            email_from: env::var("EMAIL_FROM")?,
            quota_policy_cache_ttl_secs: env::var("QUOTA_POLICY_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
            upstream_timeout_secs: env::var("UPSTREAM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()?,
        };

        Ok(config)
    }

    pub fn policy_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.quota_policy_cache_ttl_secs)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}
