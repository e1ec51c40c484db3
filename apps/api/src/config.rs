use anyhow::{Context, Result};

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.deepseek.com";

/// Origins allowed to call the sign endpoints when `ALLOWED_ORIGINS` is unset.
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "https://lucky.closeai.moe",
    "https://deepluck.closeai.moe",
    "http://127.0.0.1:8788",
    "http://localhost:8788",
];

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm_api_key: String,
    pub llm_base_url: String,
    pub allowed_origins: Vec<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            llm_api_key: require_env("DEEPSEEK_API_KEY")?,
            llm_base_url: std::env::var("DEEPSEEK_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_LLM_BASE_URL.to_string()),
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|raw| parse_origin_list(&raw))
                .filter(|list| !list.is_empty())
                .unwrap_or_else(default_allowed_origins),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8788".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

pub fn default_allowed_origins() -> Vec<String> {
    DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect()
}

/// Splits a comma-separated origin list. Trailing slashes are dropped so
/// entries compare equal to browser `Origin` headers.
pub fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origin_list_trims_and_skips_empty() {
        let parsed = parse_origin_list(" https://a.example , ,http://localhost:5173/,");
        assert_eq!(parsed, vec!["https://a.example", "http://localhost:5173"]);
    }

    #[test]
    fn test_parse_origin_list_empty_input() {
        assert!(parse_origin_list("").is_empty());
        assert!(parse_origin_list(" , ").is_empty());
    }

    #[test]
    fn test_default_allowed_origins_contains_production() {
        let defaults = default_allowed_origins();
        assert_eq!(defaults.len(), 4);
        assert!(defaults.contains(&"https://lucky.closeai.moe".to_string()));
    }
}
