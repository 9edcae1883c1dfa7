//! Environment-driven configuration for the Code Assist services.
//!
//! Every setting has a sensible default so the service starts in development
//! without a .env file; the API keys are the only values that genuinely need
//! to be provided.
//!
//! Recognized variables:
//! - PORT: HTTP listen port (default 5000)
//! - OPENAI_API_KEY: key for the LLM provider
//! - OPENAI_API_URL: base URL of the OpenAI-compatible API
//! - OPENAI_MODEL: chat model to use (default "gpt-4-turbo-preview")
//! - GITHUB_TOKEN: fallback token when a request carries none
//! - GITHUB_API_URL: GitHub REST base URL (override for testing/GHE)

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4-turbo-preview";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Resolved service settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub openai_api_key: String,
    pub openai_api_url: String,
    pub openai_model: String,
    /// Used when an export/create-pr request does not carry its own token.
    pub github_token: Option<String>,
    pub github_api_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            openai_api_key: String::new(),
            openai_api_url: DEFAULT_OPENAI_API_URL.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            github_token: None,
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
        }
    }
}

impl Settings {
    /// Build settings from the process environment, falling back to defaults.
    pub fn from_env() -> Self {
        let settings = Self {
            port: env_or("PORT", DEFAULT_PORT),
            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            openai_api_url: env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_API_URL.to_string()),
            openai_model: env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.to_string()),
            github_token: env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
            github_api_url: env::var("GITHUB_API_URL")
                .unwrap_or_else(|_| DEFAULT_GITHUB_API_URL.to_string()),
        };

        if settings.openai_api_key.is_empty() {
            log::warn!("OPENAI_API_KEY is not set; analysis calls will fail");
        }
        if settings.github_token.is_none() {
            log::warn!("GITHUB_TOKEN is not set; export requests must carry their own token");
        }

        settings
    }

    /// Address the API service binds to.
    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

/// Read an environment variable, parsing it into T with a default fallback.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.parse::<T>().unwrap_or_else(|_| {
            log::warn!("Invalid value in {}, using default", name);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_env() {
        let settings = Settings::default();
        assert_eq!(settings.port, 5000);
        assert_eq!(settings.openai_api_url, "https://api.openai.com/v1");
        assert_eq!(settings.openai_model, "gpt-4-turbo-preview");
        assert_eq!(settings.github_api_url, "https://api.github.com");
        assert!(settings.github_token.is_none());
    }

    #[test]
    fn bind_address_uses_port() {
        let settings = Settings {
            port: 8123,
            ..Settings::default()
        };
        assert_eq!(settings.bind_address().to_string(), "0.0.0.0:8123");
    }

    #[test]
    fn env_or_falls_back_on_garbage() {
        env::set_var("ASSIST_TEST_PORT_GARBAGE", "not-a-port");
        let port: u16 = env_or("ASSIST_TEST_PORT_GARBAGE", 4321);
        assert_eq!(port, 4321);
        env::remove_var("ASSIST_TEST_PORT_GARBAGE");
    }

    #[test]
    fn from_env_reads_overrides() {
        env::set_var("PORT", "9000");
        env::set_var("OPENAI_MODEL", "gpt-4o-mini");
        env::set_var("GITHUB_TOKEN", "ghp_test");
        let settings = Settings::from_env();
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.openai_model, "gpt-4o-mini");
        assert_eq!(settings.github_token.as_deref(), Some("ghp_test"));
        env::remove_var("PORT");
        env::remove_var("OPENAI_MODEL");
        env::remove_var("GITHUB_TOKEN");
    }
}
