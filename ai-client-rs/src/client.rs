//! The chat completion client itself.

use std::time::Duration;

use backoff::backoff::Backoff;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use rand::Rng;
use reqwest::Client;

use crate::error::AiError;
use crate::models::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

/// Sampling temperature for analysis calls. Kept low: the tools expect
/// structured JSON back, not creative writing.
const ANALYSIS_TEMPERATURE: f32 = 0.3;
/// Output budget per completion.
const ANALYSIS_MAX_TOKENS: u32 = 4000;

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_INITIAL_RETRY_DELAY_MS: u64 = 1000;
const DEFAULT_MAX_RETRY_DELAY_MS: u64 = 30000;

/// Client for an OpenAI-compatible chat completions API.
#[derive(Debug, Clone)]
pub struct AiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_retries: u32,
    initial_retry_delay_ms: u64,
    max_retry_delay_ms: u64,
}

impl AiClient {
    pub fn builder() -> AiClientBuilder {
        AiClientBuilder::default()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Run one analysis: a fixed system prompt plus a user prompt carrying
    /// the source text. Retries transient failures with exponential backoff
    /// and returns the completion text.
    pub async fn analyze(&self, system_prompt: &str, user_prompt: &str) -> Result<String, AiError> {
        let request_body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(system_prompt),
                ChatMessage::user(user_prompt),
            ],
            temperature: Some(ANALYSIS_TEMPERATURE),
            max_tokens: Some(ANALYSIS_MAX_TOKENS),
        };

        let mut backoff = self.create_backoff();
        let mut attempt = 0;

        loop {
            attempt += 1;
            if attempt > 1 {
                log::info!("Retry attempt {} for LLM request", attempt);
            }

            match self.execute_request(&request_body).await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    if !err.is_retryable() || attempt > self.max_retries {
                        log::error!("LLM request failed after {} attempts: {}", attempt, err);
                        return Err(err);
                    }

                    match backoff.next_backoff() {
                        Some(delay) => {
                            log::warn!("Retryable error: {}. Retrying in {:?}", err, delay);
                            // Jitter keeps concurrent jobs from retrying in lockstep.
                            let jitter = rand::thread_rng().gen_range(0..=200);
                            tokio::time::sleep(delay + Duration::from_millis(jitter)).await;
                        }
                        None => {
                            log::error!("Exceeded maximum backoff time: {}", err);
                            return Err(err);
                        }
                    }
                }
            }
        }
    }

    fn create_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(Duration::from_millis(self.initial_retry_delay_ms))
            .with_max_interval(Duration::from_millis(self.max_retry_delay_ms))
            .with_multiplier(2.0)
            .with_max_elapsed_time(Some(Duration::from_secs(120)))
            .with_randomization_factor(0.5)
            .build()
    }

    async fn execute_request(
        &self,
        request_body: &ChatCompletionRequest,
    ) -> Result<String, AiError> {
        if self.api_key.is_empty() {
            return Err(AiError::InvalidRequest("API key is not set".to_string()));
        }

        let url = format!("{}/chat/completions", self.base_url);
        log::debug!("Sending LLM request to {} (model: {})", url, self.model);

        let response = match self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request_body)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(err) => {
                return if err.is_timeout() {
                    Err(AiError::Network(format!("Request timed out: {}", err)))
                } else if err.is_connect() {
                    Err(AiError::Network(format!("Connection failed: {}", err)))
                } else {
                    Err(AiError::Network(format!("Network error: {}", err)))
                };
            }
        };

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return match status.as_u16() {
                400 => Err(AiError::InvalidRequest(format!("Bad request: {}", text))),
                401 => Err(AiError::InvalidRequest(format!("Unauthorized: {}", text))),
                403 => Err(AiError::InvalidRequest(format!("Forbidden: {}", text))),
                404 => Err(AiError::InvalidRequest(format!("Not found: {}", text))),
                429 => Err(AiError::RateLimited(text)),
                500 | 502 | 503 | 504 => Err(AiError::Server(format!(
                    "Server error ({}): {}",
                    status, text
                ))),
                _ => Err(AiError::Unknown(format!(
                    "Unknown error ({}): {}",
                    status, text
                ))),
            };
        }

        let data: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| AiError::Parse(format!("Failed to parse response: {}", err)))?;

        match data.choices.first() {
            Some(choice) => {
                if let Some(usage) = &data.usage {
                    log::info!("LLM request completed. Used {} tokens", usage.total_tokens);
                }
                Ok(choice.message.content.clone())
            }
            None => Err(AiError::Parse(
                "No choices returned in response".to_string(),
            )),
        }
    }
}

/// Builder for `AiClient`. `api_key` and `model` have no useful defaults and
/// should come from configuration.
#[derive(Debug, Default)]
pub struct AiClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
    max_retries: Option<u32>,
    initial_retry_delay_ms: Option<u64>,
    max_retry_delay_ms: Option<u64>,
}

impl AiClientBuilder {
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = Some(seconds);
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    pub fn retry_delays(mut self, initial_ms: u64, max_ms: u64) -> Self {
        self.initial_retry_delay_ms = Some(initial_ms);
        self.max_retry_delay_ms = Some(max_ms);
        self
    }

    pub fn build(self) -> Result<AiClient, AiError> {
        let timeout = Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AiError::Unknown(format!("Failed to build HTTP client: {}", err)))?;

        Ok(AiClient {
            client,
            api_key: self.api_key.unwrap_or_default(),
            base_url: self
                .base_url
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            model: self.model.unwrap_or_else(|| "gpt-4-turbo-preview".to_string()),
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            initial_retry_delay_ms: self
                .initial_retry_delay_ms
                .unwrap_or(DEFAULT_INITIAL_RETRY_DELAY_MS),
            max_retry_delay_ms: self.max_retry_delay_ms.unwrap_or(DEFAULT_MAX_RETRY_DELAY_MS),
        })
    }
}
