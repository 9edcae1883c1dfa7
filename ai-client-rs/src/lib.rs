//! HTTP client for OpenAI-compatible chat completion APIs.
//!
//! This crate provides:
//! - Real HTTP calls to the LLM provider via reqwest
//! - Exponential backoff retry for transient failures
//! - Classification of retryable vs. non-retryable errors
//! - The `AnalysisPayload` sum type for parse-or-wrap handling of model output

mod analysis;
mod client;
mod error;
mod models;

pub use analysis::AnalysisPayload;
pub use client::{AiClient, AiClientBuilder};
pub use error::AiError;
pub use models::{ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Usage};

#[cfg(test)]
mod tests;
