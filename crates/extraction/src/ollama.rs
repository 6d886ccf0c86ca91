//! Ollama chat client.
//!
//! Sends one non-streaming `/api/chat` request per clause with the transfer
//! schema as the `format`, so the model is constrained to structured output.

use crate::candidate::CandidateBatch;
use crate::service::{ExtractionRequest, ExtractionService};
use async_trait::async_trait;
use ledger_core::config::ExtractionConfig;
use ledger_core::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    stream: bool,
    format: &'a Value,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_thread: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Client for a local Ollama server.
pub struct OllamaClient {
    http_client: reqwest::Client,
    chat_url: String,
    model: String,
    temperature: f32,
    num_thread: Option<u32>,
    seed: Option<u64>,
}

impl OllamaClient {
    /// Create a client. Fails only if the HTTP client cannot be built.
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::service(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            chat_url: format!("{}/api/chat", config.endpoint.trim_end_matches('/')),
            model: config.model.clone(),
            temperature: config.temperature,
            num_thread: config.num_thread,
            seed: config.seed,
        })
    }

    /// Configured model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_request<'a>(&'a self, request: &'a ExtractionRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage { role: "system", content: request.system },
                ChatMessage { role: "user", content: &request.user },
            ],
            stream: false,
            format: &request.schema,
            options: ChatOptions {
                temperature: self.temperature,
                num_thread: self.num_thread,
                seed: self.seed,
            },
        }
    }
}

#[async_trait]
impl ExtractionService for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn extract(&self, request: &ExtractionRequest) -> Result<CandidateBatch> {
        debug!(model = %self.model, clause = %request.clause, "Sending chat request");

        let response = self
            .http_client
            .post(&self.chat_url)
            .json(&self.chat_request(request))
            .send()
            .await
            .map_err(|e| Error::service(format!("request to {} failed: {e}", self.chat_url)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::service(format!("HTTP {}: {}", status.as_u16(), body.trim())));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::service(format!("unreadable chat response: {e}")))?;

        CandidateBatch::from_json(&chat.message.content)
    }
}
