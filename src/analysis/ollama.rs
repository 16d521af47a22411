//! Ollama chat-completion analyzer.
//!
//! Sends one non-streaming `POST /api/chat` per analysis with the fixed
//! system instruction and the templated user prompt.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{user_prompt, AnalysisError, Analyzer, SYSTEM_PROMPT};
use crate::config::AnalysisConfig;

pub struct OllamaAnalyzer {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaAnalyzer {
    pub fn new(config: &AnalysisConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            stream: false,
        }
    }
}

#[async_trait]
impl Analyzer for OllamaAnalyzer {
    async fn analyze(&self, text: &str) -> Result<String, AnalysisError> {
        let prompt = user_prompt(text);
        let payload = serde_json::to_vec(&self.request_body(&prompt))
            .map_err(|e| AnalysisError::Request(format!("failed to serialize request: {e}")))?;

        let url = self.chat_url();
        tracing::debug!(url = %url, model = %self.model, text_len = text.len(), "sending analysis request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| AnalysisError::Request(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AnalysisError::Request(format!("error reading response: {e}")))?;

        if !status.is_success() {
            return Err(AnalysisError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        let reply: ChatResponse =
            serde_json::from_slice(&bytes).map_err(|e| AnalysisError::Decode(e.to_string()))?;

        tracing::info!(model = %self.model, response_len = reply.message.content.len(), "analysis received");
        Ok(reply.message.content)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatReplyMessage,
}

#[derive(Deserialize)]
struct ChatReplyMessage {
    content: String,
}
