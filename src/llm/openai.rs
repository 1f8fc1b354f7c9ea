//! OpenAI-compatible chat completions backend
//!
//! Works against api.openai.com or any local server speaking the same
//! protocol (LM Studio, llama.cpp, vLLM). The model and endpoint come from
//! [`LlmConfig`]; the API key is supplied by the caller.

use super::GenerationBackend;
use crate::config::LlmConfig;
use crate::resolver::RawOutput;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

pub struct OpenAiBackend {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl OpenAiBackend {
    pub fn new(config: &LlmConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl GenerationBackend for OpenAiBackend {
    async fn generate(&self, prompt: &str) -> Result<RawOutput> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
            temperature: 0.3,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Chat completion request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Chat completion returned {status}: {body}"));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .context("Chat completion response body was not valid JSON")?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("Chat completion response contained no choices"))?;

        tracing::debug!(
            model = %self.model,
            chars = content.len(),
            "chat completion received"
        );

        Ok(RawOutput::Text(content))
    }

    fn backend_name(&self) -> &'static str {
        "openai-chat"
    }
}
