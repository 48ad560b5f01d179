use crate::domain::model::ExplanationPrompt;
use crate::domain::ports::ExplanationProvider;
use crate::utils::error::{AffordError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_url, Validate,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for an OpenAI-compatible chat-completions endpoint
/// (OpenAI, Ollama, LM Studio, vLLM, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionsConfig {
    /// Base URL, e.g. "http://localhost:11434/v1"
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: Option<usize>,
    pub timeout_secs: u64,
    pub max_retries: u32,
    /// First backoff delay; doubles on every retry.
    pub retry_delay_ms: u64,
}

impl Default for ChatCompletionsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".to_string(),
            model: "llama3.1".to_string(),
            api_key: None,
            temperature: 0.1,
            max_tokens: Some(1024),
            timeout_secs: 60,
            max_retries: 2,
            retry_delay_ms: 500,
        }
    }
}

impl Validate for ChatCompletionsConfig {
    fn validate(&self) -> Result<()> {
        validate_url("llm.endpoint", &self.base_url)?;
        validate_non_empty_string("llm.model", &self.model)?;
        validate_range("llm.temperature", self.temperature, 0.0, 2.0)?;
        if let Some(max_tokens) = self.max_tokens {
            validate_positive_number("llm.max_tokens", max_tokens, 1)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionsRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct ChatCompletionsExplainer {
    config: ChatCompletionsConfig,
    client: Client,
}

impl ChatCompletionsExplainer {
    pub fn new(config: ChatCompletionsConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ChatCompletionsConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn try_request(&self, prompt: &ExplanationPrompt) -> Result<String> {
        let request = ChatCompletionsRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user_message,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let mut builder = self.client.post(self.endpoint()).json(&request);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key);
        }

        tracing::debug!("Sending explanation request to: {}", self.endpoint());
        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!("LLM response status: {}", status);

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AffordError::ExplanationError {
                message: format!("{} returned {}: {}", self.config.model, status, body),
            });
        }

        let parsed: ChatCompletionsResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| AffordError::ExplanationError {
                message: "response contained no message content".to_string(),
            })
    }
}

#[async_trait]
impl ExplanationProvider for ChatCompletionsExplainer {
    async fn explain(&self, prompt: &ExplanationPrompt) -> Result<String> {
        let mut attempt = 0;
        loop {
            match self.try_request(prompt).await {
                Ok(text) => return Ok(text),
                Err(e) if attempt < self.config.max_retries => {
                    // 指數退避：delay, 2*delay, 4*delay ...
                    let delay = Duration::from_millis(
                        self.config.retry_delay_ms.saturating_mul(1u64 << attempt.min(16)),
                    );
                    attempt += 1;
                    tracing::warn!(
                        "🔁 Explanation request failed (attempt {}/{}): {}. Retrying in {:?}",
                        attempt,
                        self.config.max_retries + 1,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
