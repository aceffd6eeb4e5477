pub mod prompts;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::error::EngineError;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: ChatContent,
}

#[derive(Debug, Default, Deserialize)]
struct ChatContent {
    #[serde(default)]
    content: String,
}

/// Client for an OpenAI-compatible chat-completions gateway.
///
/// Holds a single reqwest client; callers pass the prompt pair per
/// request. Only HTTP 429 is retried, everything else surfaces on the
/// first attempt so handlers can degrade deliberately.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_attempts: u32,
}

impl InferenceClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout_ms: u64,
        max_attempts: u32,
        user_agent: &str,
    ) -> Result<Self, EngineError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            max_attempts: max_attempts.max(1),
        })
    }

    /// Send one system/user prompt pair and return the raw assistant text.
    pub async fn infer(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: Option<f64>,
        max_tokens: Option<u32>,
    ) -> Result<String, EngineError> {
        let endpoint = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system_prompt },
                ChatMessage { role: "user", content: user_prompt },
            ],
            temperature,
            max_tokens,
        };

        let mut attempt: u32 = 1;
        loop {
            debug!(model = %self.model, attempt, "chat completion request");
            let resp = self
                .http
                .post(&endpoint)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await?;

            let status = resp.status();
            if status.as_u16() == 429 {
                if attempt < self.max_attempts {
                    let backoff = Duration::from_millis(500 * u64::from(attempt));
                    warn!(attempt, backoff_ms = backoff.as_millis() as u64,
                        "upstream rate limited, backing off");
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                    continue;
                }
                return Err(EngineError::UpstreamRateLimited);
            }
            if !status.is_success() {
                let detail = resp.text().await.unwrap_or_default();
                warn!(status = status.as_u16(), "upstream returned error");
                return Err(EngineError::UpstreamUnavailable(format!(
                    "status {}: {}",
                    status.as_u16(),
                    detail.chars().take(200).collect::<String>()
                )));
            }

            let parsed: ChatResponse = resp.json().await?;
            let content = parsed
                .choices
                .into_iter()
                .next()
                .map(|c| c.message.content)
                .unwrap_or_default();
            if content.trim().is_empty() {
                return Err(EngineError::UpstreamUnavailable(
                    "empty completion".to_string(),
                ));
            }
            return Ok(content);
        }
    }
}
