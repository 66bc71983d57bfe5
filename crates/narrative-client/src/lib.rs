mod error;
mod provider;
mod summary;

pub use error::{NarrativeError, NarrativeResult};
pub use provider::NarrativeProvider;
pub use summary::LocalSummaryProvider;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connection settings for an OpenAI-compatible chat-completions endpoint
/// (hosted API, LM Studio, vLLM, llama.cpp server).
#[derive(Debug, Clone)]
pub struct NarrativeConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl NarrativeConfig {
    /// Build from `OPENAI_API_BASE` / `OPENAI_API_KEY` / `OPENAI_MODEL`.
    /// Returns `None` when no key is present, which disables the remote
    /// narrative provider for the run.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|s| !s.is_empty())?;
        let api_base = std::env::var("OPENAI_API_BASE")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string());
        let model = std::env::var("OPENAI_MODEL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "gpt-4o-mini".to_string());

        Some(Self {
            api_base,
            api_key,
            model,
            timeout: Duration::from_secs(60),
        })
    }
}

#[derive(Clone)]
pub struct NarrativeClient {
    client: reqwest::Client,
    config: NarrativeConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: String,
}

impl NarrativeClient {
    pub fn new(config: NarrativeConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, config }
    }

    /// One chat completion, returning the assistant text with surrounding
    /// whitespace stripped.
    pub async fn complete(&self, system: &str, user: &str) -> NarrativeResult<String> {
        let url = format!("{}/chat/completions", self.config.api_base.trim_end_matches('/'));
        tracing::debug!(model = %self.config.model, "requesting chat completion");
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.4,
            max_tokens: 400,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NarrativeError::InvalidResponse(format!(
                "HTTP {status}: {body}"
            )));
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| NarrativeError::InvalidResponse("no choices in completion".into()))?;

        let content = content.trim();
        if content.is_empty() {
            return Err(NarrativeError::InvalidResponse("empty completion".into()));
        }
        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_response_deserializes() {
        let raw = r#"{
            "id": "cmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "Markets closed higher." } }
            ]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content, "Markets closed higher.");
    }

    #[test]
    fn config_absent_without_api_key() {
        // Only meaningful when the variable is not set in the environment;
        // guard rather than mutate global process state.
        if std::env::var("OPENAI_API_KEY").is_err() {
            assert!(NarrativeConfig::from_env().is_none());
        }
    }
}
