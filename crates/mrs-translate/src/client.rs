//! Chat-completion clients

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TranslationConfig;
use crate::{Error, Result};

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A model that answers a conversation with one message
#[allow(async_fn_in_trait)]
pub trait ChatClient {
    /// Send `messages` and return the trimmed content of the first choice.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] for transport or protocol failures.
    async fn complete(&self, messages: &[ChatMessage], temperature: f32) -> Result<String>;
}

/// Client for an OpenAI-compatible chat-completions endpoint
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    /// Build a client for `api_base` (for example `https://api.openai.com/v1`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the HTTP client cannot be constructed.
    pub fn new(
        api_base: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", api_base.trim_end_matches('/')),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Build a client from configuration, reading the key from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the API key variable is not set.
    pub fn from_config(config: &TranslationConfig) -> Result<Self> {
        Self::new(
            &config.api_base,
            config.api_key()?,
            config.model.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ChatClient for OpenAiClient {
    async fn complete(&self, messages: &[ChatMessage], temperature: f32) -> Result<String> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
            temperature,
        };
        debug!(endpoint = %self.endpoint, model = %self.model, messages = messages.len(), "Sending chat completion");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Api(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api(format!("{status}: {}", body.trim())));
        }

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Api(format!("invalid completion body: {e}")))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default().trim().to_string())
            .ok_or_else(|| Error::Api("completion contained no choices".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_without_double_slash() {
        let client =
            OpenAiClient::new("http://localhost:8080/v1/", "key", "gpt-4o", Duration::from_secs(5)).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn request_serializes_roles_in_lowercase() {
        let messages = [ChatMessage::system("s"), ChatMessage::user("u")];
        let request = CompletionRequest {
            model: "gpt-4o",
            messages: &messages,
            temperature: 0.0,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "u");
        assert_eq!(json["model"], "gpt-4o");
    }

    #[test]
    fn response_content_is_optional() {
        let body: CompletionResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#)
                .unwrap();
        assert_eq!(body.choices[0].message.content, None);
    }
}
