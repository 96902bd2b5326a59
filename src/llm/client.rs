//! OpenAI-compatible LLM client.
//!
//! This client works with any OpenAI-compatible API endpoint and covers
//! the two calls the harness needs: chat completions (judging and metric
//! scoring) and batched text embeddings.

use crate::config::{EmbeddingConfig, LlmConfig};
use crate::error::{EvalError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Message role in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A message in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
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

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Options for a single chat call.
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    /// Override the configured model (the judge uses its own).
    pub model: Option<String>,
    /// Request strict JSON output from the API.
    pub json: bool,
}

/// Request body for chat completion.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

/// Response from chat completion.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// Request body for embeddings.
#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: String,
    input: &'a [String],
}

/// Response from the embeddings endpoint.
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// OpenAI API error response.
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    #[allow(dead_code)]
    error_type: Option<String>,
}

/// Response from an LLM call including metadata.
#[derive(Debug)]
pub struct LlmResponse {
    /// The generated content.
    pub content: String,
    /// Reason the model stopped generating.
    pub finish_reason: Option<String>,
    /// Token usage (if available).
    pub usage: Option<TokenUsage>,
}

#[derive(Debug)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// OpenAI-compatible LLM client.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    config: LlmConfig,
    embedding: EmbeddingConfig,
}

impl LlmClient {
    /// Create a new LLM client with the given configuration.
    pub fn new(config: LlmConfig, embedding: EmbeddingConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            embedding,
        }
    }

    /// Get the chat completion endpoint URL.
    fn chat_endpoint(&self) -> String {
        let base = self.config.api_base.trim_end_matches('/');
        format!("{}/v1/chat/completions", base)
    }

    /// Get the embeddings endpoint URL.
    fn embeddings_endpoint(&self) -> String {
        let base = self.config.api_base.trim_end_matches('/');
        format!("{}/v1/embeddings", base)
    }

    /// Send a chat completion request.
    pub async fn chat(&self, messages: Vec<Message>, opts: ChatOptions) -> Result<LlmResponse> {
        let request = ChatCompletionRequest {
            model: opts.model.unwrap_or_else(|| self.config.model.clone()),
            messages,
            max_tokens: Some(self.config.max_tokens),
            temperature: Some(self.config.temperature),
            response_format: opts.json.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let body = self.post_json(&self.chat_endpoint(), &request).await?;

        let completion: ChatCompletionResponse = serde_json::from_str(&body)?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| EvalError::LlmApi("No choices in response".to_string()))?;

        Ok(LlmResponse {
            content: choice.message.content,
            finish_reason: choice.finish_reason,
            usage: completion.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        })
    }

    /// Convenience method: single user message with optional system prompt.
    pub async fn complete(&self, system: Option<&str>, user: &str) -> Result<String> {
        let response = self
            .chat(Self::build_messages(system, user), ChatOptions::default())
            .await?;
        Ok(response.content)
    }

    /// Like [`complete`](Self::complete) but with strict JSON output requested.
    pub async fn complete_json(&self, system: Option<&str>, user: &str) -> Result<String> {
        let response = self
            .chat(
                Self::build_messages(system, user),
                ChatOptions {
                    model: None,
                    json: true,
                },
            )
            .await?;
        Ok(response.content)
    }

    /// Generate embeddings for a batch of texts.
    pub async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: self.embedding.model.clone(),
            input: inputs,
        };

        let body = self.post_json(&self.embeddings_endpoint(), &request).await?;
        let response: EmbeddingResponse = serde_json::from_str(&body)?;

        Ok(response.data.into_iter().map(|d| d.embedding).collect())
    }

    /// POST a JSON body and return the raw response text, surfacing API errors.
    async fn post_json<T: Serialize>(&self, endpoint: &str, request: &T) -> Result<String> {
        let response = self
            .client
            .post(endpoint)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Try to parse as API error
            if let Ok(api_error) = serde_json::from_str::<ApiError>(&body) {
                return Err(EvalError::LlmApi(format!(
                    "API error ({}): {}",
                    status, api_error.error.message
                )));
            }
            return Err(EvalError::LlmApi(format!(
                "Request failed ({}): {}",
                status, body
            )));
        }

        Ok(body)
    }

    fn build_messages(system: Option<&str>, user: &str) -> Vec<Message> {
        let mut messages = Vec::new();

        if let Some(sys) = system {
            messages.push(Message::system(sys));
        }
        messages.push(Message::user(user));
        messages
    }

    /// Test connectivity to the API.
    pub async fn test_connection(&self) -> Result<()> {
        let messages = vec![Message::user("Say 'hello' and nothing else.")];

        let response = self.chat(messages, ChatOptions::default()).await?;

        if response.content.to_lowercase().contains("hello") {
            Ok(())
        } else {
            Err(EvalError::LlmApi(format!(
                "Unexpected response: {}",
                response.content
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(api_base: &str) -> LlmClient {
        let config = LlmConfig {
            api_base: api_base.to_string(),
            api_key: "test".to_string(),
            ..Default::default()
        };
        LlmClient::new(config, EmbeddingConfig::default())
    }

    #[test]
    fn test_message_creation() {
        let sys = Message::system("You are helpful.");
        let user = Message::user("Hello!");
        let assistant = Message::assistant("Hi there!");

        assert!(matches!(sys.role, Role::System));
        assert!(matches!(user.role, Role::User));
        assert!(matches!(assistant.role, Role::Assistant));
    }

    #[test]
    fn test_endpoint_construction() {
        let client = test_client("https://api.example.com/");
        assert_eq!(
            client.chat_endpoint(),
            "https://api.example.com/v1/chat/completions"
        );
        assert_eq!(
            client.embeddings_endpoint(),
            "https://api.example.com/v1/embeddings"
        );

        // Without trailing slash
        let client2 = test_client("https://api.example.com");
        assert_eq!(
            client2.chat_endpoint(),
            "https://api.example.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_json_response_format_serialization() {
        let request = ChatCompletionRequest {
            model: "gpt-4o".to_string(),
            messages: vec![Message::user("hi")],
            max_tokens: None,
            temperature: None,
            response_format: Some(ResponseFormat {
                format_type: "json_object",
            }),
        };
        let body = serde_json::to_string(&request).unwrap();
        assert!(body.contains(r#""response_format":{"type":"json_object"}"#));

        let plain = ChatCompletionRequest {
            model: "gpt-4o".to_string(),
            messages: vec![Message::user("hi")],
            max_tokens: None,
            temperature: None,
            response_format: None,
        };
        let body = serde_json::to_string(&plain).unwrap();
        assert!(!body.contains("response_format"));
    }
}
