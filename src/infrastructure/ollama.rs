//! Ollama client - `LlmPort` over an OpenAI-compatible chat-completions API

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::application::ports::outbound::{
    FinishReason, LlmPort, LlmRequest, LlmResponse, TokenUsage,
};

#[derive(Debug, thiserror::Error)]
pub enum OllamaError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Client for one model on an OpenAI-compatible endpoint
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    fn build_body(&self, request: &LlmRequest) -> Value {
        let mut messages = Vec::new();
        if let Some(system) = &request.system_prompt {
            messages.push(json!({ "role": "system", "content": system }));
        }
        for message in &request.messages {
            messages.push(json!({
                "role": message.role.as_str(),
                "content": message.content
            }));
        }

        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "stream": false
        });
        if let Some(temperature) = request.temperature {
            body["temperature"] = json!(temperature);
        }
        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if request.json_mode {
            body["response_format"] = json!({ "type": "json_object" });
        }
        body
    }
}

/// Pull content, finish reason and usage out of a chat-completions reply
fn parse_completion(json: &Value) -> Result<LlmResponse, OllamaError> {
    let choice = json["choices"]
        .as_array()
        .and_then(|choices| choices.first())
        .ok_or_else(|| OllamaError::InvalidResponse("No choices in response".to_string()))?;

    let content = choice["message"]["content"]
        .as_str()
        .ok_or_else(|| OllamaError::InvalidResponse("Missing content".to_string()))?
        .to_string();

    let usage = json["usage"].as_object().map(|u| TokenUsage {
        prompt_tokens: u.get("prompt_tokens").and_then(Value::as_u64).unwrap_or(0) as u32,
        completion_tokens: u.get("completion_tokens").and_then(Value::as_u64).unwrap_or(0) as u32,
        total_tokens: u.get("total_tokens").and_then(Value::as_u64).unwrap_or(0) as u32,
    });

    Ok(LlmResponse {
        content,
        finish_reason: choice["finish_reason"].as_str().map(FinishReason::parse),
        usage,
    })
}

#[async_trait]
impl LlmPort for OllamaClient {
    type Error = OllamaError;

    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, Self::Error> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.build_body(&request);

        tracing::debug!(model = %self.model, json_mode = request.json_mode, "Sending chat completion");
        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OllamaError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let json: Value = response.json().await?;
        parse_completion(&json)
    }

    async fn health_check(&self) -> Result<(), Self::Error> {
        let url = format!("{}/models", self.base_url);
        let response = self.client.get(&url).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(OllamaError::Api {
                status: response.status().as_u16(),
                message: "health check failed".to_string(),
            })
        }
    }
}
