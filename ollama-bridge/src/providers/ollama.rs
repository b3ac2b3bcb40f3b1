// ollama-bridge/src/providers/ollama.rs
use super::{ChatOptions, Provider};
use crate::config::{ContentField, OllamaConfig};
use crate::convert::{convert_request, convert_tool_call_values, ArgumentRewriter};
use crate::errors::{ConversionError, LlmError};
use crate::models::chat::{ChatCompletionResponse, ChatInput};
use crate::utils::for_log;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, trace, warn};

pub const CHAT_COMPLETION_ENDPOINT: &str = "/api/chat";

/// Talks to Ollama's native `/api/chat` endpoint.
#[derive(Clone, Debug)]
pub struct OllamaProvider {
    base_url: String,
    timeout: Duration,
    content_field: ContentField,
    rewriter: Arc<dyn ArgumentRewriter>,
    http_client: Client,
}

impl OllamaProvider {
    pub fn new(config: &OllamaConfig) -> Result<Self> {
        config.validate().context("Invalid Ollama configuration")?;
        let http_client = Client::builder()
            .build()
            .context("Failed to build HTTP client for Ollama provider")?;
        let provider = Self {
            base_url: config.resolve_base_url(),
            timeout: config.timeout(),
            content_field: config.content_field,
            rewriter: config.argument_rewriter()?,
            http_client,
        };
        debug!(
            base_url = %provider.base_url,
            timeout = ?provider.timeout,
            content_field = %provider.content_field,
            "Created Ollama provider"
        );
        Ok(provider)
    }

    /// Replaces the argument rewriter built from the configuration.
    pub fn with_argument_rewriter(mut self, rewriter: Arc<dyn ArgumentRewriter>) -> Self {
        self.rewriter = rewriter;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn content_field(&self) -> ContentField {
        self.content_field
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, CHAT_COMPLETION_ENDPOINT)
    }

    /// Builds the `/api/chat` body. Options are merged after `model` and
    /// `messages`; `stream` is always forced off.
    pub fn build_payload(
        &self,
        model: &str,
        messages: &[ChatInput],
        options: ChatOptions,
    ) -> Result<Value, LlmError> {
        debug!(model = %model, message_count = messages.len(), option_count = options.len(), "Building Ollama payload");

        let messages = convert_request(messages).map_err(LlmError::Payload)?;

        let mut payload = Map::new();
        payload.insert("model".to_string(), json!(model));
        payload.insert(
            "messages".to_string(),
            Value::Array(messages.into_iter().map(Value::Object).collect()),
        );
        for (key, value) in options {
            if key == "model" || key == "messages" {
                warn!(option = %key, "Caller option overrides a core request field");
            }
            payload.insert(key, value);
        }
        payload.insert("stream".to_string(), Value::Bool(false));

        Ok(Value::Object(payload))
    }

    /// Maps an `/api/chat` response onto a single-choice completion.
    pub fn normalize_response(&self, response: &Value) -> Result<ChatCompletionResponse, LlmError> {
        let message = response
            .get("message")
            .and_then(Value::as_object)
            .ok_or_else(|| {
                LlmError::InvalidResponse(format!(
                    "missing 'message' object in {}",
                    for_log(&response.to_string())
                ))
            })?;

        let key = self.content_field.key();
        let content = match message.get(key) {
            Some(Value::String(text)) => Some(text.clone()),
            Some(Value::Null) => None,
            Some(other) => {
                return Err(LlmError::InvalidResponse(format!(
                    "'message.{}' is not a string: {}",
                    key, other
                )))
            }
            None => {
                return Err(LlmError::InvalidResponse(format!(
                    "missing 'message.{}' field",
                    key
                )))
            }
        };

        let tool_calls = match message.get("tool_calls") {
            None | Some(Value::Null) => None,
            Some(Value::Array(descriptors)) if descriptors.is_empty() => None,
            Some(Value::Array(descriptors)) => Some(convert_tool_call_values(
                descriptors,
                self.rewriter.as_ref(),
            )?),
            Some(other) => return Err(ConversionError::NotAnArray(other.to_string()).into()),
        };

        let mut normalized = ChatCompletionResponse::default();
        let choice = &mut normalized.choices[0];
        choice.message.content = content;
        choice.message.tool_calls = tool_calls;
        choice.finish_reason = response
            .get("done_reason")
            .and_then(Value::as_str)
            .map(str::to_string);

        debug!(
            content_field = %key,
            tool_calls = choice.message.tool_calls.as_ref().map_or(0, Vec::len),
            "Normalized Ollama response"
        );
        Ok(normalized)
    }

    async fn call_chat_api(&self, payload: &Value) -> Result<Value, LlmError> {
        let endpoint = self.endpoint();
        debug!(endpoint = %endpoint, "Sending request to Ollama API");
        trace!(payload = %for_log(&payload.to_string()), "Ollama request body");

        let response = self
            .http_client
            .post(&endpoint)
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, endpoint = %endpoint, "Failed to send request to Ollama API");
                LlmError::from_transport(e)
            })?;

        let status = response.status();
        debug!(status = %status, "Received response from Ollama API");

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
            error!(status = %status, body = %for_log(&body), "Ollama API returned an error status");
            return Err(LlmError::HttpStatus { status, body });
        }

        let body = response.text().await.map_err(LlmError::from_transport)?;

        trace!(body = %for_log(&body), "Ollama response body");
        serde_json::from_str(&body).map_err(LlmError::Decode)
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    async fn chat_completions_create(
        &self,
        model: &str,
        messages: Vec<ChatInput>,
        options: ChatOptions,
    ) -> Result<ChatCompletionResponse, LlmError> {
        let payload = self.build_payload(model, &messages, options)?;
        let response = self.call_chat_api(&payload).await?;
        self.normalize_response(&response)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
