// ollama-bridge/src/providers/mod.rs
use crate::errors::LlmError;
use crate::models::chat::{ChatCompletionResponse, ChatInput};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub mod ollama;

/// Extra request options (temperature, tools, ...) forwarded verbatim.
pub type ChatOptions = Map<String, Value>;

#[async_trait]
pub trait Provider: Send + Sync {
    async fn chat_completions_create(
        &self,
        model: &str,
        messages: Vec<ChatInput>,
        options: ChatOptions,
    ) -> Result<ChatCompletionResponse, LlmError>;

    fn name(&self) -> &str;
}

/// Resolves `"<provider>:<model>"` identifiers to registered providers.
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn Provider>>,
    default_provider: String,
}

impl ProviderRegistry {
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider.into(),
        }
    }

    pub fn register(&mut self, id: impl Into<String>, provider: Arc<dyn Provider>) {
        self.providers.insert(id.into(), provider);
    }

    pub fn get(&self, id: &str) -> Result<&dyn Provider, LlmError> {
        self.providers
            .get(id)
            .map(|p| p.as_ref())
            .ok_or_else(|| LlmError::UnknownProvider(id.to_string()))
    }

    pub fn default_provider_id(&self) -> &str {
        &self.default_provider
    }

    /// Splits a model id on its first colon when the prefix names a
    /// registered provider. Otherwise the whole id is a model for the
    /// default provider, so `llama3.1:8b` keeps its tag.
    pub fn resolve<'a>(&self, model_id: &'a str) -> (String, &'a str) {
        if let Some((prefix, model)) = model_id.split_once(':') {
            if self.providers.contains_key(prefix) {
                return (prefix.to_string(), model);
            }
        }
        (self.default_provider.clone(), model_id)
    }

    pub async fn chat_completions_create(
        &self,
        model_id: &str,
        messages: Vec<ChatInput>,
        options: ChatOptions,
    ) -> Result<ChatCompletionResponse, LlmError> {
        let (provider_id, model) = self.resolve(model_id);
        debug!(provider = %provider_id, model = %model, "Dispatching chat completion");
        let provider = self.get(&provider_id)?;
        provider
            .chat_completions_create(model, messages, options)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::Message;
    use std::sync::Mutex;

    struct RecordingProvider {
        id: String,
        seen_models: Mutex<Vec<String>>,
    }

    impl RecordingProvider {
        fn new(id: &str) -> Arc<Self> {
            Arc::new(Self {
                id: id.to_string(),
                seen_models: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Provider for RecordingProvider {
        async fn chat_completions_create(
            &self,
            model: &str,
            _messages: Vec<ChatInput>,
            _options: ChatOptions,
        ) -> Result<ChatCompletionResponse, LlmError> {
            self.seen_models.lock().unwrap().push(model.to_string());
            let mut response = ChatCompletionResponse::default();
            response.choices[0].message.content = Some(self.id.clone());
            Ok(response)
        }

        fn name(&self) -> &str {
            &self.id
        }
    }

    #[tokio::test]
    async fn test_prefixed_model_id_routes_to_provider() {
        let ollama = RecordingProvider::new("ollama");
        let mut registry = ProviderRegistry::new("ollama");
        registry.register("ollama", ollama.clone());

        let response = registry
            .chat_completions_create("ollama:llama3.1:8b", vec![Message::user("hi").into()], ChatOptions::new())
            .await
            .unwrap();

        assert_eq!(response.content(), Some("ollama"));
        assert_eq!(*ollama.seen_models.lock().unwrap(), vec!["llama3.1:8b".to_string()]);
    }

    #[tokio::test]
    async fn test_unprefixed_model_id_uses_default_provider() {
        let ollama = RecordingProvider::new("ollama");
        let mut registry = ProviderRegistry::new("ollama");
        registry.register("ollama", ollama.clone());

        registry
            .chat_completions_create("qwen3:4b", Vec::new(), ChatOptions::new())
            .await
            .unwrap();

        assert_eq!(*ollama.seen_models.lock().unwrap(), vec!["qwen3:4b".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_default_provider_is_an_error() {
        let registry = ProviderRegistry::new("ollama");
        let err = registry
            .chat_completions_create("llama3", Vec::new(), ChatOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::UnknownProvider(ref id) if id == "ollama"));
        assert_eq!(registry.default_provider_id(), "ollama");
    }

    #[test]
    fn test_get_returns_registered_provider() {
        let mut registry = ProviderRegistry::new("ollama");
        registry.register("local", RecordingProvider::new("local"));
        assert_eq!(registry.get("local").unwrap().name(), "local");
        assert!(registry.get("remote").is_err());
    }
}
