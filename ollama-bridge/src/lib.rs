// ollama-bridge/src/lib.rs

#![doc = include_str!("../../README.md")]

pub mod config;
pub mod convert;
pub mod errors;
pub mod providers;
pub mod utils;

pub use config::{ContentField, OllamaConfig};
pub use convert::{ArgumentRewriter, FieldOverride, NoRewrite};
pub use errors::{ConversionError, LlmError};
pub use models::chat::{
    ChatCompletionResponse, ChatInput, ChatMessage, Choice, ImageData, Message, Role,
};
pub use models::tools::{ToolCall, ToolFunction};
pub use providers::ollama::OllamaProvider;
pub use providers::{ChatOptions, Provider, ProviderRegistry};

pub use async_trait::async_trait;

pub mod models {
    pub mod chat;
    pub mod tools;
}
