// ollama-bridge/src/models/chat.rs
use super::tools::ToolCall;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Who produced a message.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    #[default]
    User,
    Assistant,
    Tool,
}

/// Raw image bytes. Serialized as standard base64 text, which is what
/// Ollama expects inside a message's `images` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData(pub Vec<u8>);

impl Serialize for ImageData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for ImageData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map(ImageData)
            .map_err(serde::de::Error::custom)
    }
}

impl From<Vec<u8>> for ImageData {
    fn from(bytes: Vec<u8>) -> Self {
        ImageData(bytes)
    }
}

/// A single conversational turn as the caller sees it.
///
/// `role`, `content` and `images` are always serialized (absent values as
/// `null`). The remaining fields belong to the richer chat-completion
/// message and are never sent to Ollama.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Message {
    pub role: Role,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<ImageData>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn with_images(mut self, images: Vec<ImageData>) -> Self {
        self.images = Some(images);
        self
    }
}

/// Input accepted by providers: either a structured [`Message`] or an
/// already-plain JSON object that is forwarded as-is (before key filtering).
#[derive(Debug, Clone, PartialEq)]
pub enum ChatInput {
    Message(Message),
    Raw(Map<String, Value>),
}

impl From<Message> for ChatInput {
    fn from(message: Message) -> Self {
        ChatInput::Message(message)
    }
}

impl From<Map<String, Value>> for ChatInput {
    fn from(map: Map<String, Value>) -> Self {
        ChatInput::Raw(map)
    }
}

/// Message returned inside a [`Choice`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl Default for ChatMessage {
    fn default() -> Self {
        Self {
            role: Role::Assistant,
            content: None,
            tool_calls: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Choice {
    pub index: u32,
    pub message: ChatMessage,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub finish_reason: Option<String>,
}

/// Provider-independent chat completion result.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

impl Default for ChatCompletionResponse {
    /// A response with a single, empty assistant choice.
    fn default() -> Self {
        Self {
            choices: vec![Choice::default()],
        }
    }
}

impl ChatCompletionResponse {
    pub fn first_message(&self) -> Option<&ChatMessage> {
        self.choices.first().map(|choice| &choice.message)
    }

    pub fn content(&self) -> Option<&str> {
        self.first_message().and_then(|m| m.content.as_deref())
    }

    pub fn tool_calls(&self) -> &[ToolCall] {
        self.first_message()
            .and_then(|m| m.tool_calls.as_deref())
            .unwrap_or(&[])
    }
}
