// ollama-bridge/src/models/tools.rs
use serde::{Deserialize, Serialize};

/// Tool call attached to an assistant message, in the canonical
/// chat-completion shape.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub call_type: String, // Always "function"
    pub function: ToolFunction,
}

/// The function call details within a ToolCall.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ToolFunction {
    /// Ollama may omit the name; it is carried through as-is.
    pub name: Option<String>,
    /// Arguments as a JSON-encoded string.
    pub arguments: String,
}

impl ToolCall {
    pub fn function(id: impl Into<String>, name: Option<String>, arguments: String) -> Self {
        Self {
            id: id.into(),
            call_type: "function".to_string(),
            function: ToolFunction { name, arguments },
        }
    }
}
