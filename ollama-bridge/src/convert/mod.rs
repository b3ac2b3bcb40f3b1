// ollama-bridge/src/convert/mod.rs
//! Translation between chat-completion shapes and Ollama's wire format.

pub mod request;
pub mod tool_calls;

pub use request::{convert_request, WIRE_MESSAGE_KEYS};
pub use tool_calls::{
    convert_tool_call_values, convert_tool_calls, generate_tool_call_id, ArgumentRewriter,
    FieldOverride, NoRewrite,
};
