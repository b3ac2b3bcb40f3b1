// ollama-bridge/src/convert/request.rs

use serde_json::{Map, Value};

use crate::models::chat::ChatInput;

/// The only message keys Ollama's /api/chat accepts from us.
pub const WIRE_MESSAGE_KEYS: [&str; 3] = ["role", "content", "images"];

/// Converts caller messages into the plain objects sent as `messages`.
///
/// Structured messages are serialized in full, raw objects are taken as-is,
/// and then every object is cut down to [`WIRE_MESSAGE_KEYS`]. Keys missing
/// from the source stay missing. Order is preserved.
pub fn convert_request(messages: &[ChatInput]) -> serde_json::Result<Vec<Map<String, Value>>> {
    messages
        .iter()
        .map(|input| -> serde_json::Result<Map<String, Value>> {
            let mut message = match input {
                ChatInput::Message(message) => match serde_json::to_value(message)? {
                    Value::Object(map) => map,
                    // Message is a struct; serde_json always yields an object.
                    _ => Map::new(),
                },
                ChatInput::Raw(map) => map.clone(),
            };
            message.retain(|key, _| WIRE_MESSAGE_KEYS.contains(&key.as_str()));
            Ok(message)
        })
        .collect()
}
