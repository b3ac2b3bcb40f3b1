// ollama-bridge/src/convert/tool_calls.rs

use std::collections::BTreeMap;
use std::fmt::Debug;

use serde_json::{Map, Value};
use tracing::trace;
use uuid::Uuid;

use crate::errors::ConversionError;
use crate::models::tools::ToolCall;

const TOOL_CALL_ID_PREFIX: &str = "call_";
const TOOL_CALL_ID_HEX_LEN: usize = 24;

/// Hook applied to each tool call's arguments before they are serialized.
pub trait ArgumentRewriter: Send + Sync + Debug {
    fn rewrite(&self, function_name: Option<&str>, arguments: &mut Map<String, Value>);
}

/// Leaves arguments untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRewrite;

impl ArgumentRewriter for NoRewrite {
    fn rewrite(&self, _function_name: Option<&str>, _arguments: &mut Map<String, Value>) {}
}

/// Replaces the value of selected argument keys, but only when the model
/// actually supplied that key. Keys are never added.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FieldOverride {
    overrides: BTreeMap<String, Value>,
}

impl FieldOverride {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.overrides.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for FieldOverride {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            overrides: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl ArgumentRewriter for FieldOverride {
    fn rewrite(&self, function_name: Option<&str>, arguments: &mut Map<String, Value>) {
        for (key, value) in &self.overrides {
            if let Some(slot) = arguments.get_mut(key) {
                trace!(function = ?function_name, key = %key, "Overriding tool call argument");
                *slot = value.clone();
            }
        }
    }
}

/// `call_` followed by the first 24 hex digits of a fresh v4 UUID.
pub fn generate_tool_call_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}{}", TOOL_CALL_ID_PREFIX, &hex[..TOOL_CALL_ID_HEX_LEN])
}

/// Parses a JSON array of Ollama tool-call descriptors and converts it.
pub fn convert_tool_calls(
    raw: &str,
    rewriter: &dyn ArgumentRewriter,
) -> Result<Vec<ToolCall>, ConversionError> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Array(descriptors) => convert_tool_call_values(&descriptors, rewriter),
        other => Err(ConversionError::NotAnArray(other.to_string())),
    }
}

/// Converts already-parsed Ollama tool-call descriptors.
///
/// Each descriptor looks like `{"function": {"name": .., "arguments": {..}}, "index": n}`.
/// `index` and any id the server sent are ignored; every output gets a new id.
pub fn convert_tool_call_values(
    descriptors: &[Value],
    rewriter: &dyn ArgumentRewriter,
) -> Result<Vec<ToolCall>, ConversionError> {
    descriptors
        .iter()
        .enumerate()
        .map(|(index, descriptor)| convert_descriptor(index, descriptor, rewriter))
        .collect()
}

fn convert_descriptor(
    index: usize,
    descriptor: &Value,
    rewriter: &dyn ArgumentRewriter,
) -> Result<ToolCall, ConversionError> {
    let malformed = |reason: String| ConversionError::MalformedDescriptor { index, reason };

    let descriptor = descriptor
        .as_object()
        .ok_or_else(|| malformed(format!("expected an object, got {}", descriptor)))?;
    let function = match descriptor.get("function") {
        None | Some(Value::Null) => None,
        Some(Value::Object(function)) => Some(function),
        Some(other) => return Err(malformed(format!("'function' is not an object: {}", other))),
    };
    let name = match function.and_then(|f| f.get("name")) {
        None | Some(Value::Null) => None,
        Some(Value::String(name)) => Some(name.clone()),
        Some(other) => return Err(malformed(format!("'function.name' is not a string: {}", other))),
    };

    let mut arguments = match function.and_then(|f| f.get("arguments")) {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(other) => {
            return Err(ConversionError::InvalidArguments {
                index,
                found: other.to_string(),
            })
        }
    };

    rewriter.rewrite(name.as_deref(), &mut arguments);
    let arguments = serde_json::to_string(&Value::Object(arguments))?;

    let tool_call = ToolCall::function(generate_tool_call_id(), name, arguments);
    trace!(index, id = %tool_call.id, name = ?tool_call.function.name, "Converted tool call");
    Ok(tool_call)
}
