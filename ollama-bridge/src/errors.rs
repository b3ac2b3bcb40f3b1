// ollama-bridge/src/errors.rs
use thiserror::Error;

/// Shown when the server cannot be reached at all.
pub const CONNECT_ERROR_MESSAGE: &str =
    "Ollama is likely not running. Start Ollama by running `ollama serve` on your host.";

/// Errors surfaced by a chat-completion provider.
#[derive(Error, Debug)]
pub enum LlmError {
    /// The server could not be reached.
    #[error("Connection failed: {}", CONNECT_ERROR_MESSAGE)]
    Connection(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Ollama request failed: HTTP status {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Any other transport failure, such as a timeout or an unreadable body.
    #[error("An error occurred: {0}")]
    Request(#[source] reqwest::Error),

    /// The body was not JSON.
    #[error("An error occurred: {0}")]
    Decode(#[source] serde_json::Error),

    /// The response JSON did not have the expected structure.
    #[error("Invalid Ollama response: {0}")]
    InvalidResponse(String),

    #[error("Failed to convert tool calls: {0}")]
    ToolCalls(#[from] ConversionError),

    /// The outbound payload could not be assembled.
    #[error("Failed to build request: {0}")]
    Payload(#[source] serde_json::Error),

    #[error("Provider not found: {0}")]
    UnknownProvider(String),
}

impl LlmError {
    /// Sorts a transport error into the connection / generic buckets.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() {
            LlmError::Connection(err)
        } else {
            LlmError::Request(err)
        }
    }
}

/// Errors from the tool-call converter.
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("malformed tool call JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON array of tool calls, got {0}")]
    NotAnArray(String),

    #[error("tool call {index} is malformed: {reason}")]
    MalformedDescriptor { index: usize, reason: String },

    #[error("tool call {index} has non-object arguments: {found}")]
    InvalidArguments { index: usize, found: String },
}
