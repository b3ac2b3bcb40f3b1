use clap::{ArgAction, Parser};
use ollama_bridge::ContentField;
use std::path::PathBuf;

/// ollama-bridge: chat with a local Ollama server.
/// Sends one prompt and prints the normalized reply.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase message verbosity.
    ///
    /// Specify multiple times for more verbose output:
    ///  -v:  INFO level
    ///  -vv: DEBUG level
    ///  -vvv: TRACE level (most verbose)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// TOML file with provider settings (api_url, timeout, content_field, argument_overrides).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Server base URL. Overrides the config file and OLLAMA_API_URL.
    #[arg(long)]
    pub api_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Model id, optionally prefixed with the provider ("ollama:llama3.1").
    #[arg(short, long, default_value = "ollama:llama3.1")]
    pub model: String,

    /// System prompt sent before the user prompt.
    #[arg(short, long)]
    pub system: Option<String>,

    /// Image file attached to the user message. May be repeated.
    #[arg(long = "image")]
    pub images: Vec<PathBuf>,

    /// Extra request option as key=value; the value is parsed as JSON when possible.
    #[arg(short = 'o', long = "option")]
    pub options: Vec<String>,

    /// JSON file holding an array of tool definitions, sent as the `tools` option.
    #[arg(long)]
    pub tools: Option<PathBuf>,

    /// Response field used as the message content: thinking or content.
    #[arg(long)]
    pub content_field: Option<ContentField>,

    /// The user prompt.
    pub prompt: String,
}
