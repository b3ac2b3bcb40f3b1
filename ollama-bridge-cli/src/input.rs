// ollama-bridge-cli/src/input.rs
//! Turns command-line arguments into provider config, messages and options.

use anyhow::{anyhow, Context, Result};
use ollama_bridge::{ChatInput, ChatOptions, ImageData, Message, OllamaConfig};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::models::cli::Cli;

/// Reads the optional TOML file, then applies flag overrides on top.
pub fn load_config(cli: &Cli) -> Result<OllamaConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            info!("Loaded configuration file: {:?}", path);
            OllamaConfig::from_toml_str(&content)
                .with_context(|| format!("Failed to parse or validate {:?}", path))?
        }
        None => OllamaConfig::default(),
    };

    if let Some(api_url) = &cli.api_url {
        config.api_url = Some(api_url.clone());
    }
    if let Some(timeout) = cli.timeout {
        config.timeout = Some(timeout);
    }
    if let Some(content_field) = cli.content_field {
        config.content_field = content_field;
    }
    config.validate()?;
    Ok(config)
}

/// Parses `key=value`. The value is JSON when it parses as JSON, else a string.
pub fn parse_option(raw: &str) -> Result<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Invalid option '{}'. Expected key=value.", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(anyhow!("Invalid option '{}'. The key is empty.", raw));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

pub fn build_options(raw_options: &[String], tools_file: Option<&Path>) -> Result<ChatOptions> {
    let mut options = ChatOptions::new();
    for raw in raw_options {
        let (key, value) = parse_option(raw)?;
        debug!(option = %key, value = %value, "Adding request option");
        options.insert(key, value);
    }

    if let Some(path) = tools_file {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read tools file: {:?}", path))?;
        let tools: Value = serde_json::from_str(&content)
            .with_context(|| format!("Tools file {:?} is not valid JSON", path))?;
        if !tools.is_array() {
            return Err(anyhow!("Tools file {:?} must contain a JSON array", path));
        }
        options.insert("tools".to_string(), tools);
    }
    Ok(options)
}

pub fn build_messages(
    system: Option<&str>,
    prompt: &str,
    image_paths: &[PathBuf],
) -> Result<Vec<ChatInput>> {
    let mut messages: Vec<ChatInput> = Vec::new();
    if let Some(system) = system {
        messages.push(Message::system(system).into());
    }

    let mut user = Message::user(prompt);
    if !image_paths.is_empty() {
        let images = image_paths
            .iter()
            .map(|path| {
                fs::read(path)
                    .map(ImageData)
                    .with_context(|| format!("Failed to read image: {:?}", path))
            })
            .collect::<Result<Vec<_>>>()?;
        user = user.with_images(images);
    }
    messages.push(user.into());
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use ollama_bridge::{ContentField, Role};
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_parse_option_json_and_string_values() {
        assert_eq!(parse_option("temperature=0.2").unwrap(), ("temperature".to_string(), json!(0.2)));
        assert_eq!(parse_option("format=json").unwrap(), ("format".to_string(), json!("json")));
        assert_eq!(
            parse_option("options={\"num_ctx\": 4096}").unwrap(),
            ("options".to_string(), json!({ "num_ctx": 4096 }))
        );
        assert_eq!(parse_option("keep_alive=").unwrap(), ("keep_alive".to_string(), json!("")));
    }

    #[test]
    fn test_parse_option_errors() {
        assert!(parse_option("temperature").is_err());
        assert!(parse_option("=1").is_err());
    }

    #[test]
    fn test_build_options_with_tools_file() {
        let tools = write_temp(br#"[{"type": "function", "function": {"name": "get_weather"}}]"#);
        let options = build_options(&["temperature=0".to_string()], Some(tools.path())).unwrap();
        assert_eq!(options["temperature"], json!(0));
        assert_eq!(options["tools"][0]["function"]["name"], "get_weather");
    }

    #[test]
    fn test_build_options_rejects_non_array_tools() {
        let tools = write_temp(br#"{"type": "function"}"#);
        assert!(build_options(&[], Some(tools.path())).is_err());
    }

    #[test]
    fn test_build_messages_with_system_and_image() {
        let image = write_temp(b"\x89PNG");
        let messages = build_messages(Some("Be brief."), "What is this?", &[image.path().to_path_buf()]).unwrap();
        assert_eq!(messages.len(), 2);
        match (&messages[0], &messages[1]) {
            (ChatInput::Message(system), ChatInput::Message(user)) => {
                assert_eq!(system.role, Role::System);
                assert_eq!(user.role, Role::User);
                assert_eq!(user.content.as_deref(), Some("What is this?"));
                assert_eq!(user.images, Some(vec![ImageData(b"\x89PNG".to_vec())]));
            }
            other => panic!("unexpected messages: {:?}", other),
        }
    }

    #[test]
    fn test_build_messages_missing_image() {
        let result = build_messages(None, "hi", &[PathBuf::from("/definitely/not/here.png")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_flags_override_file() {
        let config_file = write_temp(b"api_url = \"http://from-file:11434\"\ntimeout = 30\n");
        let cli = Cli::parse_from([
            "ollama-bridge",
            "--config",
            config_file.path().to_str().unwrap(),
            "--timeout",
            "5",
            "--content-field",
            "content",
            "hello",
        ]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.api_url.as_deref(), Some("http://from-file:11434"));
        assert_eq!(config.timeout, Some(5));
        assert_eq!(config.content_field, ContentField::Content);
    }
}
