// ollama-bridge/src/config.rs

//! Configuration for the Ollama provider.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::convert::{ArgumentRewriter, FieldOverride, NoRewrite};

pub const API_URL_ENV_VAR: &str = "OLLAMA_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:11434";
pub const DEFAULT_TIMEOUT_SECS: u64 = 200;

/// Which key of Ollama's response `message` becomes the returned content.
///
/// Defaults to `thinking`. Models that answer in the conventional field
/// need `content`.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentField {
    #[default]
    Thinking,
    Content,
}

impl ContentField {
    pub fn key(&self) -> &'static str {
        match self {
            ContentField::Thinking => "thinking",
            ContentField::Content => "content",
        }
    }
}

impl fmt::Display for ContentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ContentField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "thinking" => Ok(ContentField::Thinking),
            "content" => Ok(ContentField::Content),
            other => Err(anyhow!(
                "Unknown content field '{}'. Expected 'thinking' or 'content'.",
                other
            )),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct OllamaConfig {
    /// Base URL of the server, without the `/api/chat` path.
    #[serde(default)]
    pub api_url: Option<String>,
    /// Request timeout in seconds.
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub content_field: ContentField,
    /// Tool-call argument keys whose values are replaced when present.
    #[serde(default)]
    pub argument_overrides: HashMap<String, toml::Value>,
}

impl OllamaConfig {
    pub fn from_toml_str(config_toml_content: &str) -> Result<OllamaConfig> {
        let config: OllamaConfig = match toml::from_str(config_toml_content) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::error!(error=%e, content=%config_toml_content, "Failed to parse TOML content");
                return Err(anyhow!(e))
                    .context("Failed to parse configuration TOML content. Check TOML syntax.");
            }
        };
        config.validate()?;
        tracing::info!("Successfully parsed and validated Ollama configuration.");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(api_url) = &self.api_url {
            if !api_url.trim().is_empty() {
                Url::parse(api_url)
                    .with_context(|| format!("Invalid URL format for 'api_url' ('{}').", api_url))?;
            }
        }
        if self.timeout == Some(0) {
            return Err(anyhow!("'timeout' must be greater than zero seconds."));
        }
        Ok(())
    }

    /// Explicit `api_url`, else `OLLAMA_API_URL`, else the local default.
    pub fn resolve_base_url(&self) -> String {
        self.resolve_base_url_with(std::env::var(API_URL_ENV_VAR).ok())
    }

    fn resolve_base_url_with(&self, env_url: Option<String>) -> String {
        let url = self
            .api_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .or_else(|| env_url.filter(|u| !u.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        url.trim().trim_end_matches('/').to_string()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Builds the rewriter described by `argument_overrides`.
    pub fn argument_rewriter(&self) -> Result<Arc<dyn ArgumentRewriter>> {
        if self.argument_overrides.is_empty() {
            return Ok(Arc::new(NoRewrite));
        }
        let overrides = self
            .argument_overrides
            .iter()
            .map(|(key, value)| -> Result<(String, JsonValue)> {
                let json_value: JsonValue = serde_json::to_value(value).with_context(|| {
                    format!("Failed to convert TOML argument override '{}' to JSON", key)
                })?;
                Ok((key.clone(), json_value))
            })
            .collect::<Result<FieldOverride>>()?;
        Ok(Arc::new(overrides))
    }
}
