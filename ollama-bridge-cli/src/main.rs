// ollama-bridge-cli/src/main.rs
mod input;
mod models;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ollama_bridge::{ChatCompletionResponse, OllamaProvider, ProviderRegistry};

use crate::models::cli::Cli;

const PROVIDER_ID: &str = "ollama";

fn print_response(response: &ChatCompletionResponse) {
    match response.content() {
        Some(content) if !content.is_empty() => println!("{}", content),
        _ => println!("{}", "(no content)".dimmed()),
    }

    let tool_calls = response.tool_calls();
    if tool_calls.is_empty() {
        return;
    }
    println!();
    println!("{}", "Tool calls:".cyan().bold());
    for call in tool_calls {
        println!(
            "  {} {}({})",
            call.id.dimmed(),
            call.function.name.as_deref().unwrap_or("<unnamed>").yellow(),
            call.function.arguments
        );
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = input::load_config(&cli)?;
    let provider = OllamaProvider::new(&config).context("Failed to create Ollama provider")?;
    info!(endpoint = %provider.endpoint(), content_field = %provider.content_field(), "Using Ollama provider");

    let mut registry = ProviderRegistry::new(PROVIDER_ID);
    registry.register(PROVIDER_ID, Arc::new(provider));

    let messages = input::build_messages(cli.system.as_deref(), &cli.prompt, &cli.images)?;
    let options = input::build_options(&cli.options, cli.tools.as_deref())?;

    let response = registry
        .chat_completions_create(&cli.model, messages, options)
        .await?;
    print_response(&response);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(default_level.into()));

    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_level(true);

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()
    {
        eprintln!("{} Failed to initialize logging: {}", "Error:".red(), e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Operation failed: {:#}", e);
            eprintln!("{} {:#}", "Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}
