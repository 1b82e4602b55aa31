//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the
//! appropriate commands.

pub mod auth;

use std::error::Error;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::core::config::{path_display, Config};
use crate::ui::chat_loop::run_chat;

#[derive(Parser)]
#[command(name = "scrive")]
#[command(about = "A terminal chat client with a configurable scribe persona")]
#[command(
    long_about = "Scrive is a full-screen terminal chat client that talks to an \
OpenAI-compatible API through a configurable persona.\n\n\
Authentication:\n\
  Use 'scrive auth' to verify and store an API key, or /key inside the chat.\n\n\
Controls:\n\
  Type              Enter your message in the input field\n\
  Enter             Send the message\n\
  Up/Down/Mouse     Scroll through chat history\n\
  Ctrl+C            Quit the application\n\n\
Commands:\n\
  /help             Show available slash commands\n\
  /new              Start a new conversation\n\
  /persona <text>   Change the persona going forward\n\
  /log [filename]   Enable logging to file, or toggle pause/resume"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to use for this run (overrides the configured default)
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Enable transcript logging to the specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up and verify the API credential
    Auth,
    /// Start the chat interface (default)
    Chat,
    /// Set configuration values
    Set {
        /// Configuration key to set (name, persona, base-url, model)
        key: String,
        /// Value to set for the key (can be multiple words)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Auth => {
            if let Err(e) = auth::run_auth_flow().await {
                eprintln!("❌ Authentication failed: {e}");
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Set { key, value } => set_config_value(&key, &value),
        Commands::Chat => run_chat(args.model, args.log).await,
    }
}

fn set_config_value(key: &str, value: &[String]) -> Result<(), Box<dyn Error>> {
    let joined = value.join(" ");
    let joined = joined.trim();
    let mut config = Config::load();

    match key {
        "name" => {
            if joined.is_empty() {
                println!("name = {}", config.name);
                return Ok(());
            }
            config.name = joined.to_string();
        }
        "persona" => {
            if joined.is_empty() {
                println!("persona = {}", config.persona);
                return Ok(());
            }
            config.persona = joined.to_string();
        }
        "base-url" => {
            if joined.is_empty() {
                println!("base-url = {}", config.base_url);
                return Ok(());
            }
            config.base_url = crate::utils::url::normalize_base_url(joined);
        }
        "model" => {
            if joined.is_empty() {
                println!("model = {}", config.model);
                return Ok(());
            }
            config.model = joined.to_string();
        }
        _ => {
            eprintln!("❌ Unknown config key: {key}");
            std::process::exit(1);
        }
    }

    config.save()?;
    println!(
        "✅ Set {key} to: {joined} (saved to {})",
        path_display(Config::config_path())
    );
    Ok(())
}
