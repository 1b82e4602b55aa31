//! Interactive credential setup.
//!
//! Runs on plain stdin/stdout before any TUI is involved: prompt for a key,
//! verify it against the provider, and persist it only on success.

use std::error::Error;
use std::io::{self, Write};

use crate::core::config::{path_display, Config};
use crate::core::session::SessionManager;

pub async fn run_auth_flow() -> Result<(), Box<dyn Error>> {
    let mut config = Config::load();

    println!("Scrive authentication");
    println!("Provider endpoint: {}", config.base_url);
    print!("Enter API key: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let credential = line.trim().to_string();
    if credential.is_empty() {
        return Err("API key cannot be empty".into());
    }

    let mut session = SessionManager::new(
        config.base_url.clone(),
        config.model.clone(),
        config.persona.clone(),
    );
    session
        .authenticate(&credential)
        .await
        .map_err(|e| format!("credential rejected: {e}"))?;

    config.api_key = Some(credential);
    config.save()?;

    println!(
        "✅ API key verified and saved to {}",
        path_display(Config::config_path())
    );
    Ok(())
}
