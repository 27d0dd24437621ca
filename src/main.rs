//! chat-relay HTTP server
//!
//! Starts an Axum web server that relays chat messages to the completion API.

use chat_relay::{
    cli::{Cli, Command, generate_config_template},
    config::{API_KEY_ENV, Config},
    handlers::{self, AppState},
    telemetry,
};
use clap::Parser;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::Config { output }) = cli.command {
        match output {
            Some(path) => {
                std::fs::write(&path, generate_config_template())?;
                println!("Wrote configuration template to {}", path);
            }
            None => print!("{}", generate_config_template()),
        }
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref().map(Path::new), |name| {
        std::env::var(name).ok()
    })?;

    telemetry::init(&config.observability.log_level);

    if config.upstream.api_key.is_none() {
        tracing::warn!(
            "{} is not set; upstream calls will be sent without credentials",
            API_KEY_ENV
        );
    }

    let state = AppState::new(&config)?;
    let app = handlers::router(state);

    let addr = config.server.socket_addr();
    tracing::info!(
        upstream = %config.upstream.completions_url(),
        "Starting chat relay on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
