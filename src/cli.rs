//! Command-line interface for the chat relay
//!
//! Provides argument parsing and subcommand handling for the relay binary.

use clap::{Parser, Subcommand};

/// HTTP relay to an OpenAI-compatible chat completion API
#[derive(Parser)]
#[command(name = "chat-relay")]
#[command(version)]
#[command(about = "HTTP relay to an OpenAI-compatible chat completion API")]
#[command(
    long_about = "chat-relay accepts a message as JSON (POST /chat) or raw text \
    (POST /chat-text), forwards it to the completion API and returns the reply. \
    PORT and OPENAI_API_KEY in the environment override the config file."
)]
pub struct Cli {
    /// Path to an optional configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# chat-relay configuration
# ========================
#
# Every setting has a default; this file is optional.
# Environment variables override the file:
#   PORT            -> server.port
#   OPENAI_API_KEY  -> upstream.api_key

[server]
# IP address to bind to (0.0.0.0 for all interfaces, 127.0.0.1 for localhost only)
host = "0.0.0.0"

# Port to listen on
port = 8000

[upstream]
# OpenAI-compatible API base URL, including /v1
base_url = "https://api.openai.com/v1"

# Bearer credential. Prefer OPENAI_API_KEY over storing it here.
# api_key = "sk-..."

[observability]
# Log level: "trace", "debug", "info", "warn", "error"
# RUST_LOG takes precedence when set.
log_level = "info"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn default_config_path_is_none() {
        let cli = Cli::parse_from(["chat-relay"]);
        assert!(cli.config.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn custom_config_path() {
        let cli = Cli::parse_from(["chat-relay", "--config", "relay.toml"]);
        assert_eq!(cli.config.as_deref(), Some("relay.toml"));
    }

    #[test]
    fn config_subcommand_with_output() {
        let cli = Cli::parse_from(["chat-relay", "config", "-o", "my-config.toml"]);
        assert!(matches!(
            cli.command,
            Some(Command::Config { output: Some(ref path) }) if path == "my-config.toml"
        ));
    }

    #[test]
    fn template_is_valid_config() {
        let config: crate::config::Config =
            generate_config_template().parse().expect("template should parse");
        assert_eq!(config.server.port, 8000);
        assert!(config.upstream.api_key.is_none());
    }
}
