//! chat-relay - HTTP relay to an OpenAI-compatible chat completion API
//!
//! Accepts a message as JSON (`POST /chat`) or raw text (`POST /chat-text`),
//! forwards it with a fixed system instruction and model, and returns the
//! trimmed reply in the same shape the caller used.

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod relay;
pub mod telemetry;
pub mod upstream;
