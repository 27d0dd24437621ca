//! Relay pipeline: intake → upstream invocation → normalization
//!
//! [`Relay`] owns the upstream client. It holds no per-request state, so a
//! single instance is shared by every handler.

pub mod intake;
pub mod normalize;

pub use intake::InboundMessage;
pub use normalize::{ChatReply, CompletionResult, FALLBACK_REPLY, OutputMode, render};

use crate::error::AppResult;
use crate::upstream::CompletionClient;
use std::sync::Arc;

/// Forwards validated messages upstream and extracts the reply
#[derive(Clone)]
pub struct Relay {
    client: Arc<dyn CompletionClient>,
}

impl Relay {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Issue one upstream call for `message` and normalize its content
    ///
    /// Upstream failures come back as `AppError::Upstream`. An empty
    /// completion is not an error: it yields the fallback reply.
    pub async fn complete(&self, message: &InboundMessage) -> AppResult<CompletionResult> {
        let response = self.client.complete(message.text()).await?;
        Ok(CompletionResult::from_response(&response))
    }
}
