//! Debater backends — the text-generation capability the orchestrator drives.

use async_trait::async_trait;
use thiserror::Error;

use super::context::GenerationContext;

/// Errors from a debater backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Response parse error: {0}")]
    ParseError(String),

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Debater unavailable: {0}")]
    Unavailable(String),
}

/// A text-generation backend bound to one side of a debate.
#[async_trait]
pub trait DebaterBackend: Send + Sync {
    /// Model identifier recorded on statements and errors.
    fn model_name(&self) -> String;

    /// Generate a reply to `prompt`, given the prior statements in `context`.
    async fn generate_response(
        &self,
        prompt: &str,
        context: &GenerationContext,
    ) -> Result<String, GenerationError>;
}
