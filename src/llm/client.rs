// ABOUTME: Defines the LlmClient trait - the transport boundary between the
// ABOUTME: supervisor and any chat-completion provider.

use async_trait::async_trait;

use super::{Message, Request, Response};
use crate::error::LlmError;

/// Trait for LLM client implementations.
///
/// Implementations make exactly one attempt per call; retry and timeout policy
/// belong to the transport itself.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Create a completion (non-streaming).
    async fn create_message(&self, req: &Request) -> Result<Response, LlmError>;

    /// Map an ordered message list to the response text using the client's
    /// default model.
    async fn complete(&self, messages: Vec<Message>) -> Result<String, LlmError> {
        let request = Request::new("").messages(messages);
        let response = self.create_message(&request).await?;
        Ok(response.content)
    }
}
