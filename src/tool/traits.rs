// ABOUTME: Defines the Tool trait - one named capability the supervisor can dispatch.
// ABOUTME: Tools have a name, description, parameter schema, and async execute method.

use async_trait::async_trait;

use super::ToolResult;

/// A capability that can be dispatched by name.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the unique name of this tool.
    fn name(&self) -> &str;

    /// Returns a human-readable description for prompts and listings.
    fn description(&self) -> &str;

    /// Returns the JSON Schema for the tool's input parameters.
    fn schema(&self) -> serde_json::Value;

    /// Execute the tool with the given parameters.
    ///
    /// Expected failures (unreachable provider, missing file) come back as
    /// `ToolResult::error`; `Err` is reserved for malformed parameters and
    /// local faults.
    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, anyhow::Error>;
}
