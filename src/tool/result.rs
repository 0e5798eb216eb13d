// ABOUTME: Defines the ToolResult type - a unified structure for tool
// ABOUTME: execution outcomes with content, error state, and structured metadata.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Result of a tool execution.
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// The output content.
    pub content: String,

    /// Whether this result represents an error.
    pub is_error: bool,

    /// Structured payloads (search hits, code outcomes) keyed by name.
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ToolResult {
    /// Create a successful text result.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
            metadata: HashMap::new(),
        }
    }

    /// Create an error result.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: message.into(),
            is_error: true,
            metadata: HashMap::new(),
        }
    }

    /// Create a successful result whose content is the pretty JSON of `value`,
    /// also stored under `key` in the metadata.
    pub fn json(key: impl Into<String>, value: impl Serialize) -> Self {
        let content = serde_json::to_string_pretty(&value).unwrap_or_default();
        Self::text(content).with_metadata(key, value)
    }

    /// Add metadata to the result.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.metadata.insert(key.into(), v);
        }
        self
    }

    /// Decode a metadata entry into a typed value.
    pub fn metadata_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.metadata
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

impl Default for ToolResult {
    fn default() -> Self {
        Self::text("")
    }
}
