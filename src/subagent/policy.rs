// ABOUTME: ToolPolicy - separates the tools a caller allows from the tools a plan requests.
// ABOUTME: The allowed set drives side effects; the requested set is kept for audit.

use serde::{Deserialize, Serialize};

/// Tool names a subagent may use, in dispatch order.
pub const DEFAULT_ALLOWED_TOOLS: [&str; 6] = [
    "read_file",
    "write_file",
    "edit_file",
    "execute_code",
    "search_internet",
    "web_scrape",
];

/// The two tool sets involved in one execution.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ToolPolicy {
    /// Granted by the caller. Side effects run for these, in this order.
    pub allowed: Vec<String>,

    /// Claimed by the model's plan. Never acted on.
    pub requested: Vec<String>,
}

impl ToolPolicy {
    pub fn new(allowed: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
            requested: Vec::new(),
        }
    }

    /// Record what the plan asked for.
    pub fn with_requested(mut self, requested: &[String]) -> Self {
        self.requested = requested.to_vec();
        self
    }

    pub fn allows(&self, tool: &str) -> bool {
        self.allowed.iter().any(|t| t == tool)
    }

    /// Requested tools the caller did not allow.
    pub fn denied_requests(&self) -> Vec<&str> {
        self.requested
            .iter()
            .filter(|t| !self.allows(t))
            .map(String::as_str)
            .collect()
    }
}
