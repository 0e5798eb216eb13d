// ABOUTME: Subagent plan protocol - prompt construction and defensive parsing
// ABOUTME: of the model's JSON plan, with a fallback plan for malformed output.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// System instruction sent alongside every plan prompt.
pub const PLAN_SYSTEM_PROMPT: &str = "You output JSON plans.";

/// Notes carried by the fallback plan.
pub const FALLBACK_NOTES: &str = "fallback plan";

/// Structured plan requested from the model.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Plan {
    /// Tool names the model says it wants. Audit-only.
    #[serde(default)]
    pub tools: Vec<String>,

    #[serde(default)]
    pub notes: String,

    /// Arbitrary structured findings the model produced inline.
    #[serde(default)]
    pub results: Value,

    /// Optional Python snippet to execute.
    #[serde(default)]
    pub code: Option<String>,
}

impl Plan {
    /// The plan used whenever the model's output cannot be decoded.
    pub fn fallback(allowed: &[String]) -> Self {
        Self {
            tools: allowed.to_vec(),
            notes: FALLBACK_NOTES.to_string(),
            results: Value::Null,
            code: None,
        }
    }

    /// Decode a plan from raw model text. Prose around the JSON object is
    /// ignored: the text between the first `{` and the last `}` is decoded.
    ///
    /// Only text that is not a JSON object is rejected. Fields of the wrong
    /// type fall back to their defaults individually.
    pub fn parse(text: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(extract_json_object(text)).ok()?;
        value.as_object().map(Self::from_object)
    }

    fn from_object(object: &Map<String, Value>) -> Self {
        let tools = match object.get("tools") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };

        Self {
            tools,
            notes: object
                .get("notes")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            results: object.get("results").cloned().unwrap_or_default(),
            code: object.get("code").and_then(Value::as_str).map(str::to_string),
        }
    }

    /// Decode a plan or fall back. Never fails.
    pub fn parse_or_fallback(text: &str, allowed: &[String]) -> Self {
        Self::parse(text).unwrap_or_else(|| Self::fallback(allowed))
    }

    pub fn is_fallback(&self) -> bool {
        self.notes == FALLBACK_NOTES && self.code.is_none() && self.results.is_null()
    }

    /// Inline results, when they are a non-empty JSON object.
    pub fn inline_results(&self) -> Option<&Map<String, Value>> {
        self.results.as_object().filter(|m| !m.is_empty())
    }

    /// The code snippet, when present and not blank.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// Slice from the first `{` to the last `}`; the whole text when either is
/// missing or they are out of order.
pub fn extract_json_object(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(first), Some(last)) if first <= last => &text[first..=last],
        _ => text,
    }
}

/// Build the user prompt for one task.
pub fn build_prompt(task: &str, allowed: &[String]) -> String {
    format!(
        r#"
You are a Subagent. Complete this task with a structured plan.

Task: {task}

Allowed tools: {tools}

Output JSON:
{{
  "tools": [],
  "notes": "short notes",
  "results": {{}},
  "code": "optional Python code"
}}
"#,
        task = task,
        tools = allowed.join(", "),
    )
}
