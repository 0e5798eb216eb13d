// ABOUTME: Result folding - turns a completed task's execution record into
// ABOUTME: summaries, a cleaned summary, or the generated script.

use std::sync::LazyLock;

use regex::Regex;

use crate::llm::{LlmClient, Message};
use crate::subagent::ExecutionRecord;

pub const SUMMARY_SYSTEM_PROMPT: &str = "You are a helpful summarization assistant.";
pub const SCRIPT_SYSTEM_PROMPT: &str =
    "You are a Python coding assistant. ONLY output runnable Python code.";

/// Stand-in finding when a search produced nothing.
pub const NO_RESULTS: &str = "No results found.";
pub const SUMMARY_FALLBACK: &str = "No summarization available (LLM call failed).";
pub const SCRIPT_FALLBACK: &str = "# LLM failed to produce script\n";

/// Fixed name of the generated script. Overwritten on every run.
pub const SCRIPT_FILENAME: &str = "generated_script.py";

/// Base name of the cleaned summary artifact.
pub const SUMMARY_BASENAME: &str = "clean_summary";

static LANGUAGE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_+#.-]+$").expect("valid regex"));

/// One `"{title} — {snippet}"` line per search hit that has either field.
pub fn search_summaries(record: &ExecutionRecord) -> Vec<String> {
    record
        .search_hits()
        .filter(|hit| !hit.title.is_empty() || !hit.snippet.is_empty())
        .map(|hit| format!("{} — {}", hit.title, hit.snippet))
        .collect()
}

/// Remove a surrounding Markdown code fence and its language tag.
///
/// Text that does not start with a fence is returned unchanged.
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return text.to_string();
    }

    let body = trimmed.trim_matches('`');
    match body.split_once('\n') {
        Some((first, rest)) if is_language_tag(first) => rest.to_string(),
        _ => body.to_string(),
    }
}

fn is_language_tag(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || LANGUAGE_TAG.is_match(line)
}

fn render_findings(findings: &[String]) -> String {
    findings
        .iter()
        .map(|f| format!("- {}", f))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Condense `summaries` into one cleaned summary. Never fails.
pub async fn summarize(client: &dyn LlmClient, summaries: &[String]) -> String {
    let no_results = [NO_RESULTS.to_string()];
    let findings = if summaries.is_empty() {
        &no_results[..]
    } else {
        summaries
    };

    let messages = vec![
        Message::system(SUMMARY_SYSTEM_PROMPT),
        Message::user(format!(
            "Summarize these findings clearly:\n{}",
            render_findings(findings)
        )),
    ];

    match client.complete(messages).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::warn!(error = %e, "summarization request failed");
            SUMMARY_FALLBACK.to_string()
        }
    }
}

/// Ask the model for a runnable script for `objective`, fences removed.
/// Never fails.
pub async fn write_script(client: &dyn LlmClient, objective: &str) -> String {
    let messages = vec![
        Message::system(SCRIPT_SYSTEM_PROMPT),
        Message::user(format!(
            "Write a runnable Python script that completes this objective:\n\n{}\n\nEnsure it is executable as-is.",
            objective
        )),
    ];

    let script = match client.complete(messages).await {
        Ok(script) => script,
        Err(e) => {
            tracing::warn!(error = %e, "script request failed");
            SCRIPT_FALLBACK.to_string()
        }
    };
    strip_code_fences(&script)
}
