// ABOUTME: ExecutionRecord and StepResult - the audit trail of one subagent run.
// ABOUTME: Each step serializes as a single-key object such as {"execute_code_error": "..."}.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::Plan;
use crate::tools::{CodeOutcome, SearchResult};

/// One ordered entry in an execution record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepResult {
    InlineResults(serde_json::Value),
    ExecuteCode(CodeOutcome),
    ExecuteCodeError(String),
    /// Filename of the note artifact written for the task.
    WriteFile(String),
    ReadFile(String),
    SearchInternet(Vec<SearchResult>),
    SearchInternetError(String),
    /// A step produced content that could not be persisted.
    ArtifactError(String),
}

/// Everything one subagent execution did, in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub prompt: String,

    /// Raw model output, or `{}` when the transport failed.
    pub plan_text: String,
    pub plan: Plan,
    pub task: String,

    /// Tools whose side effects were performed (the allowed set).
    pub tools_used: Vec<String>,

    /// Tools the plan asked for. Recorded for audit only.
    pub requested_tools: Vec<String>,

    /// Budget handed to the executor. Recorded; the executor makes a single
    /// model attempt.
    pub retry_budget: u32,

    pub results: Vec<StepResult>,
    pub artifacts: BTreeMap<String, PathBuf>,
}

impl ExecutionRecord {
    /// All search hits gathered during the execution, in order.
    pub fn search_hits(&self) -> impl Iterator<Item = &SearchResult> {
        self.results.iter().flat_map(|r| match r {
            StepResult::SearchInternet(hits) => hits.as_slice(),
            _ => &[][..],
        })
    }
}
