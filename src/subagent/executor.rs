// ABOUTME: SubagentExecutor - asks the model for a plan, then performs the side
// ABOUTME: effects the caller allowed and returns the full execution record.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use super::{ExecutionRecord, Plan, StepResult, ToolPolicy, build_prompt, PLAN_SYSTEM_PROMPT};
use crate::artifact::{ArtifactStore, DEFAULT_MAX_FILENAME_LENGTH, sanitize_filename};
use crate::error::{ArtifactError, SupervisorError};
use crate::llm::{LlmClient, Message};
use crate::tool::Registry;
use crate::tools::{CodeOutcome, SearchResult};
use crate::vfs::VirtualFileSystem;

/// Runs one task as a subagent.
pub struct SubagentExecutor {
    client: Arc<dyn LlmClient>,
    registry: Registry,
    store: ArtifactStore,
}

impl SubagentExecutor {
    pub fn new(client: Arc<dyn LlmClient>, registry: Registry, store: ArtifactStore) -> Self {
        Self {
            client,
            registry,
            store,
        }
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Execute `task` with the given allowed tools.
    ///
    /// Model and tool failures are recorded in the returned record. The only
    /// error surfaced to the caller is a failure to persist the placeholder
    /// artifact written when nothing else was produced.
    pub async fn execute(
        &self,
        task: &str,
        allowed: &[String],
        retry_budget: u32,
        vfs: &mut VirtualFileSystem,
    ) -> Result<ExecutionRecord, SupervisorError> {
        let prompt = build_prompt(task, allowed);
        let messages = vec![Message::system(PLAN_SYSTEM_PROMPT), Message::user(&prompt)];

        let (plan_text, plan) = match self.client.complete(messages).await {
            Ok(text) => {
                let plan = Plan::parse_or_fallback(&text, allowed);
                (text, plan)
            }
            Err(e) => {
                tracing::warn!(task, error = %e, "plan request failed, using fallback plan");
                ("{}".to_string(), Plan::fallback(allowed))
            }
        };

        let policy = ToolPolicy::new(allowed.iter().cloned()).with_requested(&plan.tools);
        let denied = policy.denied_requests();
        if !denied.is_empty() {
            tracing::debug!(task, ?denied, "plan requested tools outside the allowed set");
        }

        let mut steps = Steps::new(&self.store, vfs);

        if let Some(inline) = plan.inline_results() {
            let value = serde_json::Value::Object(inline.clone());
            match serde_json::to_string_pretty(&value) {
                Ok(content) => {
                    steps.save_or_record("inline_results", &content);
                }
                Err(e) => steps.record_artifact_error(ArtifactError::from(e)),
            }
            steps.push(StepResult::InlineResults(value));
        }

        if let Some(code) = plan.code().filter(|_| policy.allows("execute_code")) {
            let step = self.run_code(code).await;
            let succeeded = matches!(step, StepResult::ExecuteCode(_));
            steps.push(step);
            if succeeded {
                steps.save_or_record("subagent_code", code);
            }
        }

        for tool in &policy.allowed {
            match tool.as_str() {
                "write_file" => {
                    let content = format!("Artifact for task: {}\nnotes: {}", task, plan.notes);
                    if let Some(name) = steps.save_or_record(&format!("{}_write", task), &content)
                    {
                        steps.note = Some(name.clone());
                        steps.push(StepResult::WriteFile(name));
                    }
                }
                "read_file" => {
                    let content = steps
                        .note
                        .as_deref()
                        .map(|name| steps.vfs.read(name))
                        .unwrap_or_default();
                    steps.push(StepResult::ReadFile(content));
                }
                "search_internet" => {
                    let step = self.run_search(task).await;
                    if let StepResult::SearchInternet(hits) = &step {
                        match serde_json::to_string_pretty(hits) {
                            Ok(content) => {
                                steps.save_or_record(&format!("{}_search", task), &content);
                            }
                            Err(e) => steps.record_artifact_error(ArtifactError::from(e)),
                        }
                    }
                    steps.push(step);
                }
                _ => {}
            }
        }

        if steps.artifacts.is_empty() {
            steps.save(&format!("{}_none", task), &format!("No artifacts for {}", task))?;
        }

        let Steps {
            results, artifacts, ..
        } = steps;

        Ok(ExecutionRecord {
            prompt,
            plan_text,
            plan,
            task: task.to_string(),
            tools_used: policy.allowed,
            requested_tools: policy.requested,
            retry_budget,
            results,
            artifacts,
        })
    }

    async fn run_code(&self, code: &str) -> StepResult {
        let params = serde_json::json!({ "code": code });
        match self.registry.dispatch("execute_code", params).await {
            Ok(result) => match result.metadata_as::<CodeOutcome>("outcome") {
                Some(outcome) if outcome.success && !result.is_error => {
                    StepResult::ExecuteCode(outcome)
                }
                Some(outcome) => StepResult::ExecuteCodeError(
                    outcome.error.unwrap_or_else(|| result.content.clone()),
                ),
                None if result.is_error => StepResult::ExecuteCodeError(result.content),
                None => StepResult::ExecuteCodeError(format!(
                    "execute_code returned no outcome: {}",
                    result.content
                )),
            },
            Err(e) => StepResult::ExecuteCodeError(e.to_string()),
        }
    }

    async fn run_search(&self, query: &str) -> StepResult {
        let params = serde_json::json!({ "query": query });
        match self.registry.dispatch("search_internet", params).await {
            Ok(result) if result.is_error => StepResult::SearchInternetError(result.content),
            Ok(result) => match result.metadata_as::<Vec<SearchResult>>("results") {
                Some(hits) => StepResult::SearchInternet(hits),
                None => StepResult::SearchInternetError(format!(
                    "search_internet returned no results payload: {}",
                    result.content
                )),
            },
            Err(e) => StepResult::SearchInternetError(e.to_string()),
        }
    }
}

/// Accumulates step results and the artifacts they produced.
struct Steps<'a> {
    store: &'a ArtifactStore,
    vfs: &'a mut VirtualFileSystem,
    results: Vec<StepResult>,
    artifacts: BTreeMap<String, PathBuf>,

    /// Name of the note written by `write_file` in this execution.
    note: Option<String>,
}

impl<'a> Steps<'a> {
    fn new(store: &'a ArtifactStore, vfs: &'a mut VirtualFileSystem) -> Self {
        Self {
            store,
            vfs,
            results: Vec::new(),
            artifacts: BTreeMap::new(),
            note: None,
        }
    }

    fn push(&mut self, step: StepResult) {
        self.results.push(step);
    }

    /// Write `content` under a sanitized `base` name to both the VFS and the
    /// store, returning the filename.
    fn save(&mut self, base: &str, content: &str) -> Result<String, ArtifactError> {
        let name = format!("{}.txt", sanitize_filename(base, DEFAULT_MAX_FILENAME_LENGTH));
        let path = self.store.persist(&name, content)?;
        self.vfs.write(&name, content);
        self.artifacts.insert(name.clone(), path);
        Ok(name)
    }

    fn save_or_record(&mut self, base: &str, content: &str) -> Option<String> {
        match self.save(base, content) {
            Ok(name) => Some(name),
            Err(e) => {
                self.record_artifact_error(e);
                None
            }
        }
    }

    fn record_artifact_error(&mut self, error: ArtifactError) {
        tracing::warn!(error = %error, "failed to persist artifact");
        self.results.push(StepResult::ArtifactError(error.to_string()));
    }
}
