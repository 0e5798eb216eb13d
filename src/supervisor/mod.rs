// ABOUTME: Supervisor - seeds the task queue for an objective, drains it through
// ABOUTME: subagents, folds each result into GraphState, and writes the final output.

mod fold;
mod state;

pub use fold::*;
pub use state::*;

use std::path::PathBuf;
use std::sync::Arc;

use crate::artifact::{ArtifactStore, DEFAULT_MAX_FILENAME_LENGTH, sanitize_filename};
use crate::error::SupervisorError;
use crate::llm::LlmClient;
use crate::subagent::{DEFAULT_ALLOWED_TOOLS, ExecutionRecord, SubagentExecutor};
use crate::tool::Registry;
use crate::vfs::VirtualFileSystem;

/// Name of the terminal state dump inside the artifact directory.
pub const FINAL_OUTPUT_FILENAME: &str = "final_output.txt";

/// Tunables applied to every task.
#[derive(Debug, Clone)]
pub struct SupervisorOptions {
    /// Tools granted to each subagent, in dispatch order.
    pub allowed_tools: Vec<String>,

    /// Recorded on each execution record.
    pub retry_budget: u32,
}

impl Default for SupervisorOptions {
    fn default() -> Self {
        Self {
            allowed_tools: DEFAULT_ALLOWED_TOOLS.iter().map(|t| t.to_string()).collect(),
            retry_budget: 2,
        }
    }
}

/// Drives one objective from seeding to the final output.
pub struct Supervisor {
    client: Arc<dyn LlmClient>,
    executor: SubagentExecutor,
    options: SupervisorOptions,
}

impl Supervisor {
    pub fn new(client: Arc<dyn LlmClient>, registry: Registry, store: ArtifactStore) -> Self {
        let executor = SubagentExecutor::new(Arc::clone(&client), registry, store);
        Self {
            client,
            executor,
            options: SupervisorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SupervisorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &SupervisorOptions {
        &self.options
    }

    pub fn store(&self) -> &ArtifactStore {
        self.executor.store()
    }

    /// Run `objective` to completion and return the terminal state.
    pub async fn run(&self, objective: &str) -> Result<GraphState, SupervisorError> {
        self.run_state(GraphState::new(objective)).await
    }

    /// Run a prepared state to completion. A state that already holds tasks
    /// is drained as-is.
    pub async fn run_state(&self, mut state: GraphState) -> Result<GraphState, SupervisorError> {
        tracing::info!(objective = state.objective(), "starting run");
        let mut vfs = VirtualFileSystem::new();

        self.seed(&mut state);
        self.drain(&mut state, &mut vfs).await;

        let out = self.write_final_output(&state)?;
        tracing::info!(path = %out.display(), tasks = state.completed().len(), "run finished");
        Ok(state)
    }

    /// Seed the canonical tasks unless the state was already seeded.
    pub fn seed(&self, state: &mut GraphState) {
        if state.seed() {
            tracing::debug!(tasks = state.todos().len(), "seeded task queue");
        }
    }

    /// Process tasks until the queue is empty.
    pub async fn drain(&self, state: &mut GraphState, vfs: &mut VirtualFileSystem) {
        while self.step(state, vfs).await.is_some() {}
    }

    /// Process the head task and move it to `completed`. Returns the task
    /// that was processed, or `None` when the queue was empty.
    pub async fn step(&self, state: &mut GraphState, vfs: &mut VirtualFileSystem) -> Option<Task> {
        let task = state.head()?.clone();
        tracing::info!(task = %task.description, kind = ?task.kind, "running task");

        let outcome = self
            .executor
            .execute(
                &task.description,
                &self.options.allowed_tools,
                self.options.retry_budget,
                vfs,
            )
            .await;

        let follow_ups = match outcome {
            Ok(record) => {
                state.subagent_logs.push(render_record(&record));
                state.artifacts.extend(record.artifacts.clone());
                self.fold(&task, &record, state, vfs).await
            }
            Err(e) => {
                tracing::warn!(task = %task.description, error = %e, "subagent failed");
                let entry = serde_json::json!({
                    "task": task.description,
                    "error": e.to_string(),
                });
                state.subagent_logs.push(entry.to_string());
                Vec::new()
            }
        };

        state.complete_head(follow_ups);
        Some(task)
    }

    /// Apply a completed task's results to the state. Returns follow-up tasks.
    async fn fold(
        &self,
        task: &Task,
        record: &ExecutionRecord,
        state: &mut GraphState,
        vfs: &mut VirtualFileSystem,
    ) -> Vec<Task> {
        match task.kind {
            TaskKind::Search => {
                state.summaries.extend(search_summaries(record));
            }
            TaskKind::Summarize => {
                let summary = summarize(self.client.as_ref(), &state.summaries).await;
                state.summaries = vec![summary.clone()];

                let name = format!(
                    "{}.txt",
                    sanitize_filename(SUMMARY_BASENAME, DEFAULT_MAX_FILENAME_LENGTH)
                );
                self.save(state, vfs, &name, &summary);
            }
            TaskKind::WriteScript => {
                let script = write_script(self.client.as_ref(), state.objective()).await;
                self.save(state, vfs, SCRIPT_FILENAME, &script);
                state.python_script = Some(script);
            }
            TaskKind::General => {}
        }
        Vec::new()
    }

    /// Persist, then mirror into the VFS. Persistence failures are logged
    /// and leave both the VFS and `state.artifacts` untouched.
    fn save(&self, state: &mut GraphState, vfs: &mut VirtualFileSystem, name: &str, content: &str) {
        match self.store().persist(name, content) {
            Ok(path) => {
                vfs.write(name, content);
                state.artifacts.insert(name.to_string(), path);
            }
            Err(e) => tracing::warn!(artifact = name, error = %e, "failed to persist artifact"),
        }
    }

    /// Dump the state as pretty JSON to `final_output.txt`.
    pub fn write_final_output(&self, state: &GraphState) -> Result<PathBuf, SupervisorError> {
        let content = serde_json::to_string_pretty(state).map_err(crate::error::ArtifactError::from)?;
        Ok(self.store().persist(FINAL_OUTPUT_FILENAME, &content)?)
    }
}

fn render_record(record: &ExecutionRecord) -> String {
    serde_json::to_string_pretty(record).unwrap_or_else(|_| format!("{:?}", record))
}
