// ABOUTME: GraphState and Task - the single mutable record threaded through a run,
// ABOUTME: with the todo/completed queues that drive the supervisor loop.

use std::collections::{BTreeMap, VecDeque};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// What the supervisor does with a task's results once it completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Collect search hits into summaries.
    Search,
    /// Condense summaries into one cleaned summary.
    Summarize,
    /// Generate the objective's Python script.
    WriteScript,
    /// Run through a subagent with no extra folding.
    General,
}

/// A unit of work handed to a subagent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub kind: TaskKind,
    pub description: String,
}

impl Task {
    pub fn new(kind: TaskKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
        }
    }

    pub fn general(description: impl Into<String>) -> Self {
        Self::new(TaskKind::General, description)
    }

    /// The three tasks every objective starts with.
    pub fn canonical(objective: &str) -> Vec<Task> {
        vec![
            Task::new(
                TaskKind::Search,
                format!("Search for information about: {}", objective),
            ),
            Task::new(TaskKind::Summarize, "Summarize top findings"),
            Task::new(
                TaskKind::WriteScript,
                "Write a Python script based on the objective",
            ),
        ]
    }
}

/// Where a run is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Seeding,
    Draining,
    Done,
}

/// State of one supervised run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphState {
    objective: String,
    todos: VecDeque<Task>,
    completed: Vec<Task>,

    /// Artifact filename to durable path. Later writes to a name win.
    pub artifacts: BTreeMap<String, PathBuf>,

    /// Human-readable findings, replaced wholesale by summarization.
    pub summaries: Vec<String>,

    /// One serialized execution record per processed task.
    pub subagent_logs: Vec<String>,

    pub python_script: Option<String>,

    #[serde(skip)]
    seeded: bool,
}

impl GraphState {
    pub fn new(objective: impl Into<String>) -> Self {
        Self {
            objective: objective.into(),
            todos: VecDeque::new(),
            completed: Vec::new(),
            artifacts: BTreeMap::new(),
            summaries: Vec::new(),
            subagent_logs: Vec::new(),
            python_script: None,
            seeded: false,
        }
    }

    /// Start from a caller-provided queue instead of the canonical tasks.
    /// The state counts as seeded.
    pub fn with_tasks(objective: impl Into<String>, tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut state = Self::new(objective);
        state.todos.extend(tasks);
        state.seeded = true;
        state
    }

    pub fn objective(&self) -> &str {
        &self.objective
    }

    pub fn todos(&self) -> &VecDeque<Task> {
        &self.todos
    }

    pub fn completed(&self) -> &[Task] {
        &self.completed
    }

    /// The task processed next.
    pub fn head(&self) -> Option<&Task> {
        self.todos.front()
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    pub fn phase(&self) -> Phase {
        if !self.seeded && self.todos.is_empty() {
            Phase::Seeding
        } else if self.todos.is_empty() {
            Phase::Done
        } else {
            Phase::Draining
        }
    }

    /// Enqueue the canonical tasks and clear every accumulator. Does nothing
    /// once the state has been seeded or already holds tasks.
    pub fn seed(&mut self) -> bool {
        if self.seeded || !self.todos.is_empty() {
            self.seeded = true;
            return false;
        }

        self.todos = Task::canonical(&self.objective).into();
        self.completed.clear();
        self.subagent_logs.clear();
        self.artifacts.clear();
        self.summaries.clear();
        self.seeded = true;
        true
    }

    /// Move the head task to `completed` and append follow-ups to the tail.
    pub fn complete_head(&mut self, new_tasks: impl IntoIterator<Item = Task>) -> Option<&Task> {
        let done = self.todos.pop_front()?;
        self.todos.extend(new_tasks);
        self.completed.push(done);
        self.completed.last()
    }
}
