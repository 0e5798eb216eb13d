// ABOUTME: Prelude module - convenient imports for common use cases.
// ABOUTME: Use `use objective_supervisor::prelude::*;` to get started quickly.

pub use crate::artifact::{ArtifactStore, sanitize_filename};
pub use crate::config::Settings;
pub use crate::error::{ArtifactError, ConfigError, LlmError, SupervisorError, ToolError};
pub use crate::llm::{
    LlmClient, Message, OpenRouterClient, Request, Response, Role, StopReason, Usage,
};
pub use crate::subagent::{
    ExecutionRecord, Plan, StepResult, SubagentExecutor, ToolPolicy, DEFAULT_ALLOWED_TOOLS,
};
pub use crate::supervisor::{
    GraphState, Phase, Supervisor, SupervisorOptions, Task, TaskKind, strip_code_fences,
};
pub use crate::tool::{Registry, Tool, ToolResult};
pub use crate::tools::{
    CodeOutcome, EditFileTool, ExecuteCodeTool, ReadFileTool, SearchInternetTool, SearchResult,
    WebScrapeTool, WriteFileTool, default_registry,
};
pub use crate::vfs::{Edits, FindReplace, VirtualFileSystem};
