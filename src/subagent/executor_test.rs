// ABOUTME: Tests for SubagentExecutor - plan fallback, tool policy, side effects,
// ABOUTME: and artifact bookkeeping, using a scripted client and mock tools.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use super::*;
use crate::artifact::ArtifactStore;
use crate::error::{LlmError, SupervisorError};
use crate::llm::{LlmClient, Request, Response, StopReason, Usage};
use crate::tool::{Registry, Tool, ToolResult};
use crate::tools::{CodeOutcome, SearchResult};
use crate::vfs::VirtualFileSystem;

/// Replays canned replies; `None` simulates a transport failure.
struct ScriptedClient {
    replies: Mutex<VecDeque<Option<String>>>,
}

impl ScriptedClient {
    fn new(replies: impl IntoIterator<Item = Option<&'static str>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().map(|r| r.map(String::from)).collect()),
        })
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn create_message(&self, _req: &Request) -> Result<Response, LlmError> {
        let reply = self.replies.lock().unwrap().pop_front().flatten();
        match reply {
            Some(content) => Ok(Response {
                id: "test".into(),
                content,
                stop_reason: StopReason::EndTurn,
                model: "test".into(),
                usage: Usage::default(),
            }),
            None => Err(LlmError::Api {
                status: 503,
                message: "unavailable".into(),
            }),
        }
    }
}

struct MockCodeTool {
    outcome: CodeOutcome,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Tool for MockCodeTool {
    fn name(&self) -> &str {
        "execute_code"
    }

    fn description(&self) -> &str {
        "mock"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({"type": "object"})
    }

    async fn execute(&self, _params: serde_json::Value) -> Result<ToolResult, anyhow::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.outcome.success {
            Ok(ToolResult::json("outcome", &self.outcome))
        } else {
            Ok(ToolResult::error(self.outcome.error.clone().unwrap_or_default())
                .with_metadata("outcome", &self.outcome))
        }
    }
}

struct MockSearchTool {
    hits: Vec<SearchResult>,
}

#[async_trait]
impl Tool for MockSearchTool {
    fn name(&self) -> &str {
        "search_internet"
    }

    fn description(&self) -> &str {
        "mock"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({"type": "object"})
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, anyhow::Error> {
        assert!(params["query"].is_string());
        Ok(ToolResult::json("results", &self.hits))
    }
}

fn allowed(tools: &[&str]) -> Vec<String> {
    tools.iter().map(|t| t.to_string()).collect()
}

fn has_artifact(record: &ExecutionRecord, prefix: &str) -> bool {
    record.artifacts.keys().any(|k| k.starts_with(prefix))
}

fn executor(client: Arc<dyn LlmClient>, registry: Registry, dir: &TempDir) -> SubagentExecutor {
    SubagentExecutor::new(client, registry, ArtifactStore::new(dir.path()))
}

#[tokio::test]
async fn test_transport_failure_uses_fallback_plan() {
    let dir = TempDir::new().unwrap();
    let exec = executor(ScriptedClient::new([None]), Registry::new(), &dir);
    let mut vfs = VirtualFileSystem::new();

    let record = exec
        .execute("t", &allowed(&["read_file", "write_file"]), 2, &mut vfs)
        .await
        .unwrap();

    assert_eq!(record.plan_text, "{}");
    assert!(record.plan.is_fallback());
    assert_eq!(record.plan.tools, allowed(&["read_file", "write_file"]));
    assert_eq!(record.tools_used, allowed(&["read_file", "write_file"]));
    assert_eq!(record.retry_budget, 2);

    assert_eq!(record.results.len(), 2);
    assert_eq!(record.results[0], StepResult::ReadFile(String::new()));
    let StepResult::WriteFile(name) = &record.results[1] else {
        panic!("expected write_file step, got {:?}", record.results[1]);
    };
    assert!(name.starts_with("t_write_") && name.ends_with(".txt"));

    let path = &record.artifacts[name];
    let on_disk = std::fs::read_to_string(path).unwrap();
    assert_eq!(on_disk, "Artifact for task: t\nnotes: fallback plan");
    assert_eq!(vfs.read(name), on_disk);
}

#[tokio::test]
async fn test_undecodable_plan_keeps_raw_text() {
    let dir = TempDir::new().unwrap();
    let exec = executor(ScriptedClient::new([Some("not json")]), Registry::new(), &dir);
    let mut vfs = VirtualFileSystem::new();

    let record = exec.execute("t", &[], 0, &mut vfs).await.unwrap();

    assert_eq!(record.plan_text, "not json");
    assert!(record.plan.is_fallback());
}

#[tokio::test]
async fn test_inline_results_and_code_success() {
    let dir = TempDir::new().unwrap();
    let registry = Registry::new();
    let calls = Arc::new(AtomicUsize::new(0));
    registry
        .register(MockCodeTool {
            outcome: CodeOutcome::ok(BTreeMap::from([("x".to_string(), "1".to_string())])),
            calls: Arc::clone(&calls),
        })
        .await;
    let client = ScriptedClient::new([Some(
        r#"{"tools": [], "notes": "n", "results": {"answer": 42}, "code": "x = 1"}"#,
    )]);
    let exec = executor(client, registry, &dir);
    let mut vfs = VirtualFileSystem::new();

    let record = exec
        .execute("t", &allowed(&["execute_code"]), 2, &mut vfs)
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        record.results[0],
        StepResult::InlineResults(serde_json::json!({"answer": 42}))
    );
    let StepResult::ExecuteCode(outcome) = &record.results[1] else {
        panic!("expected execute_code step, got {:?}", record.results[1]);
    };
    assert_eq!(outcome.result.as_ref().unwrap()["x"], "1");

    assert!(has_artifact(&record, "inline_results_"));
    assert!(has_artifact(&record, "subagent_code_"));
    assert!(!has_artifact(&record, "t_none_"));

    let code_name = record
        .artifacts
        .keys()
        .find(|k| k.starts_with("subagent_code_"))
        .unwrap();
    assert_eq!(vfs.read(code_name), "x = 1");
}

#[tokio::test]
async fn test_null_notes_still_run_the_plan() {
    let dir = TempDir::new().unwrap();
    let registry = Registry::new();
    let calls = Arc::new(AtomicUsize::new(0));
    registry
        .register(MockCodeTool {
            outcome: CodeOutcome::ok(BTreeMap::new()),
            calls: Arc::clone(&calls),
        })
        .await;
    let client = ScriptedClient::new([Some(
        r#"{"tools": ["execute_code"], "notes": null, "results": {"k": 1}, "code": "x = 1"}"#,
    )]);
    let exec = executor(client, registry, &dir);
    let mut vfs = VirtualFileSystem::new();

    let record = exec
        .execute("t", &allowed(&["execute_code"]), 2, &mut vfs)
        .await
        .unwrap();

    assert!(!record.plan.is_fallback());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        record.results[0],
        StepResult::InlineResults(serde_json::json!({"k": 1}))
    );
    assert!(matches!(record.results[1], StepResult::ExecuteCode(_)));
}

#[tokio::test]
async fn test_code_failure_is_recorded() {
    let dir = TempDir::new().unwrap();
    let registry = Registry::new();
    registry
        .register(MockCodeTool {
            outcome: CodeOutcome::failed("name 'y' is not defined"),
            calls: Arc::new(AtomicUsize::new(0)),
        })
        .await;
    let client = ScriptedClient::new([Some(r#"{"code": "print(y)"}"#)]);
    let exec = executor(client, registry, &dir);
    let mut vfs = VirtualFileSystem::new();

    let record = exec
        .execute("t", &allowed(&["execute_code"]), 2, &mut vfs)
        .await
        .unwrap();

    assert_eq!(
        record.results,
        vec![StepResult::ExecuteCodeError("name 'y' is not defined".into())]
    );
    assert!(!has_artifact(&record, "subagent_code_"));
    assert!(has_artifact(&record, "t_none_"));
}

#[tokio::test]
async fn test_missing_code_tool_is_recorded() {
    let dir = TempDir::new().unwrap();
    let client = ScriptedClient::new([Some(r#"{"code": "x = 1"}"#)]);
    let exec = executor(client, Registry::new(), &dir);
    let mut vfs = VirtualFileSystem::new();

    let record = exec
        .execute("t", &allowed(&["execute_code"]), 2, &mut vfs)
        .await
        .unwrap();

    assert_eq!(
        record.results,
        vec![StepResult::ExecuteCodeError(
            "Tool not found: execute_code".into()
        )]
    );
}

#[tokio::test]
async fn test_requested_tools_do_not_grant_access() {
    let dir = TempDir::new().unwrap();
    let registry = Registry::new();
    let calls = Arc::new(AtomicUsize::new(0));
    registry
        .register(MockCodeTool {
            outcome: CodeOutcome::ok(BTreeMap::new()),
            calls: Arc::clone(&calls),
        })
        .await;
    let client = ScriptedClient::new([Some(
        r#"{"tools": ["execute_code", "write_file"], "code": "x = 1"}"#,
    )]);
    let exec = executor(client, registry, &dir);
    let mut vfs = VirtualFileSystem::new();

    let record = exec
        .execute("t", &allowed(&["read_file"]), 2, &mut vfs)
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(record.tools_used, allowed(&["read_file"]));
    assert_eq!(record.requested_tools, allowed(&["execute_code", "write_file"]));
    assert_eq!(record.results, vec![StepResult::ReadFile(String::new())]);
}

#[tokio::test]
async fn test_read_after_write_sees_note() {
    let dir = TempDir::new().unwrap();
    let client = ScriptedClient::new([Some(r#"{"notes": "n"}"#)]);
    let exec = executor(client, Registry::new(), &dir);
    let mut vfs = VirtualFileSystem::new();

    let record = exec
        .execute("t", &allowed(&["write_file", "read_file"]), 2, &mut vfs)
        .await
        .unwrap();

    assert_eq!(
        record.results[1],
        StepResult::ReadFile("Artifact for task: t\nnotes: n".into())
    );
}

#[tokio::test]
async fn test_search_results_are_recorded_and_persisted() {
    let dir = TempDir::new().unwrap();
    let registry = Registry::new();
    let hits = vec![SearchResult {
        title: "A".into(),
        url: "https://a".into(),
        snippet: "s".into(),
    }];
    registry.register(MockSearchTool { hits: hits.clone() }).await;
    let exec = executor(ScriptedClient::new([Some("{}")]), registry, &dir);
    let mut vfs = VirtualFileSystem::new();

    let record = exec
        .execute("find things", &allowed(&["search_internet"]), 2, &mut vfs)
        .await
        .unwrap();

    assert_eq!(record.results, vec![StepResult::SearchInternet(hits.clone())]);
    assert_eq!(record.search_hits().count(), 1);

    let name = record
        .artifacts
        .keys()
        .find(|k| k.starts_with("find_things_search_"))
        .unwrap();
    let saved: Vec<SearchResult> = serde_json::from_str(&vfs.read(name)).unwrap();
    assert_eq!(saved, hits);
}

#[tokio::test]
async fn test_missing_search_tool_is_recorded() {
    let dir = TempDir::new().unwrap();
    let exec = executor(ScriptedClient::new([Some("{}")]), Registry::new(), &dir);
    let mut vfs = VirtualFileSystem::new();

    let record = exec
        .execute("t", &allowed(&["search_internet"]), 2, &mut vfs)
        .await
        .unwrap();

    assert_eq!(
        record.results,
        vec![StepResult::SearchInternetError(
            "Tool not found: search_internet".into()
        )]
    );
    assert!(has_artifact(&record, "t_none_"));
}

#[tokio::test]
async fn test_no_artifacts_writes_placeholder() {
    let dir = TempDir::new().unwrap();
    let exec = executor(ScriptedClient::new([Some("{}")]), Registry::new(), &dir);
    let mut vfs = VirtualFileSystem::new();

    let record = exec.execute("idle", &[], 2, &mut vfs).await.unwrap();

    assert!(record.results.is_empty());
    assert_eq!(record.artifacts.len(), 1);
    let (name, path) = record.artifacts.iter().next().unwrap();
    assert!(name.starts_with("idle_none_"));
    assert_eq!(std::fs::read_to_string(path).unwrap(), "No artifacts for idle");
}

#[tokio::test]
async fn test_unwritable_store() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "x").unwrap();

    let exec = SubagentExecutor::new(
        ScriptedClient::new([Some("{}")]),
        Registry::new(),
        ArtifactStore::new(&blocker),
    );
    let mut vfs = VirtualFileSystem::new();

    let err = exec
        .execute("t", &allowed(&["write_file"]), 2, &mut vfs)
        .await
        .unwrap_err();

    assert!(matches!(err, SupervisorError::Artifact(_)));
    assert!(vfs.is_empty(), "unpersisted names: {:?}", vfs.paths().collect::<Vec<_>>());
}
