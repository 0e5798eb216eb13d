// ABOUTME: ExecuteCodeTool - runs a Python snippet in a fresh scope via an
// ABOUTME: interpreter subprocess and returns the resulting bindings as strings.

use std::collections::BTreeMap;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use crate::tool::{Tool, ToolResult};

/// Runs the snippet read from stdin with empty globals and a fresh locals
/// mapping. The snippet's own stdout is redirected to stderr so the last
/// stdout line is always the JSON outcome.
const HARNESS: &str = r#"
import contextlib, json, sys
source = sys.stdin.read()
scope = {}
try:
    with contextlib.redirect_stdout(sys.stderr):
        exec(source, {}, scope)
except BaseException as exc:
    outcome = {"success": False, "error": str(exc)}
else:
    outcome = {"success": True, "result": {k: str(v) for k, v in scope.items()}}
sys.stdout.write(json.dumps(outcome))
"#;

/// Outcome of one snippet execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CodeOutcome {
    pub fn ok(result: BTreeMap<String, String>) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }
}

/// Tool for executing Python snippets.
pub struct ExecuteCodeTool {
    interpreter: String,
    timeout: Duration,
}

impl Default for ExecuteCodeTool {
    fn default() -> Self {
        Self::new("python3")
    }
}

impl ExecuteCodeTool {
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn run(&self, code: &str) -> CodeOutcome {
        let mut cmd = tokio::process::Command::new(&self.interpreter);
        cmd.arg("-c").arg(HARNESS);
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                return CodeOutcome::failed(format!(
                    "Failed to start interpreter '{}': {}",
                    self.interpreter, e
                ));
            }
        };

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(code.as_bytes()).await {
                return CodeOutcome::failed(format!("Failed to send code: {}", e));
            }
        }

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return CodeOutcome::failed(format!("Interpreter failed: {}", e)),
            Err(_) => {
                return CodeOutcome::failed(format!(
                    "Execution timed out after {}s",
                    self.timeout.as_secs()
                ));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let last_line = stdout.lines().rev().find(|l| !l.trim().is_empty());

        match last_line.map(serde_json::from_str::<CodeOutcome>) {
            Some(Ok(outcome)) => outcome,
            _ => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                CodeOutcome::failed(format!(
                    "Interpreter exited with code {} without an outcome: {}",
                    output.status.code().unwrap_or(-1),
                    stderr.trim()
                ))
            }
        }
    }
}

#[async_trait]
impl Tool for ExecuteCodeTool {
    fn name(&self) -> &str {
        "execute_code"
    }

    fn description(&self) -> &str {
        "Execute a Python snippet in an isolated scope. Returns the variables it \
         defined, rendered as strings, or the error it raised."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "code": {
                    "type": "string",
                    "description": "The Python source to execute"
                }
            },
            "required": ["code"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, anyhow::Error> {
        #[derive(Deserialize)]
        struct Params {
            code: String,
        }
        let params: Params = serde_json::from_value(params)?;

        let outcome = self.run(&params.code).await;
        if outcome.success {
            Ok(ToolResult::json("outcome", outcome))
        } else {
            let message = outcome.error.clone().unwrap_or_default();
            Ok(ToolResult::error(message).with_metadata("outcome", outcome))
        }
    }
}
