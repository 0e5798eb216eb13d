// ABOUTME: WriteFileTool - stores content as an artifact in the run's artifact store.
// ABOUTME: Relative paths land under the artifact directory; reports bytes written.

use async_trait::async_trait;
use serde::Deserialize;

use crate::artifact::ArtifactStore;
use crate::tool::{Tool, ToolResult};
use crate::vfs::WriteReceipt;

/// Writes artifacts to durable storage.
pub struct WriteFileTool {
    store: ArtifactStore,
}

impl WriteFileTool {
    pub fn new(store: ArtifactStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Store content as an artifact. Overwrites an artifact of the same name."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Artifact name, relative to the artifact directory"
                },
                "content": {
                    "type": "string",
                    "description": "Text to store"
                }
            },
            "required": ["path", "content"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, anyhow::Error> {
        #[derive(Deserialize)]
        struct Params {
            path: String,
            content: String,
        }
        let Params { path, content } = serde_json::from_value(params)?;

        Ok(match self.store.persist(&path, &content) {
            Ok(stored) => ToolResult::json(
                "receipt",
                WriteReceipt {
                    path: stored.display().to_string(),
                    bytes_written: content.len(),
                },
            ),
            Err(e) => ToolResult::error(e.to_string()),
        })
    }
}
