// ABOUTME: ReadFileTool - reads an artifact back from the run's artifact store.
// ABOUTME: Relative paths resolve under the artifact directory.

use async_trait::async_trait;
use serde::Deserialize;

use crate::artifact::ArtifactStore;
use crate::tool::{Tool, ToolResult};

/// Reads stored artifacts as text.
pub struct ReadFileTool {
    store: ArtifactStore,
}

impl ReadFileTool {
    pub fn new(store: ArtifactStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read a stored artifact as text. Relative paths are looked up in the artifact directory."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Artifact name, relative to the artifact directory"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, anyhow::Error> {
        #[derive(Deserialize)]
        struct Params {
            path: String,
        }
        let Params { path } = serde_json::from_value(params)?;

        Ok(match self.store.load(&path) {
            Ok(content) => ToolResult::text(content)
                .with_metadata("path", self.store.path_for(&path)),
            Err(e) => ToolResult::error(e.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reads_artifact_by_name() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        store.persist("summary_ab12cd34.txt", "findings").unwrap();

        let result = ReadFileTool::new(store)
            .execute(serde_json::json!({"path": "summary_ab12cd34.txt"}))
            .await
            .unwrap();

        assert!(!result.is_error, "Error: {}", result.content);
        assert_eq!(result.content, "findings");
        let path: std::path::PathBuf = result.metadata_as("path").unwrap();
        assert!(path.ends_with("summary_ab12cd34.txt"));
    }

    #[tokio::test]
    async fn test_missing_artifact_is_error_result() {
        let dir = TempDir::new().unwrap();
        let result = ReadFileTool::new(ArtifactStore::new(dir.path()))
            .execute(serde_json::json!({"path": "never_written.txt"}))
            .await
            .unwrap();

        assert!(result.is_error);
        assert!(result.content.contains("Failed to read artifact"));
    }

    #[tokio::test]
    async fn test_path_is_required() {
        let dir = TempDir::new().unwrap();
        let tool = ReadFileTool::new(ArtifactStore::new(dir.path()));
        assert!(tool.execute(serde_json::json!({})).await.is_err());
    }
}
