// ABOUTME: EditFileTool - applies a whole-content replacement or ordered
// ABOUTME: find/replace pairs to a stored artifact and reports a unified diff.

use async_trait::async_trait;
use serde::Deserialize;
use similar::TextDiff;

use crate::artifact::ArtifactStore;
use crate::tool::{Tool, ToolResult};
use crate::vfs::Edits;

/// Edits artifacts in durable storage.
///
/// `edits` is either a string (the new file content) or a list of
/// `{find, replace}` pairs applied left to right, each replacing every
/// occurrence.
pub struct EditFileTool {
    store: ArtifactStore,
}

impl EditFileTool {
    pub fn new(store: ArtifactStore) -> Self {
        Self { store }
    }
}

#[derive(Deserialize)]
struct EditParams {
    path: String,
    edits: Edits,
}

#[async_trait]
impl Tool for EditFileTool {
    fn name(&self) -> &str {
        "edit_file"
    }

    fn description(&self) -> &str {
        "Edit a file either by replacing its whole content or by applying a list of \
         find/replace pairs in order. Returns a unified diff of the change."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Artifact name, relative to the artifact directory"
                },
                "edits": {
                    "description": "New file content, or an ordered list of find/replace pairs",
                    "oneOf": [
                        { "type": "string" },
                        {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "find": { "type": "string" },
                                    "replace": { "type": "string" }
                                },
                                "required": ["find", "replace"]
                            }
                        }
                    ]
                }
            },
            "required": ["path", "edits"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, anyhow::Error> {
        let params: EditParams = serde_json::from_value(params)?;

        let old_content = match self.store.load(&params.path) {
            Ok(content) => content,
            Err(e) => return Ok(ToolResult::error(e.to_string())),
        };

        let new_content = params.edits.apply(&old_content);
        if let Err(e) = self.store.persist(&params.path, &new_content) {
            return Ok(ToolResult::error(e.to_string()));
        }

        let diff = TextDiff::from_lines(&old_content, &new_content)
            .unified_diff()
            .header(&params.path, &params.path)
            .to_string();

        Ok(ToolResult::text(diff.clone())
            .with_metadata("path", &params.path)
            .with_metadata("diff", diff))
    }
}
