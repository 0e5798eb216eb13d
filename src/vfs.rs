// ABOUTME: VirtualFileSystem - process-local map from logical path to content.
// ABOUTME: Mirrors artifact writes in memory for the duration of one run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One find/replace pair. Every occurrence of `find` is replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindReplace {
    pub find: String,
    pub replace: String,
}

/// An edit request: either a whole-content replacement or an ordered list of
/// find/replace pairs applied left to right.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Edits {
    Replace(String),
    FindReplace(Vec<FindReplace>),
}

impl Edits {
    /// Apply the edits to `content`, returning the new content.
    pub fn apply(&self, content: &str) -> String {
        match self {
            Edits::Replace(new_content) => new_content.clone(),
            Edits::FindReplace(pairs) => pairs.iter().fold(content.to_string(), |acc, pair| {
                if pair.find.is_empty() {
                    acc
                } else {
                    acc.replace(&pair.find, &pair.replace)
                }
            }),
        }
    }
}

impl From<&str> for Edits {
    fn from(content: &str) -> Self {
        Edits::Replace(content.to_string())
    }
}

/// Receipt returned by `write`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteReceipt {
    pub path: String,
    pub bytes_written: usize,
}

/// Receipt returned by `edit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditReceipt {
    pub path: String,
    pub content: String,
}

/// In-memory file store owned by a single run.
#[derive(Debug, Default, Clone)]
pub struct VirtualFileSystem {
    files: BTreeMap<String, String>,
}

impl VirtualFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content at `path`, or an empty string when nothing was written there.
    pub fn read(&self, path: &str) -> String {
        self.files.get(path).cloned().unwrap_or_default()
    }

    pub fn write(&mut self, path: &str, content: &str) -> WriteReceipt {
        self.files.insert(path.to_string(), content.to_string());
        WriteReceipt {
            path: path.to_string(),
            bytes_written: content.len(),
        }
    }

    /// Edit `path` in place. A missing path is edited as if it were empty.
    pub fn edit(&mut self, path: &str, edits: &Edits) -> EditReceipt {
        let content = edits.apply(&self.read(path));
        self.files.insert(path.to_string(), content.clone());
        EditReceipt {
            path: path.to_string(),
            content,
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Logical paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
