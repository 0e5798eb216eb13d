// ABOUTME: ArtifactStore - durable one-file-per-artifact persistence, plus
// ABOUTME: filename sanitization with a random suffix for uniqueness.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::ArtifactError;

/// Default directory for persisted artifacts.
pub const DEFAULT_ARTIFACT_DIR: &str = "./artifacts";

/// Default bound on the sanitized part of a filename, in characters.
pub const DEFAULT_MAX_FILENAME_LENGTH: usize = 40;

/// Length of the random hex suffix appended by `sanitize_filename`.
pub const SUFFIX_LENGTH: usize = 8;

/// Turn free text into a filesystem-safe, unique filename stem.
///
/// The text is truncated to `max_length` characters, spaces become `_`,
/// colons are dropped and any other path-unsafe character becomes `_`.
/// A random `_xxxxxxxx` suffix is appended, so two calls with the same
/// input share a prefix but never the full name.
pub fn sanitize_filename(text: &str, max_length: usize) -> String {
    let safe: String = text
        .chars()
        .take(max_length)
        .filter(|c| *c != ':')
        .map(|c| match c {
            c if c.is_alphanumeric() => c,
            '-' | '_' | '.' => c,
            _ => '_',
        })
        .collect();

    let id = Uuid::new_v4().simple().to_string();
    format!("{}_{}", safe, &id[..SUFFIX_LENGTH])
}

/// Durable artifact storage rooted at one directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Absolute path `filename` resolves to. Relative names land under the
    /// store directory; absolute paths are taken as given.
    pub fn path_for(&self, filename: &str) -> PathBuf {
        let path = self.dir.join(filename);
        std::path::absolute(&path).unwrap_or(path)
    }

    /// Write `content` to `filename` inside the store, creating directories
    /// on demand. Overwrites an existing file of the same name.
    pub fn persist(&self, filename: &str, content: &str) -> Result<PathBuf, ArtifactError> {
        let path = self.path_for(filename);
        let parent = path.parent().unwrap_or(&self.dir).to_path_buf();
        std::fs::create_dir_all(&parent).map_err(|source| ArtifactError::Io {
            path: parent,
            source,
        })?;

        std::fs::write(&path, content).map_err(|source| ArtifactError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(path = %path.display(), bytes = content.len(), "persisted artifact");
        Ok(path)
    }

    /// Read back a stored file.
    pub fn load(&self, filename: &str) -> Result<String, ArtifactError> {
        let path = self.path_for(filename);
        std::fs::read_to_string(&path).map_err(|source| ArtifactError::Read { path, source })
    }
}

impl Default for ArtifactStore {
    fn default() -> Self {
        Self::new(DEFAULT_ARTIFACT_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn split_suffix(name: &str) -> (&str, &str) {
        name.split_at(name.len() - SUFFIX_LENGTH - 1)
    }

    #[test]
    fn test_sanitize_replaces_unsafe_characters() {
        let name = sanitize_filename("Search for information about: a/b\\c", 40);
        let (prefix, suffix) = split_suffix(&name);

        assert_eq!(prefix, "Search_for_information_about_a_b_c");
        assert!(suffix.starts_with('_'));
        assert!(suffix[1..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_sanitize_truncates_before_replacing() {
        let name = sanitize_filename("abcdefghij", 4);
        let (prefix, _) = split_suffix(&name);
        assert_eq!(prefix, "abcd");
    }

    #[test]
    fn test_sanitize_counts_characters_not_bytes() {
        let name = sanitize_filename("ééééé", 3);
        let (prefix, _) = split_suffix(&name);
        assert_eq!(prefix, "ééé");
    }

    #[test]
    fn test_sanitize_same_prefix_different_names() {
        let a = sanitize_filename("clean_summary", DEFAULT_MAX_FILENAME_LENGTH);
        let b = sanitize_filename("clean_summary", DEFAULT_MAX_FILENAME_LENGTH);

        assert_ne!(a, b);
        assert_eq!(split_suffix(&a).0, split_suffix(&b).0);
        assert_eq!(split_suffix(&a).0, "clean_summary");
    }

    #[test]
    fn test_persist_creates_directory() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path().join("nested").join("artifacts"));

        let path = store.persist("note.txt", "hello").unwrap();

        assert!(path.is_absolute());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn test_persist_overwrites_same_name() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());

        store.persist("generated_script.py", "print(1)\n").unwrap();
        let path = store.persist("generated_script.py", "print(2)\n").unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "print(2)\n");
    }

    #[test]
    fn test_nested_names_resolve_under_dir() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());

        let path = store.persist("notes/today.txt", "hi").unwrap();

        assert!(path.starts_with(std::path::absolute(dir.path()).unwrap()));
        assert_eq!(store.load("notes/today.txt").unwrap(), "hi");
    }

    #[test]
    fn test_absolute_names_are_kept() {
        let dir = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let target = elsewhere.path().join("out.txt");
        let store = ArtifactStore::new(dir.path());

        let path = store.persist(target.to_str().unwrap(), "x").unwrap();

        assert_eq!(path, target);
        assert!(!dir.path().join("out.txt").exists());
    }

    #[test]
    fn test_load_missing() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        let err = store.load("absent.txt").unwrap_err();
        assert!(matches!(err, ArtifactError::Read { .. }));
    }

    #[test]
    fn test_persist_reports_io_failure() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        let store = ArtifactStore::new(&blocker);
        let err = store.persist("a.txt", "y").unwrap_err();
        assert!(matches!(err, ArtifactError::Io { .. }));
    }
}
