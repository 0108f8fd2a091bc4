//! Document handles.
//!
//! # Responsibility
//! - Provide the snapshot handle the watcher queues and the store
//!   resolves back to a live document.
//!
//! # Invariants
//! - `id` is stable for the lifetime of the document and never reused.
//! - `path` is the path observed when the handle was taken; the store is
//!   the source of truth for the current path.

use uuid::Uuid;

/// Stable identifier for a document in the store.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type DocId = Uuid;

/// Snapshot reference to a note: stable id plus the path it had when the
/// snapshot was taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHandle {
    /// Stable document identity, valid across renames.
    pub id: DocId,
    /// Vault-relative path at snapshot time, e.g. `inbox/x.md`.
    pub path: String,
}

impl DocumentHandle {
    pub fn new(id: DocId, path: impl Into<String>) -> Self {
        Self {
            id,
            path: path.into(),
        }
    }

    /// File name with extension, e.g. `x.md`.
    pub fn file_name(&self) -> &str {
        match self.path.rfind('/') {
            Some(index) => &self.path[index + 1..],
            None => self.path.as_str(),
        }
    }

    /// Display name: the file name without its `.md` extension.
    pub fn basename(&self) -> &str {
        let name = self.file_name();
        name.strip_suffix(".md").unwrap_or(name)
    }

    /// Returns whether this handle points at a markdown note.
    pub fn is_markdown(&self) -> bool {
        self.path.ends_with(".md")
    }
}
