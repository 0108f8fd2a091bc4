//! Document store contract and in-memory implementation.
//!
//! # Responsibility
//! - Define the vault operations the filing core consumes from its host.
//! - Provide `MemoryVault`, a complete in-process store used by the
//!   integration tests and by headless hosts.
//!
//! # Invariants
//! - Store methods take `&self`; implementations handle their own
//!   interior mutability.
//! - A note path maps to exactly one `DocId` at any time.
//! - Moving a note updates the path index and the record atomically.

use crate::model::document::{DocId, DocumentHandle};
use crate::paths::{normalize_folder_path, parent_folder};
use crate::store::frontmatter::{self, Frontmatter};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type VaultResult<T> = Result<T, VaultError>;

/// Store-level failures surfaced to the filing core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    /// No document resolves to the given id or path.
    DocumentNotFound(String),
    /// A move or create referenced a folder that does not exist.
    FolderNotFound(String),
    /// The target path is already occupied.
    DestinationExists(String),
    /// The path exists but is not a folder.
    NotAFolder(String),
    /// The path is empty or otherwise unusable.
    InvalidPath(String),
}

impl Display for VaultError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DocumentNotFound(path) => write!(f, "document not found: {path}"),
            Self::FolderNotFound(path) => write!(f, "folder not found: {path}"),
            Self::DestinationExists(path) => write!(f, "destination already exists: {path}"),
            Self::NotAFolder(path) => write!(f, "path is not a folder: {path}"),
            Self::InvalidPath(path) => write!(f, "invalid vault path: `{path}`"),
        }
    }
}

impl Error for VaultError {}

/// Operations the filing core consumes from the document store.
///
/// Implementations use interior mutability so shared borrows can perform
/// mutations, matching how a connection-style backend behaves.
pub trait VaultStore {
    /// All folder paths, normalized, root excluded.
    fn list_folders(&self) -> Vec<String>;
    fn folder_exists(&self, path: &str) -> bool;
    /// Creates a folder and any missing ancestors. Idempotent when the
    /// folder already exists; fails when the path is held by a note.
    fn create_folder(&self, path: &str) -> VaultResult<()>;
    /// All markdown notes, ordered by path.
    fn list_notes(&self) -> Vec<DocumentHandle>;
    /// Resolves a path to a handle, when a note currently lives there.
    fn note_at(&self, path: &str) -> Option<DocumentHandle>;
    /// Resolves a stable id to the note's current path.
    fn note_path(&self, id: DocId) -> Option<String>;
    /// Relocates a note. The destination folder must exist and the
    /// destination path must be free. Reference redirection is the
    /// store's concern.
    fn move_note(&self, id: DocId, new_path: &str) -> VaultResult<()>;
    /// Moves a note to the store's trash.
    fn trash_note(&self, id: DocId) -> VaultResult<()>;
    /// Parsed frontmatter of a note; empty when the note has none.
    fn frontmatter(&self, id: DocId) -> VaultResult<Frontmatter>;
    /// Sets or replaces one frontmatter field.
    fn set_field(&self, id: DocId, key: &str, value: &str) -> VaultResult<()>;
    /// Removes one frontmatter field, if present.
    fn remove_field(&self, id: DocId, key: &str) -> VaultResult<()>;
}

#[derive(Debug)]
struct NoteRecord {
    path: String,
    content: String,
}

#[derive(Debug, Default)]
struct VaultInner {
    folders: BTreeSet<String>,
    notes: BTreeMap<DocId, NoteRecord>,
    paths: BTreeMap<String, DocId>,
    trashed: Vec<String>,
}

/// In-memory vault keyed by normalized paths.
#[derive(Debug, Default)]
pub struct MemoryVault {
    inner: RefCell<VaultInner>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a folder (and missing ancestors).
    pub fn add_folder(&self, path: &str) {
        let normalized = normalize_folder_path(path).to_string();
        if normalized.is_empty() {
            return;
        }
        register_folder(&mut self.inner.borrow_mut(), &normalized);
    }

    /// Adds a note with raw markdown content, registering its parent
    /// folders. Fails when the path is already occupied.
    pub fn add_note(&self, path: &str, content: &str) -> VaultResult<DocumentHandle> {
        let normalized = normalize_folder_path(path).to_string();
        if normalized.is_empty() {
            return Err(VaultError::InvalidPath(path.to_string()));
        }

        let mut inner = self.inner.borrow_mut();
        if inner.paths.contains_key(&normalized) || inner.folders.contains(&normalized) {
            return Err(VaultError::DestinationExists(normalized));
        }

        let parent = parent_folder(&normalized).to_string();
        if !parent.is_empty() {
            register_folder(&mut inner, &parent);
        }

        let id = Uuid::new_v4();
        inner.notes.insert(
            id,
            NoteRecord {
                path: normalized.clone(),
                content: content.to_string(),
            },
        );
        inner.paths.insert(normalized.clone(), id);
        Ok(DocumentHandle::new(id, normalized))
    }

    /// Current raw content of a note, for inspection.
    pub fn note_content(&self, path: &str) -> Option<String> {
        let inner = self.inner.borrow();
        let id = inner.paths.get(normalize_folder_path(path))?;
        inner.notes.get(id).map(|record| record.content.clone())
    }

    /// Paths of notes moved to trash, in trashing order.
    pub fn trashed_paths(&self) -> Vec<String> {
        self.inner.borrow().trashed.clone()
    }
}

fn register_folder(inner: &mut VaultInner, path: &str) {
    let mut prefix = String::new();
    for segment in path.split('/') {
        if !prefix.is_empty() {
            prefix.push('/');
        }
        prefix.push_str(segment);
        inner.folders.insert(prefix.clone());
    }
}

impl VaultStore for MemoryVault {
    fn list_folders(&self) -> Vec<String> {
        self.inner.borrow().folders.iter().cloned().collect()
    }

    fn folder_exists(&self, path: &str) -> bool {
        self.inner
            .borrow()
            .folders
            .contains(normalize_folder_path(path))
    }

    fn create_folder(&self, path: &str) -> VaultResult<()> {
        let normalized = normalize_folder_path(path).to_string();
        if normalized.is_empty() {
            return Err(VaultError::InvalidPath(path.to_string()));
        }

        let mut inner = self.inner.borrow_mut();
        if inner.paths.contains_key(&normalized) {
            return Err(VaultError::NotAFolder(normalized));
        }
        register_folder(&mut inner, &normalized);
        Ok(())
    }

    fn list_notes(&self) -> Vec<DocumentHandle> {
        self.inner
            .borrow()
            .paths
            .iter()
            .map(|(path, id)| DocumentHandle::new(*id, path.clone()))
            .collect()
    }

    fn note_at(&self, path: &str) -> Option<DocumentHandle> {
        let normalized = normalize_folder_path(path);
        let inner = self.inner.borrow();
        inner
            .paths
            .get(normalized)
            .map(|id| DocumentHandle::new(*id, normalized.to_string()))
    }

    fn note_path(&self, id: DocId) -> Option<String> {
        self.inner
            .borrow()
            .notes
            .get(&id)
            .map(|record| record.path.clone())
    }

    fn move_note(&self, id: DocId, new_path: &str) -> VaultResult<()> {
        let normalized = normalize_folder_path(new_path).to_string();
        if normalized.is_empty() {
            return Err(VaultError::InvalidPath(new_path.to_string()));
        }

        let mut inner = self.inner.borrow_mut();
        let old_path = match inner.notes.get(&id) {
            Some(record) => record.path.clone(),
            None => return Err(VaultError::DocumentNotFound(id.to_string())),
        };
        if normalized == old_path {
            return Ok(());
        }
        if inner.paths.contains_key(&normalized) || inner.folders.contains(&normalized) {
            return Err(VaultError::DestinationExists(normalized));
        }
        let parent = parent_folder(&normalized);
        if !parent.is_empty() && !inner.folders.contains(parent) {
            return Err(VaultError::FolderNotFound(parent.to_string()));
        }

        inner.paths.remove(&old_path);
        inner.paths.insert(normalized.clone(), id);
        if let Some(record) = inner.notes.get_mut(&id) {
            record.path = normalized;
        }
        Ok(())
    }

    fn trash_note(&self, id: DocId) -> VaultResult<()> {
        let mut inner = self.inner.borrow_mut();
        let record = match inner.notes.remove(&id) {
            Some(record) => record,
            None => return Err(VaultError::DocumentNotFound(id.to_string())),
        };
        inner.paths.remove(&record.path);
        inner.trashed.push(record.path);
        Ok(())
    }

    fn frontmatter(&self, id: DocId) -> VaultResult<Frontmatter> {
        let inner = self.inner.borrow();
        let record = inner
            .notes
            .get(&id)
            .ok_or_else(|| VaultError::DocumentNotFound(id.to_string()))?;
        Ok(frontmatter::parse(&record.content))
    }

    fn set_field(&self, id: DocId, key: &str, value: &str) -> VaultResult<()> {
        let mut inner = self.inner.borrow_mut();
        let record = inner
            .notes
            .get_mut(&id)
            .ok_or_else(|| VaultError::DocumentNotFound(id.to_string()))?;
        record.content = frontmatter::set_field(&record.content, key, value);
        Ok(())
    }

    fn remove_field(&self, id: DocId, key: &str) -> VaultResult<()> {
        let mut inner = self.inner.borrow_mut();
        let record = inner
            .notes
            .get_mut(&id)
            .ok_or_else(|| VaultError::DocumentNotFound(id.to_string()))?;
        record.content = frontmatter::remove_field(&record.content, key);
        Ok(())
    }
}
