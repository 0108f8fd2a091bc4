//! Folder resolver.
//!
//! # Responsibility
//! - Compute the eligible destination set for filing prompts.
//! - Resolve-or-create folders and perform note move/trash operations.
//!
//! # Invariants
//! - Suggestions never include a watched or excluded folder, nor any of
//!   their descendants.
//! - `ensure_folder` is idempotent for existing folders.

use crate::model::document::DocId;
use crate::paths::{is_subfolder_of, normalize_folder_path};
use crate::store::vault::{VaultError, VaultResult, VaultStore};

/// Folder operations over a borrowed store.
pub struct FolderService<'a, S: VaultStore> {
    store: &'a S,
}

impl<'a, S: VaultStore> FolderService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// All folders in the store, in listing order.
    pub fn all_folders(&self) -> Vec<String> {
        self.store.list_folders()
    }

    /// Eligible filing destinations: every folder outside the watched
    /// and excluded subtrees.
    pub fn suggestions(&self, watched: &[String], excluded: &[String]) -> Vec<String> {
        self.store
            .list_folders()
            .into_iter()
            .filter(|folder| {
                !watched
                    .iter()
                    .chain(excluded)
                    .any(|blocked| is_subfolder_of(folder, blocked))
            })
            .collect()
    }

    /// Resolves a folder, creating it when missing. Returns the
    /// normalized path.
    pub fn ensure_folder(&self, path: &str) -> VaultResult<String> {
        let normalized = normalize_folder_path(path).to_string();
        if normalized.is_empty() {
            return Err(VaultError::InvalidPath(path.to_string()));
        }
        if !self.store.folder_exists(&normalized) {
            self.store.create_folder(&normalized)?;
        }
        Ok(normalized)
    }

    /// Moves a note into a folder, keeping its file name. The store is
    /// responsible for redirecting references.
    pub fn move_to_folder(&self, id: DocId, file_name: &str, folder: &str) -> VaultResult<String> {
        let folder = normalize_folder_path(folder);
        let target = if folder.is_empty() {
            file_name.to_string()
        } else {
            format!("{folder}/{file_name}")
        };
        self.store.move_note(id, &target)?;
        Ok(target)
    }

    pub fn trash(&self, id: DocId) -> VaultResult<()> {
        self.store.trash_note(id)
    }
}
