//! Stage field accessor.
//!
//! # Responsibility
//! - Read, write, and remove the single `stage` frontmatter field,
//!   abstracting the store's metadata mutation primitive.
//!
//! # Invariants
//! - Only string-typed values are reported; a numeric or boolean
//!   `stage` reads as absent.

use crate::model::document::DocId;
use crate::store::frontmatter;
use crate::store::vault::{VaultResult, VaultStore};

/// Frontmatter field holding a note's workflow stage.
pub const STAGE_FIELD: &str = "stage";

/// Stage accessor over a borrowed store.
pub struct FrontmatterService<'a, S: VaultStore> {
    store: &'a S,
}

impl<'a, S: VaultStore> FrontmatterService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Current stage value, or `None` when absent or non-string.
    pub fn stage_of(&self, id: DocId) -> VaultResult<Option<String>> {
        let fields = self.store.frontmatter(id)?;
        Ok(frontmatter::string_field(&fields, STAGE_FIELD).map(str::to_string))
    }

    pub fn set_stage(&self, id: DocId, value: &str) -> VaultResult<()> {
        self.store.set_field(id, STAGE_FIELD, value)
    }

    pub fn clear_stage(&self, id: DocId) -> VaultResult<()> {
        self.store.remove_field(id, STAGE_FIELD)
    }
}
