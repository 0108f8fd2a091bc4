//! Vault-path normalization and containment tests.
//!
//! # Responsibility
//! - Provide the single folder-path comparison rule used by watching,
//!   suggestion filtering, and move-target computation.
//!
//! # Invariants
//! - All comparisons are performed on normalized paths (no leading or
//!   trailing `/`).
//! - A folder contains itself: `is_subfolder_of(p, p)` is `true`.

/// Strips leading and trailing slash runs from a vault path.
pub fn normalize_folder_path(path: &str) -> &str {
    path.trim_matches('/')
}

/// Returns whether `child` lies inside `parent`'s subtree, `parent` itself
/// included.
pub fn is_subfolder_of(child: &str, parent: &str) -> bool {
    let child = normalize_folder_path(child);
    let parent = normalize_folder_path(parent);

    if child == parent {
        return true;
    }

    child
        .strip_prefix(parent)
        .is_some_and(|rest| rest.starts_with('/'))
}

/// Returns whether `path` lies inside (or is) any of the given folders.
pub fn is_in_folders(path: &str, folders: &[String]) -> bool {
    folders
        .iter()
        .any(|folder| is_subfolder_of(path, folder.as_str()))
}

/// Returns the parent folder of a path, or `""` for root-level paths.
pub fn parent_folder(path: &str) -> &str {
    match path.rfind('/') {
        Some(index) => &path[..index],
        None => "",
    }
}
