//! Stage vocabulary and queue entry type.
//!
//! # Responsibility
//! - Define the closed set of actionable stage values and the exact-match
//!   classification rule.
//! - Define the entry shape carried by the watcher's action queue.
//!
//! # Invariants
//! - Classification is case-sensitive: `Done` or `DONE` are not
//!   actionable, only `done`, `archive`, and `delete` are.
//! - A queue entry's `previous_stage` is fixed at enqueue time and never
//!   updated by later metadata churn.

use crate::model::document::DocumentHandle;

/// Actionable workflow stages recognized in note frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Note is finished and should be filed to a user-chosen folder.
    Done,
    /// Note should be moved to the configured archive folder.
    Archive,
    /// Note should be moved to the store's trash.
    Delete,
}

impl Stage {
    /// Parses an exact stage value. Any other string is non-actionable.
    pub fn parse(value: &str) -> Option<Stage> {
        match value {
            "done" => Some(Stage::Done),
            "archive" => Some(Stage::Archive),
            "delete" => Some(Stage::Delete),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Done => "done",
            Stage::Archive => "archive",
            Stage::Delete => "delete",
        }
    }
}

/// Classifies an observed stage value, `None` standing for an absent or
/// non-string field.
pub fn actionable_stage(value: Option<&str>) -> Option<Stage> {
    value.and_then(Stage::parse)
}

/// A note whose stage just transitioned to an actionable value, waiting
/// in the action queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionableNote {
    /// Handle snapshot taken when the transition was observed.
    pub doc: DocumentHandle,
    /// The actionable stage recorded at enqueue time.
    pub stage: Stage,
    /// Stage value observed before the actionable transition, used to
    /// revert on cancellation. `None` reverts to "no stage field".
    pub previous_stage: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{actionable_stage, Stage};

    #[test]
    fn parse_accepts_exact_values_only() {
        assert_eq!(Stage::parse("done"), Some(Stage::Done));
        assert_eq!(Stage::parse("archive"), Some(Stage::Archive));
        assert_eq!(Stage::parse("delete"), Some(Stage::Delete));
        assert_eq!(Stage::parse("Done"), None);
        assert_eq!(Stage::parse("done "), None);
        assert_eq!(Stage::parse("review"), None);
        assert_eq!(Stage::parse(""), None);
    }

    #[test]
    fn absent_value_is_not_actionable() {
        assert_eq!(actionable_stage(None), None);
        assert_eq!(actionable_stage(Some("later")), None);
        assert_eq!(actionable_stage(Some("delete")), Some(Stage::Delete));
    }

    #[test]
    fn as_str_round_trips() {
        for stage in [Stage::Done, Stage::Archive, Stage::Delete] {
            assert_eq!(Stage::parse(stage.as_str()), Some(stage));
        }
    }
}
