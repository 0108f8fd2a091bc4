//! Host-facing command surface.
//!
//! Defines the stable command ids a host palette can register and the
//! dispatcher that maps them onto watcher operations. Registration
//! itself stays in the host.

use crate::prompt::PromptRequest;
use crate::service::stage_watcher::{StageWatcher, WatcherError};
use crate::store::vault::VaultStore;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rescan the watched folders for actionable notes.
pub const SCAN_WATCHED_FOLDERS: &str = "scan-watched-folders";

/// One registrable command: stable id plus human-readable name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub id: &'static str,
    pub name: &'static str,
}

/// Commands exposed by the filing core, in registration order.
pub const COMMANDS: &[CommandSpec] = &[CommandSpec {
    id: SCAN_WATCHED_FOLDERS,
    name: "Scan watched folders for actionable notes",
}];

#[derive(Debug)]
pub enum CommandError {
    UnknownCommand(String),
    Watcher(WatcherError),
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCommand(id) => write!(f, "unknown command: {id}"),
            Self::Watcher(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnknownCommand(_) => None,
            Self::Watcher(err) => Some(err),
        }
    }
}

impl From<WatcherError> for CommandError {
    fn from(value: WatcherError) -> Self {
        Self::Watcher(value)
    }
}

/// Runs one command by id, returning any prompt request the watcher
/// suspended on.
pub fn run_command<S: VaultStore>(
    watcher: &mut StageWatcher<S>,
    command_id: &str,
) -> Result<Option<PromptRequest>, CommandError> {
    match command_id {
        SCAN_WATCHED_FOLDERS => Ok(watcher.scan()?),
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::{run_command, CommandError, COMMANDS, SCAN_WATCHED_FOLDERS};
    use crate::service::stage_watcher::StageWatcher;
    use crate::settings::StageFilingSettings;
    use crate::store::vault::MemoryVault;

    #[test]
    fn command_table_lists_scan() {
        assert!(COMMANDS.iter().any(|spec| spec.id == SCAN_WATCHED_FOLDERS));
    }

    #[test]
    fn scan_command_dispatches_to_watcher() {
        let vault = MemoryVault::new();
        vault
            .add_note("inbox/x.md", "---\nstage: delete\n---\n")
            .expect("note should be added");
        let mut watcher = StageWatcher::new(vault, StageFilingSettings::default());

        let request = run_command(&mut watcher, SCAN_WATCHED_FOLDERS)
            .expect("scan command should run");
        assert!(request.is_some());
    }

    #[test]
    fn unknown_command_is_rejected() {
        let vault = MemoryVault::new();
        let mut watcher = StageWatcher::new(vault, StageFilingSettings::default());

        let err = run_command(&mut watcher, "make-coffee").expect_err("unknown id must fail");
        assert!(matches!(err, CommandError::UnknownCommand(id) if id == "make-coffee"));
    }
}
