//! Core logic for stage-based note filing.
//!
//! Watches a document store for notes whose frontmatter `stage` field
//! transitions to `done`, `archive`, or `delete`, queues them, and
//! drives one interactive filing action at a time, reverting the stage
//! when the user cancels. Hosts supply the store behind [`VaultStore`],
//! forward their change/rename/delete notifications, and answer the
//! watcher's prompt requests.

pub mod commands;
pub mod logging;
pub mod model;
pub mod paths;
pub mod prompt;
pub mod service;
pub mod settings;
pub mod store;

pub use commands::{run_command, CommandError, CommandSpec, COMMANDS, SCAN_WATCHED_FOLDERS};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::{DocId, DocumentHandle};
pub use model::stage::{actionable_stage, ActionableNote, Stage};
pub use prompt::{
    ConfirmRequest, FilingPrompt, FolderChoice, PromptReply, PromptRequest, ScriptedPrompt,
};
pub use service::folder_service::FolderService;
pub use service::frontmatter_service::{FrontmatterService, STAGE_FIELD};
pub use service::stage_watcher::{StageWatcher, WatcherError, WatcherResult};
pub use settings::{parse_folder_list, SettingsError, StageFilingSettings};
pub use store::frontmatter::Frontmatter;
pub use store::vault::{MemoryVault, VaultError, VaultResult, VaultStore};
