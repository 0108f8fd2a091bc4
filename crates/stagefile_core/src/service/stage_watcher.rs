//! Stage-transition watcher and filing action queue.
//!
//! # Responsibility
//! - Classify metadata-change events into actionable stage transitions.
//! - Serialize actionable notes through a single-flight FIFO drain with
//!   explicit prompt suspension and resume.
//! - Reconcile internal state against renames, deletions, and
//!   out-of-band edits.
//!
//! # Invariants
//! - At most one queue entry per document at any time.
//! - At most one suspended action at any time; the drain-active flag
//!   stays set for the whole suspension.
//! - The stage cache holds the latest observed value for every watched
//!   path seen so far; it is the sole source of "previous stage".
//! - A cancelled action leaves the note as if the action never started.

use crate::model::document::DocumentHandle;
use crate::model::stage::{actionable_stage, ActionableNote, Stage};
use crate::paths::is_in_folders;
use crate::prompt::{
    ConfirmRequest, FilingPrompt, FolderChoice, PromptReply, PromptRequest,
};
use crate::service::folder_service::FolderService;
use crate::service::frontmatter_service::{FrontmatterService, STAGE_FIELD};
use crate::settings::StageFilingSettings;
use crate::store::frontmatter::{self, Frontmatter};
use crate::store::vault::{VaultError, VaultStore};
use log::{debug, error, info, warn};
use std::collections::{BTreeMap, VecDeque};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type WatcherResult<T> = Result<T, WatcherError>;

/// Failure while acting on one queue entry.
///
/// The failed entry is consumed; entries behind it stay queued and are
/// processed on the next trigger.
#[derive(Debug)]
pub enum WatcherError {
    Store(VaultError),
}

impl Display for WatcherError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for WatcherError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
        }
    }
}

impl From<VaultError> for WatcherError {
    fn from(value: VaultError) -> Self {
        Self::Store(value)
    }
}

/// One filing action suspended on its prompt.
#[derive(Debug)]
struct PendingAction {
    /// Handle refreshed to the document's current path at suspension
    /// time.
    doc: DocumentHandle,
    stage: Stage,
    previous_stage: Option<String>,
}

/// Watches stage transitions and drives the filing action queue.
///
/// The host forwards its store notifications to `on_metadata_changed`,
/// `on_renamed`, and `on_deleted`; the watcher never registers itself
/// anywhere. When an action needs user input, the triggering call
/// returns a [`PromptRequest`] and the watcher suspends until
/// [`resume`](StageWatcher::resume) delivers the reply.
pub struct StageWatcher<S: VaultStore> {
    store: S,
    settings: StageFilingSettings,
    stage_cache: BTreeMap<String, Option<String>>,
    queue: VecDeque<ActionableNote>,
    pending: Option<PendingAction>,
    draining: bool,
}

impl<S: VaultStore> StageWatcher<S> {
    pub fn new(store: S, settings: StageFilingSettings) -> Self {
        Self {
            store,
            settings,
            stage_cache: BTreeMap::new(),
            queue: VecDeque::new(),
            pending: None,
            draining: false,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &StageFilingSettings {
        &self.settings
    }

    /// Replaces the configuration; queued entries keep the snapshot they
    /// were classified under.
    pub fn update_settings(&mut self, settings: StageFilingSettings) {
        self.settings = settings;
    }

    /// Last observed stage for a path: outer `None` when the path was
    /// never observed, inner `None` when it was observed without a
    /// stage field.
    pub fn last_known_stage(&self, path: &str) -> Option<Option<String>> {
        self.stage_cache.get(path).cloned()
    }

    /// Entries waiting behind the current action.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Whether a drain pass is running or suspended on a prompt.
    pub fn drain_active(&self) -> bool {
        self.draining
    }

    /// Ingests a metadata-change notification from the host.
    ///
    /// Documents outside the watched folders are ignored entirely, not
    /// even cached. The cache entry is overwritten unconditionally for
    /// watched documents so it always reflects the latest observed
    /// ground truth.
    pub fn on_metadata_changed(
        &mut self,
        doc: &DocumentHandle,
        fields: Option<&Frontmatter>,
    ) -> WatcherResult<Option<PromptRequest>> {
        if !doc.is_markdown() {
            return Ok(None);
        }
        if !is_in_folders(&doc.path, &self.settings.watched_folders) {
            return Ok(None);
        }

        let current = fields
            .and_then(|fields| frontmatter::string_field(fields, STAGE_FIELD))
            .map(str::to_string);
        let previous = self.stage_cache.get(&doc.path).cloned().unwrap_or(None);
        self.stage_cache.insert(doc.path.clone(), current.clone());

        let Some(stage) = actionable_stage(current.as_deref()) else {
            return Ok(None);
        };

        // One in-flight entry per document; the queued previous-stage
        // must survive repeated metadata churn.
        if self.queue.iter().any(|note| note.doc.id == doc.id) {
            debug!(
                "event=enqueue_skipped module=watcher status=ok reason=already_queued path={}",
                doc.path
            );
            return Ok(None);
        }

        info!(
            "event=note_enqueued module=watcher status=ok path={} stage={}",
            doc.path,
            stage.as_str()
        );
        self.queue.push_back(ActionableNote {
            doc: doc.clone(),
            stage,
            previous_stage: previous,
        });
        self.trigger_drain()
    }

    /// Scans every watched note for an actionable stage.
    ///
    /// A manual scan has no reliable "before" value, so entries it adds
    /// revert to "no stage" on cancellation. Known limitation: a scan
    /// that runs while the queue is non-empty can re-add a note that a
    /// concurrent drain just reverted, with the same forced-absent
    /// previous value.
    pub fn scan(&mut self) -> WatcherResult<Option<PromptRequest>> {
        let notes = self.store.list_notes();
        for doc in notes {
            if !is_in_folders(&doc.path, &self.settings.watched_folders) {
                continue;
            }
            // A note can vanish between listing and reading.
            let Ok(stage_value) = FrontmatterService::new(&self.store).stage_of(doc.id) else {
                continue;
            };
            self.stage_cache
                .insert(doc.path.clone(), stage_value.clone());

            let Some(stage) = actionable_stage(stage_value.as_deref()) else {
                continue;
            };
            if self.queue.iter().any(|note| note.doc.id == doc.id) {
                continue;
            }
            info!(
                "event=note_enqueued module=watcher status=ok source=scan path={} stage={}",
                doc.path,
                stage.as_str()
            );
            self.queue.push_back(ActionableNote {
                doc,
                stage,
                previous_stage: None,
            });
        }
        self.trigger_drain()
    }

    /// Re-keys the cached stage when the host renames a document.
    ///
    /// Queued and pending entries need no rewrite: drain-time
    /// resolution goes through the stable document id.
    pub fn on_renamed(&mut self, old_path: &str, new_path: &str) {
        if let Some(value) = self.stage_cache.remove(old_path) {
            debug!(
                "event=cache_rekeyed module=watcher status=ok old_path={old_path} new_path={new_path}"
            );
            self.stage_cache.insert(new_path.to_string(), value);
        }
    }

    /// Drops the cached stage when the host deletes a document. A
    /// queued entry for that document later fails its existence
    /// re-check and is abandoned harmlessly.
    pub fn on_deleted(&mut self, path: &str) {
        self.stage_cache.remove(path);
    }

    /// Delivers the user's reply for the suspended action and continues
    /// draining. Returns the next request when another entry needs
    /// input.
    pub fn resume(&mut self, reply: PromptReply) -> WatcherResult<Option<PromptRequest>> {
        let Some(pending) = self.pending.take() else {
            warn!("event=prompt_reply_dropped module=watcher status=ok reason=no_pending_action");
            return Ok(None);
        };

        if let Err(err) = self.finish_note(pending, reply) {
            error!("event=filing_failed module=watcher status=error error={err}");
            self.draining = false;
            return Err(err.into());
        }
        self.continue_drain()
    }

    /// Drives outstanding prompts to completion with a blocking prompt
    /// collaborator, for hosts with modal UIs.
    pub fn drive<P: FilingPrompt>(
        &mut self,
        prompt: &mut P,
        mut request: Option<PromptRequest>,
    ) -> WatcherResult<()> {
        while let Some(current) = request {
            let reply = match current {
                PromptRequest::Confirm(confirm) => PromptReply::Decision(prompt.confirm(&confirm)),
                PromptRequest::ChooseFolder(choice) => {
                    PromptReply::Folder(prompt.choose_folder(&choice))
                }
            };
            request = match self.resume(reply) {
                Ok(next) => next,
                Err(err) => {
                    prompt.notify(&format!("Filing action failed: {err}"));
                    return Err(err);
                }
            };
        }
        Ok(())
    }

    /// Starts a drain pass unless one is already active. The active
    /// pass observes newly appended entries because it re-checks queue
    /// non-emptiness each iteration.
    fn trigger_drain(&mut self) -> WatcherResult<Option<PromptRequest>> {
        if self.draining {
            return Ok(None);
        }
        self.draining = true;
        self.continue_drain()
    }

    /// Pops entries front-to-back until one suspends on a prompt, the
    /// queue empties, or an entry's store mutation fails. The flag is
    /// released on every exit path except suspension.
    fn continue_drain(&mut self) -> WatcherResult<Option<PromptRequest>> {
        while let Some(note) = self.queue.pop_front() {
            match self.begin_note(note) {
                Ok(Some(request)) => return Ok(Some(request)),
                Ok(None) => continue,
                Err(err) => {
                    error!("event=filing_failed module=watcher status=error error={err}");
                    self.draining = false;
                    return Err(err.into());
                }
            }
        }
        self.draining = false;
        Ok(None)
    }

    /// Re-validates one popped entry and suspends it on its prompt.
    ///
    /// Returns `Ok(None)` when the entry is abandoned: the document
    /// vanished (benign race; its cache entry is purged) or its stage
    /// no longer matches the queued value (the metadata moved on;
    /// acting now would stomp a newer state, so nothing is reverted).
    fn begin_note(&mut self, note: ActionableNote) -> Result<Option<PromptRequest>, VaultError> {
        let Some(current_path) = self.store.note_path(note.doc.id) else {
            self.stage_cache.remove(&note.doc.path);
            debug!(
                "event=entry_abandoned module=watcher status=ok reason=document_missing path={}",
                note.doc.path
            );
            return Ok(None);
        };

        let current_stage = FrontmatterService::new(&self.store).stage_of(note.doc.id)?;
        if current_stage.as_deref() != Some(note.stage.as_str()) {
            debug!(
                "event=entry_abandoned module=watcher status=ok reason=stage_changed path={current_path}"
            );
            return Ok(None);
        }

        let doc = DocumentHandle::new(note.doc.id, current_path);
        let request = match note.stage {
            Stage::Done => {
                let candidates = FolderService::new(&self.store).suggestions(
                    &self.settings.watched_folders,
                    &self.settings.excluded_folders,
                );
                PromptRequest::ChooseFolder(FolderChoice {
                    candidates,
                    note_name: doc.basename().to_string(),
                })
            }
            Stage::Archive => PromptRequest::Confirm(ConfirmRequest {
                title: "Archive note".to_string(),
                message: format!(
                    "Move \"{}\" to archive folder ({})?",
                    doc.basename(),
                    self.settings.archive_folder
                ),
                destructive: false,
                confirm_label: "Archive".to_string(),
                cancel_label: "Cancel".to_string(),
            }),
            Stage::Delete => PromptRequest::Confirm(ConfirmRequest {
                title: "Delete note".to_string(),
                message: format!(
                    "Move \"{}\" to system trash? This action can be undone from your system's trash.",
                    doc.basename()
                ),
                destructive: true,
                confirm_label: "Delete".to_string(),
                cancel_label: "Cancel".to_string(),
            }),
        };

        self.pending = Some(PendingAction {
            doc,
            stage: note.stage,
            previous_stage: note.previous_stage,
        });
        Ok(Some(request))
    }

    /// Completes a suspended action with the user's reply.
    fn finish_note(&mut self, pending: PendingAction, reply: PromptReply) -> Result<(), VaultError> {
        // The store may have moved on while the prompt was open.
        let Some(current_path) = self.store.note_path(pending.doc.id) else {
            self.stage_cache.remove(&pending.doc.path);
            debug!(
                "event=entry_abandoned module=watcher status=ok reason=document_missing path={}",
                pending.doc.path
            );
            return Ok(());
        };
        let doc = DocumentHandle::new(pending.doc.id, current_path);

        match (pending.stage, reply) {
            (Stage::Done, PromptReply::Folder(Some(folder))) => {
                let destination = FolderService::new(&self.store).move_to_folder(
                    doc.id,
                    doc.file_name(),
                    &folder,
                )?;
                FrontmatterService::new(&self.store).clear_stage(doc.id)?;
                info!(
                    "event=note_filed module=watcher status=ok action=done path={} destination={destination}",
                    doc.path
                );
                Ok(())
            }
            (Stage::Done, PromptReply::Folder(None)) => {
                self.revert_stage(&doc, pending.previous_stage)
            }
            (Stage::Archive, PromptReply::Decision(true)) => {
                let folder_service = FolderService::new(&self.store);
                let archive = folder_service.ensure_folder(&self.settings.archive_folder)?;
                let destination =
                    folder_service.move_to_folder(doc.id, doc.file_name(), &archive)?;
                FrontmatterService::new(&self.store).clear_stage(doc.id)?;
                info!(
                    "event=note_filed module=watcher status=ok action=archive path={} destination={destination}",
                    doc.path
                );
                Ok(())
            }
            (Stage::Archive, PromptReply::Decision(false)) => {
                self.revert_stage(&doc, pending.previous_stage)
            }
            (Stage::Delete, PromptReply::Decision(true)) => {
                self.store.trash_note(doc.id)?;
                // The trash was our own mutation; do not wait for the
                // host's delete notification to drop the cache entry.
                self.stage_cache.remove(&doc.path);
                info!(
                    "event=note_filed module=watcher status=ok action=delete path={}",
                    doc.path
                );
                Ok(())
            }
            (Stage::Delete, PromptReply::Decision(false)) => {
                self.revert_stage(&doc, pending.previous_stage)
            }
            (stage, _) => {
                // A reply of the wrong kind has no meaningful outcome;
                // cancelling is the only one that leaves no partial
                // state.
                warn!(
                    "event=prompt_reply_mismatch module=watcher status=ok stage={} path={}",
                    stage.as_str(),
                    doc.path
                );
                self.revert_stage(&doc, pending.previous_stage)
            }
        }
    }

    /// Restores the pre-transition stage (or removes the field when
    /// there was none) and re-enters the cache so the next transition
    /// is measured against the correct baseline.
    fn revert_stage(
        &mut self,
        doc: &DocumentHandle,
        previous: Option<String>,
    ) -> Result<(), VaultError> {
        let service = FrontmatterService::new(&self.store);
        match previous.as_deref() {
            Some(value) => service.set_stage(doc.id, value)?,
            None => service.clear_stage(doc.id)?,
        }
        info!(
            "event=stage_reverted module=watcher status=ok path={} previous={}",
            doc.path,
            previous.as_deref().unwrap_or("none")
        );
        self.stage_cache.insert(doc.path.clone(), previous);
        Ok(())
    }
}
