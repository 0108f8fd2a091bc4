//! Prompt collaborator boundary.
//!
//! # Responsibility
//! - Define the request/reply shapes the watcher exchanges with the
//!   host's prompt UI.
//! - Provide `FilingPrompt` for hosts with blocking modal UIs and a
//!   scripted implementation for deterministic runs.
//!
//! # Invariants
//! - Closing a prompt without an explicit choice is a cancellation, not
//!   an error.
//! - At most one request is outstanding at a time; the watcher enforces
//!   this through its pending-action slot.

use std::collections::VecDeque;

/// A yes/no confirmation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub title: String,
    pub message: String,
    /// Destructive actions get warning styling in the host UI.
    pub destructive: bool,
    pub confirm_label: String,
    pub cancel_label: String,
}

/// A destination-folder selection request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderChoice {
    /// Eligible destination folder paths, in listing order.
    pub candidates: Vec<String>,
    /// Display name of the note being filed.
    pub note_name: String,
}

/// A suspended filing action's outstanding question to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptRequest {
    Confirm(ConfirmRequest),
    ChooseFolder(FolderChoice),
}

/// The single response that resumes a suspended filing action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptReply {
    /// `true` confirms; `false` covers both decline and dismissal.
    Decision(bool),
    /// `None` means the picker was cancelled.
    Folder(Option<String>),
}

/// Blocking prompt collaborator for hosts with modal UIs.
///
/// Each call suspends the cooperative thread of control until the user
/// responds.
pub trait FilingPrompt {
    fn confirm(&mut self, request: &ConfirmRequest) -> bool;
    fn choose_folder(&mut self, request: &FolderChoice) -> Option<String>;
    /// Generic notification channel for non-fatal action failures.
    fn notify(&mut self, message: &str) {
        let _ = message;
    }
}

/// Deterministic prompt that answers from a prepared script.
///
/// Used by the integration tests and usable for headless runs; an
/// exhausted script declines, which is the cancel-safe outcome.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    replies: VecDeque<PromptReply>,
    seen: Vec<String>,
    notices: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a confirmation answer.
    pub fn push_decision(&mut self, confirmed: bool) {
        self.replies.push_back(PromptReply::Decision(confirmed));
    }

    /// Queues a folder selection; `None` cancels the picker.
    pub fn push_folder(&mut self, folder: Option<&str>) {
        self.replies
            .push_back(PromptReply::Folder(folder.map(str::to_string)));
    }

    /// Titles of confirmation requests and `select:<name>` markers for
    /// folder pickers, in arrival order.
    pub fn seen(&self) -> &[String] {
        &self.seen
    }

    /// Messages delivered through `notify`.
    pub fn notices(&self) -> &[String] {
        &self.notices
    }
}

impl FilingPrompt for ScriptedPrompt {
    fn confirm(&mut self, request: &ConfirmRequest) -> bool {
        self.seen.push(request.title.clone());
        match self.replies.pop_front() {
            Some(PromptReply::Decision(confirmed)) => confirmed,
            _ => false,
        }
    }

    fn choose_folder(&mut self, request: &FolderChoice) -> Option<String> {
        self.seen.push(format!("select:{}", request.note_name));
        match self.replies.pop_front() {
            Some(PromptReply::Folder(folder)) => folder,
            _ => None,
        }
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}
