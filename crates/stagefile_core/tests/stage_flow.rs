use stagefile_core::{
    MemoryVault, PromptRequest, ScriptedPrompt, StageFilingSettings, StageWatcher, VaultStore,
};

fn settings(watched: &[&str], archive: &str) -> StageFilingSettings {
    StageFilingSettings {
        watched_folders: watched.iter().map(|s| s.to_string()).collect(),
        archive_folder: archive.to_string(),
        excluded_folders: Vec::new(),
    }
}

fn fire_change(
    watcher: &mut StageWatcher<MemoryVault>,
    path: &str,
) -> Option<PromptRequest> {
    let note = watcher.store().note_at(path).expect("note should exist");
    let fields = watcher
        .store()
        .frontmatter(note.id)
        .expect("frontmatter should read");
    watcher
        .on_metadata_changed(&note, Some(&fields))
        .expect("event should be accepted")
}

#[test]
fn done_stage_moves_note_to_selected_folder_and_clears_stage() {
    let vault = MemoryVault::new();
    vault.add_folder("projects");
    vault
        .add_note("inbox/x.md", "---\nstage: done\n---\n# X\n")
        .expect("note should be added");
    let mut watcher = StageWatcher::new(vault, settings(&["inbox"], "bin"));

    let request = fire_change(&mut watcher, "inbox/x.md");
    let mut prompt = ScriptedPrompt::new();
    prompt.push_folder(Some("projects"));
    watcher
        .drive(&mut prompt, request)
        .expect("filing should succeed");

    let store = watcher.store();
    assert!(store.note_at("inbox/x.md").is_none());
    let moved = store
        .note_content("projects/x.md")
        .expect("note should be at destination");
    assert!(!moved.contains("stage:"));
    assert!(moved.contains("# X"));
    assert_eq!(prompt.seen(), ["select:x"]);
}

#[test]
fn done_prompt_lists_only_eligible_destinations() {
    let vault = MemoryVault::new();
    vault.add_folder("projects");
    vault.add_folder("inbox/daily");
    vault.add_folder("templates");
    vault
        .add_note("inbox/x.md", "---\nstage: done\n---\n")
        .expect("note should be added");

    let mut config = settings(&["inbox"], "bin");
    config.excluded_folders = vec!["templates".to_string()];
    let mut watcher = StageWatcher::new(vault, config);

    let request = fire_change(&mut watcher, "inbox/x.md");
    match request {
        Some(PromptRequest::ChooseFolder(choice)) => {
            assert_eq!(choice.candidates, vec!["projects"]);
            assert_eq!(choice.note_name, "x");
        }
        other => panic!("expected folder choice, got {other:?}"),
    }
}

#[test]
fn archive_stage_creates_missing_archive_folder_and_moves_note() {
    let vault = MemoryVault::new();
    vault
        .add_note("inbox/y.md", "---\nstage: archive\n---\nbody\n")
        .expect("note should be added");
    let mut watcher = StageWatcher::new(vault, settings(&["inbox"], "bin"));

    let request = fire_change(&mut watcher, "inbox/y.md");
    let mut prompt = ScriptedPrompt::new();
    prompt.push_decision(true);
    watcher
        .drive(&mut prompt, request)
        .expect("filing should succeed");

    let store = watcher.store();
    assert!(store.folder_exists("bin"));
    assert!(store.note_at("inbox/y.md").is_none());
    let moved = store
        .note_content("bin/y.md")
        .expect("note should be archived");
    assert!(!moved.contains("stage:"));
    assert_eq!(prompt.seen(), ["Archive note"]);
}

#[test]
fn delete_stage_confirmed_moves_note_to_trash() {
    let vault = MemoryVault::new();
    vault
        .add_note("inbox/z.md", "---\nstage: delete\n---\n")
        .expect("note should be added");
    let mut watcher = StageWatcher::new(vault, settings(&["inbox"], "bin"));

    let request = fire_change(&mut watcher, "inbox/z.md");
    let mut prompt = ScriptedPrompt::new();
    prompt.push_decision(true);
    watcher
        .drive(&mut prompt, request)
        .expect("filing should succeed");

    assert!(watcher.store().note_at("inbox/z.md").is_none());
    assert_eq!(watcher.store().trashed_paths(), vec!["inbox/z.md"]);
    assert_eq!(watcher.last_known_stage("inbox/z.md"), None);
}

#[test]
fn delete_declined_with_no_previous_stage_resets_to_absent() {
    let vault = MemoryVault::new();
    let note = vault
        .add_note("inbox/z.md", "body\n")
        .expect("note should be added");
    let mut watcher = StageWatcher::new(vault, settings(&["inbox"], "bin"));

    // First observation: no stage field.
    let request = fire_change(&mut watcher, "inbox/z.md");
    assert!(request.is_none());

    // The user sets stage: delete, then declines the confirmation.
    watcher
        .store()
        .set_field(note.id, "stage", "delete")
        .expect("stage edit should succeed");
    let request = fire_change(&mut watcher, "inbox/z.md");
    let mut prompt = ScriptedPrompt::new();
    prompt.push_decision(false);
    watcher
        .drive(&mut prompt, request)
        .expect("decline should succeed");

    let content = watcher
        .store()
        .note_content("inbox/z.md")
        .expect("note should remain in place");
    assert!(!content.contains("stage:"));
    assert!(watcher.store().trashed_paths().is_empty());
    assert_eq!(watcher.last_known_stage("inbox/z.md"), Some(None));
}

#[test]
fn done_cancelled_restores_previous_stage_value() {
    let vault = MemoryVault::new();
    let note = vault
        .add_note("inbox/x.md", "---\nstage: review\n---\n")
        .expect("note should be added");
    let mut watcher = StageWatcher::new(vault, settings(&["inbox"], "bin"));

    let request = fire_change(&mut watcher, "inbox/x.md");
    assert!(request.is_none());

    watcher
        .store()
        .set_field(note.id, "stage", "done")
        .expect("stage edit should succeed");
    let request = fire_change(&mut watcher, "inbox/x.md");
    let mut prompt = ScriptedPrompt::new();
    prompt.push_folder(None);
    watcher
        .drive(&mut prompt, request)
        .expect("cancel should succeed");

    let content = watcher
        .store()
        .note_content("inbox/x.md")
        .expect("note should remain in place");
    assert!(content.contains("stage: review"));
    assert_eq!(
        watcher.last_known_stage("inbox/x.md"),
        Some(Some("review".to_string()))
    );
}

#[test]
fn failed_move_surfaces_error_and_notifies_host() {
    let vault = MemoryVault::new();
    vault.add_folder("projects");
    vault
        .add_note("inbox/x.md", "---\nstage: done\n---\n")
        .expect("note should be added");
    let mut watcher = StageWatcher::new(vault, settings(&["inbox"], "bin"));

    let request = fire_change(&mut watcher, "inbox/x.md");
    let mut prompt = ScriptedPrompt::new();
    // Selection names a folder that vanished while the picker was open.
    prompt.push_folder(Some("missing"));
    let err = watcher
        .drive(&mut prompt, request)
        .expect_err("move into missing folder must fail");
    assert!(err.to_string().contains("folder not found"));
    assert_eq!(prompt.notices().len(), 1);

    // The entry failed but nothing was half-applied.
    let content = watcher
        .store()
        .note_content("inbox/x.md")
        .expect("note should remain in place");
    assert!(content.contains("stage: done"));
    assert!(!watcher.drain_active());
}
