use file_crud::core::config::{ConfigManager, ConfigProvider};
use file_crud::utils::{self, CommandContext};
use file_crud::{FileStore, StoreError};
use std::fs;
use tempfile::TempDir;

fn setup_workspace() -> TempDir {
    tempfile::tempdir().unwrap()
}

#[test]
fn test_core_workflow() {
    let td = setup_workspace();
    let target = td.path().join("output").join("file.txt");

    // 1. Constructing the store provisions the output directory
    let store = FileStore::new(&target).unwrap();
    assert!(td.path().join("output").is_dir());

    // 2. Create
    store.create("STOP LOOKING AT ME!\nSTOP, STOP, STOP").unwrap();

    // 3. Read
    let lines: Vec<String> = store.read().unwrap().map(Result::unwrap).collect();
    assert_eq!(lines, vec!["STOP LOOKING AT ME!", "STOP, STOP, STOP"]);

    // 4. Update
    let summary = store.update("STOP", "KEEP").unwrap();
    assert_eq!(summary.replacements, 4);
    assert_eq!(
        store.read_to_string().unwrap(),
        "KEEP LOOKING AT ME!\nKEEP, KEEP, KEEP"
    );

    // 5. Delete
    store.delete().unwrap();
    assert!(!target.exists());
    assert!(store.read().err().unwrap().is_missing_file());
}

#[test]
fn test_update_of_missing_file() {
    let td = setup_workspace();
    let store = FileStore::new(td.path().join("never-written.txt")).unwrap();

    let result = store.update("a", "b");

    assert!(matches!(result, Err(StoreError::FileNotFound { .. })));
    assert!(!store.exists());
    assert_eq!(fs::read_dir(td.path()).unwrap().count(), 0);
}

#[test]
fn test_commands_follow_configured_target() {
    let td = setup_workspace();
    let config_path = td.path().join("file-crud.toml");
    let target = td.path().join("notes").join("today.txt");

    let mut manager = ConfigManager::new_at(&config_path);
    manager.initialize().unwrap();
    manager.set_target_path(target.clone()).unwrap();
    assert_eq!(manager.load_config().unwrap().target_path, target);

    let ctx = CommandContext::new(ConfigManager::new_at(&config_path), None);
    utils::create_file(&ctx, "draft").unwrap();
    utils::update_file(&ctx, "draft", "final").unwrap();

    assert_eq!(fs::read_to_string(&target).unwrap(), "final");
    utils::validate(&ctx).unwrap();
}
