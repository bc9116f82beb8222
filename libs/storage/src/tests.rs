use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tempfile::TempDir;

use crate::{
    ensure_dir, init_data_root, records_dir, remove_dir_recursive, SessionKey, StorageConfig,
    StorageError,
};

fn dir_set(root: &Path) -> BTreeSet<PathBuf> {
    let mut set = BTreeSet::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                set.insert(path.strip_prefix(root).unwrap().to_path_buf());
                stack.push(path);
            }
        }
    }
    set
}

#[test]
fn test_init_data_root_fresh() {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let created = init_data_root(tmp.path()).expect("init failed");

    let expected: BTreeSet<PathBuf> = [
        "data",
        "data/records",
        "data/merged",
        "data/merge_confs",
        "data/danmu",
        "data/outputs",
        "data/splits",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect();

    assert_eq!(created.len(), 7);
    assert_eq!(created[0], tmp.path().join("data"));
    assert_eq!(created[6], tmp.path().join("data/splits"));
    assert_eq!(dir_set(tmp.path()), expected);
}

#[test]
fn test_init_data_root_idempotent() {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let first = init_data_root(tmp.path()).expect("first init failed");
    let before = dir_set(tmp.path());

    let second = init_data_root(tmp.path()).expect("second init failed");
    assert_eq!(first, second);
    assert_eq!(dir_set(tmp.path()), before);
}

#[test]
fn test_ensure_dir_keeps_contents() {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let dir = tmp.path().join("records");
    ensure_dir(&dir).unwrap();
    fs::write(dir.join("a.flv"), b"payload").unwrap();

    ensure_dir(&dir).expect("existing directory should not fail");
    assert_eq!(fs::read(dir.join("a.flv")).unwrap(), b"payload");
}

#[test]
fn test_remove_flat_dir() {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let dir = tmp.path().join("splits");
    ensure_dir(&dir).unwrap();
    for name in ["0.mp4", "1.mp4", "2.mp4"] {
        fs::write(dir.join(name), b"x").unwrap();
    }

    assert_eq!(remove_dir_recursive(&dir).unwrap(), 3);
    assert!(!dir.exists());
}

#[test]
fn test_remove_dir_with_subdir_is_untouched() {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let dir = tmp.path().join("outputs");
    ensure_dir(&dir).unwrap();
    fs::write(dir.join("keep.mp4"), b"x").unwrap();
    ensure_dir(&dir.join("nested")).unwrap();

    match remove_dir_recursive(&dir) {
        Err(StorageError::NonEmptyDirectory { path, entry }) => {
            assert_eq!(path, dir);
            assert_eq!(entry, dir.join("nested"));
        }
        other => panic!("Expected NonEmptyDirectory, got {:?}", other),
    }
    assert!(dir.join("keep.mp4").exists());
    assert!(dir.join("nested").is_dir());
}

#[test]
fn test_remove_missing_dir() {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    assert!(matches!(
        remove_dir_recursive(&tmp.path().join("gone")),
        Err(StorageError::ReadDir { .. })
    ));
}

#[test]
fn test_default_storage_config() {
    let config = StorageConfig::default();
    assert_eq!(config.root, PathBuf::from("."));
}

#[test]
fn test_storage_config_parsing() {
    let config: StorageConfig =
        toml::from_str(r#"root = "/srv/ddrecorder""#).expect("Failed to parse TOML config");
    assert_eq!(config.root, PathBuf::from("/srv/ddrecorder"));

    let config: StorageConfig = toml::from_str("").expect("Failed to parse empty config");
    assert_eq!(config.root, PathBuf::from("."));
}

#[test]
fn test_resolve_default_root() {
    let mut config = StorageConfig::default();
    config.resolve_root().expect("Failed to resolve root");
    assert_eq!(config.root, std::env::current_dir().unwrap());

    let start = NaiveDate::from_ymd_opt(2023, 8, 1)
        .unwrap()
        .and_hms_opt(20, 15, 30)
        .unwrap();
    let dir = records_dir(&SessionKey::new("12345", start), &config.root);
    assert!(dir.is_absolute());
    assert!(dir.ends_with("data/records/12345_2023-08-01_20-15-30"));
}

#[test]
fn test_resolve_relative_and_absolute_root() {
    let mut config = StorageConfig {
        root: PathBuf::from("./recordings/./live"),
    };
    config.resolve_root().unwrap();
    assert_eq!(
        config.root,
        std::env::current_dir().unwrap().join("recordings/live")
    );

    let mut config = StorageConfig {
        root: PathBuf::from("/srv/ddrecorder"),
    };
    config.resolve_root().unwrap();
    assert_eq!(config.root, PathBuf::from("/srv/ddrecorder"));
}
