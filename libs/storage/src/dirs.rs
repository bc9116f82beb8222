use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Result, StorageError};
use crate::path::{
    category_dir, data_dir, outputs_dir, records_dir, session_path, splits_dir, Category,
    SessionKey,
};
use crate::session::{recover_session, session_meta_path};

/// Per-session directories created by [`init_session_dirs`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDirs {
    pub records: PathBuf,
    pub outputs: PathBuf,
    pub splits: PathBuf,
}

/// Entries deleted by [`cleanup_session`]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
}

/// Create a single directory level. An existing directory is left alone,
/// including one created concurrently by another caller.
pub fn ensure_dir(path: &Path) -> Result<()> {
    match fs::create_dir(path) {
        Ok(()) => {
            tracing::debug!("created directory {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(source) => Err(StorageError::DirectoryCreation {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Create `data/` and the six category roots beneath `root`, in order.
/// Returns the seven directories.
pub fn init_data_root(root: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::with_capacity(Category::ALL.len() + 1);
    dirs.push(data_dir(root));
    dirs.extend(Category::ALL.iter().map(|c| category_dir(root, *c)));

    for dir in &dirs {
        ensure_dir(dir)?;
    }
    Ok(dirs)
}

/// Create the records, outputs and splits directories of one session.
/// The category roots must already exist.
pub fn init_session_dirs(key: &SessionKey, root: &Path) -> Result<SessionDirs> {
    let dirs = SessionDirs {
        records: records_dir(key, root),
        outputs: outputs_dir(key, root),
        splits: splits_dir(key, root),
    };
    ensure_dir(&dirs.records)?;
    ensure_dir(&dirs.outputs)?;
    ensure_dir(&dirs.splits)?;
    Ok(dirs)
}

/// Delete every file directly inside `dir`, then `dir` itself.
///
/// Only flat directories are supported: if any entry is a directory nothing
/// is deleted and [`StorageError::NonEmptyDirectory`] is returned. Returns the
/// number of files removed.
pub fn remove_dir_recursive(dir: &Path) -> Result<usize> {
    let read_dir_err = |source| StorageError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_err)? {
        let entry = entry.map_err(read_dir_err)?;
        if entry.file_type().map_err(read_dir_err)?.is_dir() {
            return Err(StorageError::NonEmptyDirectory {
                path: dir.to_path_buf(),
                entry: entry.path(),
            });
        }
        files.push(entry.path());
    }

    for file in &files {
        fs::remove_file(file).map_err(|source| StorageError::Remove {
            path: file.clone(),
            source,
        })?;
    }
    fs::remove_dir(dir).map_err(|source| StorageError::Remove {
        path: dir.to_path_buf(),
        source,
    })?;

    tracing::info!("removed {} with {} file(s)", dir.display(), files.len());
    Ok(files.len())
}

/// Remove every artifact of a session across all categories, and its sidecar.
/// Missing entries are skipped; the first failure aborts the cleanup.
pub fn cleanup_session(key: &SessionKey, root: &Path) -> Result<CleanupReport> {
    let mut report = CleanupReport::default();

    for category in Category::ALL {
        let path = session_path(root, category, key);
        if category.is_dir() {
            if !path.is_dir() {
                continue;
            }
            remove_dir_recursive(&path)?;
        } else {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(source) => return Err(StorageError::Remove { path, source }),
            }
        }
        report.removed.push(path);
    }

    let meta = session_meta_path(&records_dir(key, root));
    match fs::remove_file(&meta) {
        Ok(()) => report.removed.push(meta),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(source) => return Err(StorageError::Remove { path: meta, source }),
    }

    tracing::info!(
        "cleaned session {}: {} entries removed",
        key,
        report.removed.len()
    );
    Ok(report)
}

/// Sessions found under `data/records`, ordered by room id then start.
/// Entries whose key cannot be recovered are skipped.
pub fn list_sessions(root: &Path) -> Result<Vec<SessionKey>> {
    let dir = category_dir(root, Category::Records);
    let read_dir_err = |source| StorageError::ReadDir {
        path: dir.clone(),
        source,
    };

    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
        Err(e) => return Err(read_dir_err(e)),
    };

    let mut sessions = Vec::new();
    for entry in entries {
        let entry = entry.map_err(read_dir_err)?;
        if !entry.file_type().map_err(read_dir_err)?.is_dir() {
            continue;
        }
        match recover_session(&entry.path()) {
            Ok(key) => sessions.push(key),
            Err(e) => tracing::warn!("skip records entry {}: {}", entry.path().display(), e),
        }
    }

    sessions.sort();
    Ok(sessions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use tempfile::TempDir;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 8, 1)
            .unwrap()
            .and_hms_opt(20, 15, 30)
            .unwrap()
    }

    #[test]
    fn test_ensure_dir_missing_parent() {
        let tmp = TempDir::new().expect("Failed to create temp dir");
        let nested = tmp.path().join("missing").join("child");
        assert!(matches!(
            ensure_dir(&nested),
            Err(StorageError::DirectoryCreation { .. })
        ));
    }

    #[test]
    fn test_ensure_dir_over_file() {
        let tmp = TempDir::new().expect("Failed to create temp dir");
        let file = tmp.path().join("data");
        fs::write(&file, b"x").unwrap();
        assert!(matches!(
            ensure_dir(&file),
            Err(StorageError::DirectoryCreation { .. })
        ));
    }

    #[test]
    fn test_init_session_dirs_requires_data_root() {
        let tmp = TempDir::new().expect("Failed to create temp dir");
        let key = SessionKey::new("12345", start());
        assert!(init_session_dirs(&key, tmp.path()).is_err());

        init_data_root(tmp.path()).unwrap();
        let dirs = init_session_dirs(&key, tmp.path()).unwrap();
        assert!(dirs.records.is_dir());
        assert!(dirs.outputs.is_dir());
        assert!(dirs.splits.is_dir());
        assert_eq!(init_session_dirs(&key, tmp.path()).unwrap(), dirs);
    }

    #[test]
    fn test_cleanup_session() {
        let tmp = TempDir::new().expect("Failed to create temp dir");
        init_data_root(tmp.path()).unwrap();
        let key = SessionKey::new("12345", start());
        let dirs = init_session_dirs(&key, tmp.path()).unwrap();
        fs::write(dirs.records.join("part_0.flv"), b"flv").unwrap();
        fs::write(crate::path::merged_file(&key, tmp.path()), b"mp4").unwrap();
        let meta = crate::session::write_session_meta(&key, tmp.path()).unwrap();

        let report = cleanup_session(&key, tmp.path()).unwrap();
        assert_eq!(report.removed.len(), 5);
        assert_eq!(report.removed.last(), Some(&meta));
        assert!(!meta.exists());
        assert!(!dirs.records.exists());
        assert!(!dirs.outputs.exists());
        assert!(!dirs.splits.exists());
        assert!(!crate::path::merged_file(&key, tmp.path()).exists());

        let again = cleanup_session(&key, tmp.path()).unwrap();
        assert!(again.removed.is_empty());
    }

    #[test]
    fn test_list_sessions() {
        let tmp = TempDir::new().expect("Failed to create temp dir");
        assert!(list_sessions(tmp.path()).unwrap().is_empty());

        init_data_root(tmp.path()).unwrap();
        let later = SessionKey::new("12345", start() + chrono::Duration::hours(2));
        let earlier = SessionKey::new("12345", start());
        let other = SessionKey::new("100", start());
        for key in [&later, &earlier, &other] {
            init_session_dirs(key, tmp.path()).unwrap();
        }
        ensure_dir(&category_dir(tmp.path(), Category::Records).join("garbage")).unwrap();
        fs::write(
            category_dir(tmp.path(), Category::Records).join("stray.txt"),
            b"",
        )
        .unwrap();

        assert_eq!(
            list_sessions(tmp.path()).unwrap(),
            vec![other, earlier, later]
        );
    }
}
