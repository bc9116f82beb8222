use std::ffi::{OsStr, OsString};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StorageError};
use crate::path::{parse_start_from_records_dir_name, records_dir, SessionKey};

/// Extension of the sidecar kept next to each records directory
pub const SESSION_META_EXTENSION: &str = "json";

/// Structured session key, so recovery does not depend on splitting the
/// directory name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMeta {
    pub room_id: String,
    pub global_start: NaiveDateTime,
}

impl From<&SessionKey> for SessionMeta {
    fn from(key: &SessionKey) -> Self {
        Self {
            room_id: key.room_id().to_string(),
            global_start: key.global_start(),
        }
    }
}

impl From<SessionMeta> for SessionKey {
    fn from(meta: SessionMeta) -> Self {
        SessionKey::new(meta.room_id, meta.global_start)
    }
}

/// `<records_dir>.json`. The sidecar sits beside the records directory so the
/// directory itself only ever holds capture files.
pub fn session_meta_path(records_dir: &Path) -> PathBuf {
    let mut path = OsString::from(records_dir.as_os_str());
    path.push(".");
    path.push(SESSION_META_EXTENSION);
    PathBuf::from(path)
}

/// Write the sidecar of a session. `data/records` must exist.
pub fn write_session_meta(key: &SessionKey, root: &Path) -> Result<PathBuf> {
    let path = session_meta_path(&records_dir(key, root));
    let json = serde_json::to_string_pretty(&SessionMeta::from(key)).map_err(|source| {
        StorageError::MetadataJson {
            path: path.clone(),
            source,
        }
    })?;

    let mut tmp = path.clone().into_os_string();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, json)
        .and_then(|_| fs::rename(&tmp, &path))
        .map_err(|source| StorageError::MetadataIo {
            path: path.clone(),
            source,
        })?;

    tracing::debug!("wrote session metadata {}", path.display());
    Ok(path)
}

/// `Ok(None)` when the session has no sidecar.
pub fn read_session_meta(records_dir: &Path) -> Result<Option<SessionMeta>> {
    let path = session_meta_path(records_dir);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(StorageError::MetadataIo { path, source }),
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| StorageError::MetadataJson { path, source })
}

/// Recover the session key of a records directory, preferring the sidecar
/// and falling back to the directory name.
///
/// A sidecar whose key does not name `records_dir` is ignored, so the
/// returned key always derives back to the scanned directory.
pub fn recover_session(records_dir: &Path) -> Result<SessionKey> {
    if let Some(meta) = read_session_meta(records_dir)? {
        let key = SessionKey::from(meta);
        let stem = key.stem();
        if records_dir.file_name() == Some(OsStr::new(&stem)) {
            return Ok(key);
        }
        tracing::warn!(
            "session metadata of {} names session {}, using directory name",
            records_dir.display(),
            key
        );
    }

    let global_start = parse_start_from_records_dir_name(records_dir)?;
    let room_id = records_dir
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.split('_').next())
        .unwrap_or_default();
    Ok(SessionKey::new(room_id, global_start))
}
