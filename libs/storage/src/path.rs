use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime, SubsecRound};

use crate::error::{Result, StorageError};

/// Directory under the root that holds every category
pub const DATA_DIR: &str = "data";

/// Session start format embedded in every session entry name.
/// Existing session directories depend on it; changing it needs a migration.
pub const START_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

const PARSE_FORMAT: &str = "%Y-%m-%d %H-%M-%S";

/// Extension of raw capture files named by [`generate_filename`]
pub const CAPTURE_EXTENSION: &str = "flv";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Records,
    Merged,
    MergeConfs,
    Danmu,
    Outputs,
    Splits,
}

impl Category {
    /// Creation order of the category roots
    pub const ALL: [Category; 6] = [
        Category::Records,
        Category::Merged,
        Category::MergeConfs,
        Category::Danmu,
        Category::Outputs,
        Category::Splits,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Records => "records",
            Category::Merged => "merged",
            Category::MergeConfs => "merge_confs",
            Category::Danmu => "danmu",
            Category::Outputs => "outputs",
            Category::Splits => "splits",
        }
    }

    /// Suffix appended to the session stem. Empty for directory categories.
    pub fn suffix(&self) -> &'static str {
        match self {
            Category::Merged => "_merged.mp4",
            Category::MergeConfs => "_merge_conf.txt",
            Category::Danmu => "_danmu.log",
            Category::Records | Category::Outputs | Category::Splits => "",
        }
    }

    pub fn is_dir(&self) -> bool {
        self.suffix().is_empty()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one recording session: room id plus start time in whole seconds
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionKey {
    room_id: String,
    global_start: NaiveDateTime,
}

impl SessionKey {
    /// Sub-second precision of `global_start` is dropped.
    pub fn new(room_id: impl Into<String>, global_start: NaiveDateTime) -> Self {
        Self {
            room_id: room_id.into(),
            global_start: global_start.trunc_subsecs(0),
        }
    }

    /// Session starting now, in local wall-clock time
    pub fn starting_now(room_id: impl Into<String>) -> Self {
        Self::new(room_id, Local::now().naive_local())
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn global_start(&self) -> NaiveDateTime {
        self.global_start
    }

    /// `<room_id>_<start>`, shared by every category entry of this session
    pub fn stem(&self) -> String {
        format!("{}_{}", self.room_id, self.global_start.format(START_FORMAT))
    }

    /// Whether the start time can be recovered from the entry name alone
    pub fn is_name_recoverable(&self) -> bool {
        !self.room_id.contains('_')
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stem())
    }
}

pub fn data_dir(root: &Path) -> PathBuf {
    root.join(DATA_DIR)
}

pub fn category_dir(root: &Path, category: Category) -> PathBuf {
    data_dir(root).join(category.as_str())
}

/// `<root>/data/<category>/<room_id>_<start><suffix>`
pub fn session_path(root: &Path, category: Category, key: &SessionKey) -> PathBuf {
    category_dir(root, category).join(format!("{}{}", key.stem(), category.suffix()))
}

pub fn records_dir(key: &SessionKey, root: &Path) -> PathBuf {
    session_path(root, Category::Records, key)
}

pub fn danmu_log_file(key: &SessionKey, root: &Path) -> PathBuf {
    session_path(root, Category::Danmu, key)
}

pub fn merged_file(key: &SessionKey, root: &Path) -> PathBuf {
    session_path(root, Category::Merged, key)
}

pub fn outputs_dir(key: &SessionKey, root: &Path) -> PathBuf {
    session_path(root, Category::Outputs, key)
}

pub fn splits_dir(key: &SessionKey, root: &Path) -> PathBuf {
    session_path(root, Category::Splits, key)
}

pub fn merge_conf_path(key: &SessionKey, root: &Path) -> PathBuf {
    session_path(root, Category::MergeConfs, key)
}

/// Recover the session start from a records directory name.
///
/// The name is split on `_`, the room id token is dropped and the next two
/// tokens are read as date and time. A room id that itself contains `_`
/// shifts the tokens, which yields an error or a wrong timestamp. Use
/// [`crate::session::recover_session`] when a sidecar may be present.
pub fn parse_start_from_records_dir_name(dir: &Path) -> Result<NaiveDateTime> {
    let name = dir
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| StorageError::TimestampParse {
            name: dir.display().to_string(),
            reason: "missing final path component".to_string(),
        })?;

    let tokens: Vec<&str> = name.split('_').skip(1).take(2).collect();
    if tokens.len() != 2 {
        return Err(StorageError::TimestampParse {
            name: name.to_string(),
            reason: "expected <room_id>_<date>_<time>".to_string(),
        });
    }

    NaiveDateTime::parse_from_str(&tokens.join(" "), PARSE_FORMAT).map_err(|e| {
        StorageError::TimestampParse {
            name: name.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Raw capture file name stamped with the current local time
pub fn generate_filename(room_id: &str) -> String {
    generate_filename_at(room_id, Local::now().naive_local())
}

pub fn generate_filename_at(room_id: &str, at: NaiveDateTime) -> String {
    format!(
        "{}_{}.{}",
        room_id,
        at.format(START_FORMAT),
        CAPTURE_EXTENSION
    )
}
