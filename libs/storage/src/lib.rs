pub mod config;
pub mod dirs;
pub mod error;
pub mod path;
pub mod session;

#[cfg(test)]
mod tests;

pub use config::StorageConfig;
pub use dirs::{
    cleanup_session, ensure_dir, init_data_root, init_session_dirs, list_sessions,
    remove_dir_recursive, CleanupReport, SessionDirs,
};
pub use error::{Result, StorageError};
pub use path::{
    category_dir, danmu_log_file, generate_filename, merge_conf_path, merged_file, outputs_dir,
    parse_start_from_records_dir_name, records_dir, session_path, splits_dir, Category,
    SessionKey,
};
pub use session::{
    read_session_meta, recover_session, session_meta_path, write_session_meta, SessionMeta,
};
