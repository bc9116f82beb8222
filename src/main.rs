use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};

use api::JobState;
use storage::{Category, SessionKey};

use crate::config::Config;

mod config;

const START_ARG_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Parser)]
#[command(version)]
struct Args {
    /// Set config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Override the storage root directory
    #[arg(short, long)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the data directory skeleton
    Init,
    /// Create the directories of a recording session and print its paths
    Session {
        room_id: String,
        /// Session start, "YYYY-MM-DD hh:mm:ss" local time (default: now)
        #[arg(long, value_parser = parse_start)]
        start: Option<NaiveDateTime>,
    },
    /// List sessions found under data/records
    Sessions,
    /// Remove every artifact of a session
    Clean {
        room_id: String,
        #[arg(long, value_parser = parse_start)]
        start: NaiveDateTime,
    },
    /// Print job state codes with their labels
    States,
}

fn parse_start(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, START_ARG_FORMAT)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut cfg = Config::parse(args.config)?;
    if let Some(root) = args.root {
        cfg.storage.root = root;
        cfg.storage
            .resolve_root()
            .context("resolve storage root")?;
    }

    utils::set_log(format!(
        "ddrecorder={},storage={}",
        cfg.log.level, cfg.log.level
    ));
    debug!("config : {:?}", cfg);

    let root = cfg.storage.root.as_path();
    let labels = cfg.status.locale.labels();

    match args.command {
        Command::Init => {
            let dirs = storage::init_data_root(root)
                .with_context(|| format!("init data root {}", root.display()))?;
            info!("data root ready with {} directories", dirs.len());
        }
        Command::Session { room_id, start } => {
            let key = match start {
                Some(start) => SessionKey::new(room_id, start),
                None => SessionKey::starting_now(room_id),
            };
            if !key.is_name_recoverable() {
                warn!(
                    "room id {} contains '_', session start is only recoverable from the sidecar",
                    key.room_id()
                );
            }

            storage::init_data_root(root)?;
            storage::init_session_dirs(&key, root)?;
            storage::write_session_meta(&key, root)?;
            info!(
                "session {} [{}]",
                key,
                labels.label(JobState::WaitingForLiveStart)
            );

            for category in Category::ALL {
                println!(
                    "{:<12} {}",
                    category.as_str(),
                    storage::session_path(root, category, &key).display()
                );
            }
        }
        Command::Sessions => {
            for key in storage::list_sessions(root)? {
                println!("{}\t{}", key.room_id(), key.global_start());
            }
        }
        Command::Clean { room_id, start } => {
            let key = SessionKey::new(room_id, start);
            let report = storage::cleanup_session(&key, root)
                .with_context(|| format!("clean session {}", key))?;
            for path in report.removed {
                println!("removed {}", path.display());
            }
        }
        Command::States => {
            for state in JobState::ALL {
                println!(
                    "{:>2}  {:<20} {}",
                    state.code(),
                    state.to_string(),
                    labels.label(state)
                );
            }
        }
    }

    Ok(())
}
