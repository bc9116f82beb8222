use std::{env, fs};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use api::Locale;
use storage::StorageConfig;

const DEFAULT_CONFIG_PATH: &str = "ddrecorder.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/ddrecorder/ddrecorder.toml";

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub log: Log,
    #[serde(default)]
    pub status: Status,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Log {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Status {
    /// Language of job state labels
    #[serde(default)]
    pub locale: Locale,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    env::var("LOG_LEVEL").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug".to_string()
        } else {
            "info".to_string()
        }
    })
}

impl Config {
    pub(crate) fn parse(path: Option<String>) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.unwrap_or(String::from(DEFAULT_CONFIG_PATH)))
            .or(fs::read_to_string(SYSTEM_CONFIG_PATH))
            .unwrap_or_default();
        Self::from_toml(&content)
    }

    fn from_toml(content: &str) -> anyhow::Result<Self> {
        let mut cfg: Self = toml::from_str(content).context("config parse error")?;
        cfg.log.level = cfg.log.level.to_lowercase();
        cfg.validate()
            .map_err(|e| anyhow::anyhow!("config validate [{}]", e))?;
        cfg.storage
            .resolve_root()
            .context("resolve storage root")?;
        Ok(cfg)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.storage.root.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("storage.root must not be empty"));
        }
        match self.log.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            level => Err(anyhow::anyhow!("unsupported log level: {}", level)),
        }
    }
}
